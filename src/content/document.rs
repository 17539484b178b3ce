//! Document model

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};
use std::path::PathBuf;

use super::FrontMatter;

/// How a document's body turns into HTML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Rendered with the markdown renderer
    Markdown,
    /// Rendered as a template against the page context
    Html,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// One source content file, immutable once loaded
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Source path relative to the input directory, `/`-separated
    pub path: String,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,

    pub format: SourceFormat,

    /// Body after front-matter removal
    pub raw_body: String,

    pub front_matter: FrontMatter,

    pub title: String,

    /// Parsed `date`, `None` when missing or unreadable
    #[serde(serialize_with = "serialize_date")]
    pub date: Option<DateTime<FixedOffset>>,

    /// Text before the excerpt separator
    pub excerpt: Option<String>,

    /// Body with the excerpt separator removed
    pub content: String,

    pub layout: Option<String>,

    pub tags: Vec<String>,

    /// Public URL, e.g. `/posts/hello/`
    pub url: String,

    /// Output file relative to the output directory; `None` when the
    /// document is only used in collections
    #[serde(skip)]
    pub output_path: Option<PathBuf>,
}

impl Document {
    /// Create a document with nothing derived yet
    pub fn new(path: impl Into<String>, format: SourceFormat, raw_body: impl Into<String>) -> Self {
        let path = path.into();
        let raw_body = raw_body.into();
        Self {
            title: default_title(&path),
            full_source: PathBuf::from(&path),
            format,
            content: raw_body.clone(),
            raw_body,
            front_matter: FrontMatter::default(),
            date: None,
            excerpt: None,
            layout: None,
            tags: Vec::new(),
            url: String::new(),
            output_path: None,
            path,
        }
    }

    /// Previous (newer) document in an ordered list
    pub fn prev<'a, D: AsRef<Document>>(&self, docs: &'a [D]) -> Option<&'a Document> {
        let pos = self.position_in(docs)?;
        pos.checked_sub(1).map(|i| docs[i].as_ref())
    }

    /// Next (older) document in an ordered list
    pub fn next<'a, D: AsRef<Document>>(&self, docs: &'a [D]) -> Option<&'a Document> {
        let pos = self.position_in(docs)?;
        docs.get(pos + 1).map(AsRef::as_ref)
    }

    fn position_in<D: AsRef<Document>>(&self, docs: &[D]) -> Option<usize> {
        docs.iter().position(|d| d.as_ref().path == self.path)
    }
}

impl AsRef<Document> for Document {
    fn as_ref(&self) -> &Document {
        self
    }
}

/// File stem of a source path ("posts/hello-world.md" -> "hello-world")
fn default_title(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file)
        .to_string()
}

/// Dates go to templates as RFC 3339 strings so `toDate` can read them back
fn serialize_date<S: Serializer>(
    date: &Option<DateTime<FixedOffset>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}
