//! Content loader - loads documents from the input directory

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

use super::frontmatter::Permalink;
use super::{split_excerpt, Document, FrontMatter, SourceFormat};
use crate::helpers::parse_date_value;
use crate::Site;

/// Loads content from the input directory
pub struct DocumentLoader<'a> {
    site: &'a Site,
    include_drafts: bool,
}

impl<'a> DocumentLoader<'a> {
    /// Create a new document loader
    pub fn new(site: &'a Site) -> Self {
        Self {
            site,
            include_drafts: false,
        }
    }

    /// Also load documents marked `draft: true`
    pub fn with_drafts(mut self, include_drafts: bool) -> Self {
        self.include_drafts = include_drafts;
        self
    }

    /// Load every document, in file-name order per directory.
    ///
    /// Files that cannot be read or parsed are logged and skipped.
    pub fn load_all(&self) -> Result<Vec<Arc<Document>>> {
        let input_dir = &self.site.input_dir;
        if !input_dir.exists() {
            tracing::warn!("Input directory {:?} does not exist", input_dir);
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();

        let walker = WalkDir::new(input_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry));

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(format) = self.source_format(path) else {
                continue;
            };

            match self.load_document(path, format) {
                Ok(Some(doc)) => documents.push(Arc::new(doc)),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {:#}", path, e);
                }
            }
        }

        Ok(documents)
    }

    /// Load a single document. `Ok(None)` for drafts that are not being built.
    pub fn load_document(&self, path: &Path, format: SourceFormat) -> Result<Option<Document>> {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let (front_matter, body) = FrontMatter::parse(&text)?;

        let source = relative_source(&self.site.input_dir, path);

        if front_matter.is_draft() && !self.include_drafts {
            tracing::debug!("Skipping draft {}", source);
            return Ok(None);
        }

        let date = match front_matter.date() {
            Some(value) => match parse_date_value(value) {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::warn!("{}: {}", source, e);
                    None
                }
            },
            None => None,
        };

        let split = split_excerpt(body, &self.site.config.excerpt_separator);
        let (url, output_path) = output_location(&source, front_matter.permalink())?;

        let mut doc = Document::new(source, format, body);
        if let Some(title) = front_matter.title() {
            doc.title = title.to_string();
        }
        doc.full_source = path.to_path_buf();
        doc.date = date;
        doc.excerpt = split.excerpt;
        doc.content = split.content;
        doc.layout = front_matter.layout().map(str::to_string);
        doc.tags = front_matter.tags();
        doc.url = url;
        doc.output_path = output_path;
        doc.front_matter = front_matter;

        tracing::debug!("Loaded {} -> {}", doc.path, doc.url);

        Ok(Some(doc))
    }

    /// Layouts, hidden files, passthrough directories and the output
    /// directory are never documents
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with('_') || name.starts_with('.') {
            return true;
        }

        let path = entry.path();
        if path == self.site.includes_dir || path == self.site.output_dir {
            return true;
        }

        self.site
            .config
            .passthrough_copy
            .iter()
            .any(|p| path == self.site.input_dir.join(p))
    }

    fn source_format(&self, path: &Path) -> Option<SourceFormat> {
        let ext = path.extension()?.to_str()?;
        if !self.site.config.is_template_format(ext) {
            return None;
        }
        let format = SourceFormat::from_extension(ext);
        if format.is_none() {
            tracing::debug!("No renderer for .{} files, skipping {:?}", ext, path);
        }
        format
    }
}

/// Source path relative to the input directory, `/`-separated
fn relative_source(input_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(input_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// URL and output file for a document.
///
/// `posts/hello.md` -> `/posts/hello/` written to `posts/hello/index.html`;
/// `index.*` files map to their directory. A front-matter permalink wins.
pub fn output_location(
    source: &str,
    permalink: Option<Permalink>,
) -> Result<(String, Option<PathBuf>)> {
    match permalink {
        Some(Permalink::Disabled) => Ok((String::new(), None)),
        Some(Permalink::Path(link)) => {
            let trimmed = link.trim().trim_start_matches('/');
            if trimmed.split('/').any(|segment| segment == "..") {
                bail!("Permalink {:?} points outside the output directory", link);
            }

            let url = format!("/{}", trimmed);
            let file = if trimmed.is_empty() || trimmed.ends_with('/') {
                format!("{}index.html", trimmed)
            } else {
                trimmed.to_string()
            };
            Ok((url, Some(PathBuf::from(file))))
        }
        None => {
            let stem = source
                .rsplit_once('.')
                .map(|(stem, _)| stem)
                .unwrap_or(source);

            let dir = match stem.rsplit_once('/') {
                Some((parent, "index")) => format!("{}/", parent),
                None if stem == "index" => String::new(),
                _ => format!("{}/", stem),
            };

            Ok((
                format!("/{}", dir),
                Some(PathBuf::from(format!("{}index.html", dir))),
            ))
        }
    }
}
