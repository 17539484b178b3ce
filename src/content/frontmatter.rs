//! Front-matter parsing

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Front-matter data from a source file, keys in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    data: IndexMap<String, Value>,
}

/// Output location requested by front matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permalink {
    /// Write to this URL path
    Path(String),
    /// `permalink: false`: keep in collections, write nothing
    Disabled,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let trimmed = content.trim_start();

        // YAML front-matter (---)
        if trimmed.starts_with("---") {
            return Self::parse_yaml(trimmed, content);
        }

        // JSON front-matter (;;; or {"key":)
        if trimmed.starts_with(";;;") || trimmed.starts_with("{\"") {
            return Self::parse_json(trimmed);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml<'a>(trimmed: &'a str, original: &'a str) -> Result<(Self, &'a str)> {
        let rest = trimmed[3..].trim_start_matches(['\n', '\r']);

        // `---` straight after the opener: an empty block
        if let Some(after) = rest.strip_prefix("---") {
            let line_end = after.find('\n').unwrap_or(after.len());
            if after[..line_end].trim().is_empty() {
                let remaining = after[line_end..].trim_start_matches(['\n', '\r']);
                return Ok((FrontMatter::default(), remaining));
            }
        }

        let Some(end_pos) = rest.find("\n---") else {
            // No closing ---, treat as no front-matter
            return Ok((FrontMatter::default(), original));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // A leading `---` is also a markdown thematic break; only treat the
        // block as front matter when it has `key: value` lines
        if !yaml_content.lines().any(looks_like_yaml_entry) {
            return Ok((FrontMatter::default(), original));
        }

        let data: Option<IndexMap<String, Value>> = serde_yaml::from_str(yaml_content)
            .map_err(|e| anyhow!("Failed to parse YAML front-matter: {}", e))?;

        Ok((
            Self {
                data: data.unwrap_or_default(),
            },
            remaining,
        ))
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        // JSON front-matter ends with ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest
                .find(";;;")
                .ok_or_else(|| anyhow!("Unterminated JSON front-matter"))?;
            let json_content = rest[..end_pos].trim();
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);

            let data = serde_json::from_str(&format!("{{{}}}", json_content))
                .or_else(|_| serde_json::from_str(json_content))
                .map_err(|e| anyhow!("Failed to parse JSON front-matter: {}", e))?;

            return Ok((Self { data }, remaining));
        }

        // A JSON object at the start: let the streaming deserializer find its end
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(map))) => {
                let remaining = content[stream.byte_offset()..].trim_start_matches(['\n', '\r']);
                Ok((
                    Self {
                        data: map.into_iter().collect(),
                    },
                    remaining,
                ))
            }
            Some(Err(e)) => Err(anyhow!("Failed to parse JSON front-matter: {}", e)),
            _ => Err(anyhow!("Invalid JSON front-matter")),
        }
    }

    /// Look up any front-matter key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key).filter(|v| !v.is_null())
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    /// Raw `date` value, parsed later by the date helpers
    pub fn date(&self) -> Option<&Value> {
        self.get("date")
    }

    pub fn layout(&self) -> Option<&str> {
        self.get("layout").and_then(Value::as_str)
    }

    pub fn permalink(&self) -> Option<Permalink> {
        match self.get("permalink")? {
            Value::String(s) => Some(Permalink::Path(s.clone())),
            Value::Bool(false) => Some(Permalink::Disabled),
            _ => None,
        }
    }

    /// Tags as a list; a single string counts as one tag
    pub fn tags(&self) -> Vec<String> {
        match self.get("tags") {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self.get("draft"), Some(Value::Bool(true)))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Whether a line reads as a `key: value` YAML mapping entry
fn looks_like_yaml_entry(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }

    let Some((key, value)) = trimmed.split_once(':') else {
        return false;
    };

    // Keys are plain identifiers; a URL scheme is not a key
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");

    is_valid_key && (value.is_empty() || value.starts_with(' '))
}
