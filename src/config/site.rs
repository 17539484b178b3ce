//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Directory
    pub input_dir: String,
    pub output_dir: String,
    /// Layout directory, relative to `input_dir`
    pub includes_dir: String,
    pub passthrough_copy: Vec<String>,

    // Content
    /// Glob over document paths selecting the `posts` collection
    pub posts_glob: String,
    pub excerpt_separator: String,
    pub template_formats: Vec<String>,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: String::new(),
            url: "http://example.com".to_string(),

            input_dir: "src".to_string(),
            output_dir: "dist".to_string(),
            includes_dir: "_includes".to_string(),
            passthrough_copy: vec!["images".to_string(), "assets".to_string()],

            posts_glob: "posts/*.md".to_string(),
            excerpt_separator: "<!-- excerpt -->".to_string(),
            template_formats: vec!["md".to_string(), "html".to_string()],
            markdown: MarkdownConfig::default(),
            highlight: HighlightConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Whether files with this extension are loaded as documents
    pub fn is_template_format(&self, extension: &str) -> bool {
        self.template_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(extension))
    }
}

/// Markdown parser options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Pass raw HTML through unescaped
    pub html: bool,
    pub tables: bool,
    pub footnotes: bool,
    /// Run markdown bodies through Tera before converting them
    pub template: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            html: true,
            tables: true,
            footnotes: true,
            template: true,
        }
    }
}

/// Code block highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.input_dir, "src");
        assert_eq!(config.output_dir, "dist");
        assert_eq!(config.posts_glob, "posts/*.md");
        assert_eq!(config.excerpt_separator, "<!-- excerpt -->");
        assert_eq!(config.passthrough_copy, vec!["images", "assets"]);
        assert!(config.markdown.html);
        assert!(config.markdown.template);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notes
output_dir: public
passthrough_copy:
  - static
highlight:
  enable: false
comments: disqus
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Notes");
        assert_eq!(config.output_dir, "public");
        assert_eq!(config.input_dir, "src");
        assert_eq!(config.passthrough_copy, vec!["static"]);
        assert!(!config.highlight.enable);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert!(config.extra.contains_key("comments"));
    }

    #[test]
    fn test_template_formats() {
        let config = SiteConfig::default();
        assert!(config.is_template_format("md"));
        assert!(config.is_template_format("HTML"));
        assert!(!config.is_template_format("png"));
    }
}
