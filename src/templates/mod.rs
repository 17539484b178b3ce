//! Template layer: a Tera instance loaded with the site's layouts
//!
//! Filters are registered on the renderer's own Tera instance and receive
//! their collaborators (the markdown renderer) at construction.

use anyhow::{Context as _, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::content::MarkdownRenderer;
use crate::helpers;

/// Template renderer with the site's layouts and filters
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with every file under `includes_dir` loaded as a
    /// template named by its relative path (`layouts/post.html`)
    pub fn new(includes_dir: &Path, markdown: Arc<MarkdownRenderer>) -> Result<Self> {
        let mut tera = Tera::default();

        // Output is HTML assembled from already-rendered fragments
        tera.autoescape_on(vec![]);

        let templates = read_templates(includes_dir)?;
        tracing::debug!("Loaded {} layouts from {:?}", templates.len(), includes_dir);
        tera.add_raw_templates(templates)?;

        tera.register_filter("toDate", to_date_filter);
        tera.register_filter(
            "md",
            move |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                md_filter(&markdown, value)
            },
        );

        Ok(Self { tera })
    }

    /// Register a document body as a template
    pub fn add_page(&mut self, name: &str, source: &str) -> Result<()> {
        self.tera
            .add_raw_template(name, source)
            .with_context(|| format!("Failed to parse template {}", name))
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Resolve a front-matter layout name: as given, then with `.html`
    pub fn resolve_layout(&self, layout: &str) -> Option<String> {
        if self.has_template(layout) {
            return Some(layout.to_string());
        }
        let with_ext = format!("{}.html", layout);
        self.has_template(&with_ext).then_some(with_ext)
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Read every file under `dir` as `(name, source)`
fn read_templates(dir: &Path) -> Result<Vec<(String, String)>> {
    let mut templates = Vec::new();
    if !dir.exists() {
        return Ok(templates);
    }

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let source =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        templates.push((name, source));
    }

    Ok(templates)
}

/// Tera filter: `{{ post.date | toDate }}` -> "Jan 05, 2024"
fn to_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    helpers::to_date(value)
        .map(tera::Value::String)
        .map_err(|e| tera::Error::msg(e.to_string()))
}

/// Tera filter: `{{ post.excerpt | md }}`. A missing value renders as nothing.
fn md_filter(markdown: &MarkdownRenderer, value: &tera::Value) -> tera::Result<tera::Value> {
    if value.is_null() {
        return Ok(tera::Value::String(String::new()));
    }
    let s = tera::try_get_value!("md", "value", String, value);
    Ok(tera::Value::String(markdown.render(&s)))
}
