//! Generator module - one full build pass over the loaded documents

mod passthrough;

use anyhow::{anyhow, Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use tera::Context;

use crate::content::{collection, Collection, Document, MarkdownRenderer, SourceFormat};
use crate::templates::TemplateRenderer;
use crate::Site;

pub use passthrough::copy_passthrough;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{} page(s) failed to render: {}", .paths.len(), .paths.join(", "))]
    PagesFailed { paths: Vec<String> },
}

/// What a build pass produced
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub documents: usize,
    pub pages_written: usize,
    pub files_copied: usize,
}

/// Collections exposed to templates as `collections.*`
#[derive(Debug, Serialize)]
struct Collections<'a> {
    posts: &'a Collection,
    all: &'a Collection,
}

/// Site-wide values exposed to templates as `site.*`
#[derive(Debug, Serialize)]
struct SiteData<'a> {
    title: &'a str,
    description: &'a str,
    author: &'a str,
    url: &'a str,
}

/// Static site generator using Tera templates
pub struct Generator<'a> {
    site: &'a Site,
    markdown: Arc<MarkdownRenderer>,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(site: &'a Site) -> Result<Self> {
        let markdown = Arc::new(MarkdownRenderer::from_config(&site.config)?);
        let renderer = TemplateRenderer::new(&site.includes_dir, Arc::clone(&markdown))?;

        Ok(Self {
            site,
            markdown,
            renderer,
        })
    }

    /// Render every document and copy passthrough files.
    ///
    /// A page that fails to render is logged and the build carries on; the
    /// failures are reported together at the end.
    pub fn generate(&mut self, documents: &[Arc<Document>]) -> Result<BuildReport> {
        let output_dir = &self.site.output_dir;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {:?}", output_dir))?;

        let files_copied = copy_passthrough(self.site)?;
        tracing::info!("Copied {} passthrough files", files_copied);

        let posts = collection::build("posts", documents, &self.site.config.posts_glob)?;
        let all = Collection::new("all", documents.to_vec());
        tracing::info!("Collected {} posts", posts.len());

        let mut failed = Vec::new();

        // Pages sharing an output path would overwrite each other
        for paths in output_collisions(documents) {
            tracing::error!("Output path collision between {}", paths.join(", "));
            failed.extend(paths);
        }

        // Template bodies are registered before anything renders
        let templated: Vec<&Arc<Document>> = documents
            .iter()
            .filter(|d| self.is_templated(d) && !failed.contains(&d.path))
            .collect();
        for doc in templated {
            if let Err(e) = self.renderer.add_page(&page_template_name(doc), &doc.content) {
                tracing::error!("{}: {:#}", doc.path, e);
                failed.push(doc.path.clone());
            }
        }

        let base = self.base_context(&posts, &all);
        let mut pages_written = 0;

        for doc in documents {
            let Some(output_path) = &doc.output_path else {
                continue;
            };
            if failed.contains(&doc.path) {
                continue;
            }

            let result = self
                .render_document(doc, &posts, &base)
                .and_then(|html| {
                    let dest = output_dir.join(output_path);
                    if let Some(parent) = dest.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&dest, html).with_context(|| format!("Failed to write {:?}", dest))
                });

            match result {
                Ok(()) => {
                    tracing::debug!("Wrote {} -> {:?}", doc.path, output_path);
                    pages_written += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to render {}: {:#}", doc.path, e);
                    failed.push(doc.path.clone());
                }
            }
        }

        if !failed.is_empty() {
            return Err(BuildError::PagesFailed { paths: failed }.into());
        }

        Ok(BuildReport {
            documents: documents.len(),
            pages_written,
            files_copied,
        })
    }

    /// Context shared by every page
    fn base_context(&self, posts: &Collection, all: &Collection) -> Context {
        let config = &self.site.config;
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: &config.title,
                description: &config.description,
                author: &config.author,
                url: &config.url,
            },
        );
        context.insert("collections", &Collections { posts, all });
        context
    }

    /// Body first, then the layout named in front matter, if any
    fn render_document(
        &self,
        doc: &Document,
        posts: &Collection,
        base: &Context,
    ) -> Result<String> {
        let mut context = base.clone();
        context.insert("page", doc);
        if let Some(prev) = doc.prev(posts.as_slice()) {
            context.insert("prev", prev);
        }
        if let Some(next) = doc.next(posts.as_slice()) {
            context.insert("next", next);
        }

        let body = if self.is_templated(doc) {
            self.renderer.render(&page_template_name(doc), &context)?
        } else {
            doc.content.clone()
        };
        let body = match doc.format {
            SourceFormat::Markdown => self.markdown.render(&body),
            SourceFormat::Html => body,
        };

        let Some(layout) = &doc.layout else {
            return Ok(body);
        };

        let template = self
            .renderer
            .resolve_layout(layout)
            .ok_or_else(|| anyhow!("Layout {:?} not found", layout))?;
        context.insert("content", &body);
        self.renderer.render(&template, &context)
    }

    /// Whether the document body goes through Tera before anything else
    fn is_templated(&self, doc: &Document) -> bool {
        match doc.format {
            SourceFormat::Html => true,
            SourceFormat::Markdown => self.site.config.markdown.template,
        }
    }
}

/// Source paths of documents that resolve to the same output file, grouped
/// per output path in discovery order
fn output_collisions(documents: &[Arc<Document>]) -> Vec<Vec<String>> {
    let mut by_output: HashMap<&PathBuf, Vec<String>> = HashMap::new();
    let mut order = Vec::new();
    for doc in documents {
        let Some(output_path) = &doc.output_path else {
            continue;
        };
        let paths = by_output.entry(output_path).or_insert_with(|| {
            order.push(output_path);
            Vec::new()
        });
        paths.push(doc.path.clone());
    }

    order
        .into_iter()
        .filter_map(|output_path| by_output.remove(output_path))
        .filter(|paths| paths.len() > 1)
        .collect()
}

/// Template name of an HTML document's body; `@` keeps it apart from layouts
fn page_template_name(doc: &Document) -> String {
    format!("@page/{}", doc.path)
}
