//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::collection;
use crate::content::loader::DocumentLoader;
use crate::content::Document;
use crate::helpers::format_date;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let documents = DocumentLoader::new(site).load_all()?;

    match content_type {
        "post" | "posts" => {
            let posts = collection::build("posts", &documents, &site.config.posts_glob)?;
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!("  {}", describe(post));
            }
        }
        "all" | "page" | "pages" => {
            println!("Documents ({}):", documents.len());
            for doc in &documents {
                println!("  {}", describe(doc));
            }
        }
        "tag" | "tags" => {
            let mut tags: HashMap<&str, usize> = HashMap::new();
            for doc in &documents {
                for tag in &doc.tags {
                    *tags.entry(tag.as_str()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, all, tags",
                content_type
            );
        }
    }

    Ok(())
}

/// One listing line: date, title, source path
fn describe(doc: &Document) -> String {
    let date = doc
        .date
        .as_ref()
        .map(format_date)
        .unwrap_or_else(|| "(undated)".to_string());
    format!("{:<12} - {} [{}]", date, doc.title, doc.path)
}
