//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::Site;

const DEFAULT_SCAFFOLD: &str = "---
title: {{ title }}
date: {{ date }}
layout: post.html
tags:
---

Summary of the post.

<!-- excerpt -->

Rest of the post.
";

/// Create a new post under the posts directory, returning its path
pub fn create_post(site: &Site, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let target_dir = site.input_dir.join(posts_dir(&site.config.posts_glob));
    fs::create_dir_all(&target_dir)?;

    let filename = match path {
        Some(p) => format!("{}.md", p.trim_end_matches(".md")),
        None => format!("{}.md", slug::slugify(title)),
    };
    let file_path = target_dir.join(filename);

    // Load scaffold template
    let scaffold_path = site.base_dir.join("scaffolds").join("post.md");
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.replace("<!-- excerpt -->", &site.config.excerpt_separator)
    };

    let content = scaffold
        .replace("{{ title }}", &yaml_scalar(title)?)
        .replace("{{ date }}", &now.format("%Y-%m-%d %H:%M:%S").to_string());

    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, title: &str, path: Option<&str>) -> Result<PathBuf> {
    create_post(site, title, path)
}

/// A string as a YAML scalar, quoted when plain text would not parse back
fn yaml_scalar(value: &str) -> Result<String> {
    Ok(serde_yaml::to_string(value)?.trim_end().to_string())
}

/// Literal directory prefix of a glob ("posts/*.md" -> "posts")
fn posts_dir(pattern: &str) -> PathBuf {
    let segments: Vec<&str> = pattern.split('/').collect();
    let literal = segments
        .iter()
        .take_while(|s| !s.contains(['*', '?', '[', '{']))
        .count();
    // The last segment names files, never a directory
    let dirs = literal.min(segments.len() - 1);
    PathBuf::from(segments[..dirs].join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posts_dir() {
        assert_eq!(posts_dir("posts/*.md"), PathBuf::from("posts"));
        assert_eq!(posts_dir("blog/posts/**/*.md"), PathBuf::from("blog/posts"));
        assert_eq!(posts_dir("*.md"), PathBuf::new());
        assert_eq!(posts_dir("notes/today.md"), PathBuf::from("notes"));
    }

    #[test]
    fn test_yaml_scalar_round_trips_titles() {
        assert_eq!(yaml_scalar("Hello World").unwrap(), "Hello World");
        for title in ["Rust: a tour", "#hashtag", "yes", "- dash", "it's \"quoted\""] {
            let line = format!("title: {}", yaml_scalar(title).unwrap());
            let parsed: serde_yaml::Value = serde_yaml::from_str(&line).unwrap();
            assert_eq!(parsed["title"].as_str(), Some(title));
        }
    }
}
