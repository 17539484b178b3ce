//! Initialize a new site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::{Site, CONFIG_FILE};

const CONFIG: &str = r#"# Site
title: My Blog
description: ''
author: ''
url: http://example.com

# Directory
input_dir: src
output_dir: dist
includes_dir: _includes
passthrough_copy:
  - images
  - assets

# Content
posts_glob: posts/*.md
excerpt_separator: '<!-- excerpt -->'
template_formats:
  - md
  - html

markdown:
  html: true
  template: true

highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false
"#;

const BASE_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{% if page.title %}{{ page.title }} | {% endif %}{{ site.title }}</title>
  <link rel="stylesheet" href="/assets/style.css">
</head>
<body>
  <header><a href="/">{{ site.title }}</a></header>
  <main>
{% block main %}{{ content }}{% endblock main %}
  </main>
</body>
</html>
"#;

const POST_LAYOUT: &str = r#"{% extends "base.html" %}
{% block main %}
<article>
  <h1>{{ page.title }}</h1>
  <time>{{ page.date | toDate }}</time>
  {{ content }}
</article>
<nav>
  {% if prev %}<a href="{{ prev.url }}">Newer: {{ prev.title }}</a>{% endif %}
  {% if next %}<a href="{{ next.url }}">Older: {{ next.title }}</a>{% endif %}
</nav>
{% endblock main %}
"#;

const INDEX_PAGE: &str = r#"---
title: Home
layout: base.html
---
<ul class="posts">
{% for post in collections.posts %}
  <li>
    <a href="{{ post.url }}">{{ post.title }}</a>
    {% if post.date %}<time>{{ post.date | toDate }}</time>{% endif %}
    {% if post.excerpt %}{{ post.excerpt | md }}{% endif %}
  </li>
{% endfor %}
</ul>
"#;

const STYLE: &str = "body { max-width: 42rem; margin: 0 auto; font-family: sans-serif; }\n";

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join(CONFIG_FILE).exists() {
        bail!("{:?} already contains a {}", target_dir, CONFIG_FILE);
    }

    let src = target_dir.join("src");
    for dir in ["_includes", "posts", "images", "assets"] {
        fs::create_dir_all(src.join(dir))?;
    }
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    fs::write(target_dir.join(CONFIG_FILE), CONFIG)?;
    fs::write(src.join("_includes/base.html"), BASE_LAYOUT)?;
    fs::write(src.join("_includes/post.html"), POST_LAYOUT)?;
    fs::write(src.join("index.html"), INDEX_PAGE)?;
    fs::write(src.join("assets/style.css"), STYLE)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
layout: post.html
tags:
  - welcome
---

Welcome to your new blog. This paragraph is the excerpt shown on the home page.

<!-- excerpt -->

## Writing posts

Add markdown files to `src/posts/`. Raw <abbr title="HyperText Markup Language">HTML</abbr> works too.

```rust
fn main() {{
    println!("hello");
}}
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );
    fs::write(src.join("posts/hello-world.md"), sample_post)?;

    Ok(())
}

/// Run the init command with an existing site
pub fn run(site: &Site) -> Result<()> {
    init_site(&site.base_dir)
}
