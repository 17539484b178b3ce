//! Markdown rendering

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::highlight::{CodeHighlighter, PlainHighlighter, SyntectHighlighter};
use crate::config::SiteConfig;

/// Markdown renderer with pluggable code block output
pub struct MarkdownRenderer {
    options: Options,
    raw_html: bool,
    highlighter: Box<dyn CodeHighlighter>,
}

impl MarkdownRenderer {
    /// Create a renderer with raw HTML enabled and unhighlighted code blocks
    pub fn new() -> Self {
        Self {
            options: default_options(),
            raw_html: true,
            highlighter: Box::new(PlainHighlighter),
        }
    }

    /// Create a renderer from the site's `markdown` and `highlight` settings
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let mut options = Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        if config.markdown.tables {
            options |= Options::ENABLE_TABLES;
        }
        if config.markdown.footnotes {
            options |= Options::ENABLE_FOOTNOTES;
        }

        let highlighter: Box<dyn CodeHighlighter> = if config.highlight.enable {
            Box::new(SyntectHighlighter::new(
                &config.highlight.theme,
                config.highlight.line_number,
            )?)
        } else {
            Box::new(PlainHighlighter)
        };

        Ok(Self {
            options,
            raw_html: config.markdown.html,
            highlighter,
        })
    }

    /// Swap the code block highlighter
    pub fn with_highlighter(mut self, highlighter: Box<dyn CodeHighlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Render markdown to HTML.
    ///
    /// Never fails: anything the parser does not recognise comes out as text.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let block = self
                        .highlighter
                        .highlight(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(block)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                Event::Html(raw) | Event::InlineHtml(raw) if !self.raw_html => {
                    events.push(Event::Text(raw));
                }
                _ => {
                    if !in_code_block {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn default_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// First word of a fence info string ("rust ignore" -> "rust")
fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace()
        .next()
        .map(|lang| lang.trim_matches(|c| c == '{' || c == '}' || c == '.'))
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a *test*.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a <em>test</em>.</p>"));
    }

    #[test]
    fn test_inline_html_passes_through() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(r#"Hello <span class="tag">world</span>!"#);
        assert!(html.contains(r#"<span class="tag">world</span>"#));
    }

    #[test]
    fn test_block_html_passes_through() {
        let renderer = MarkdownRenderer::new();
        let block = "<div class=\"note\">\n<p>raw</p>\n</div>\n";
        let html = renderer.render(&format!("Intro\n\n{}\nOutro", block));
        assert!(html.contains(block));
        assert!(html.contains("<p>Outro</p>"));
    }

    #[test]
    fn test_html_disabled_escapes() {
        let mut config = SiteConfig::default();
        config.markdown.html = false;
        config.highlight.enable = false;
        let renderer = MarkdownRenderer::from_config(&config).unwrap();
        let html = renderer.render("a <b>bold</b> move");
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_fenced_code_is_tagged() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust ignore\nfn main() {}\n```");
        assert!(html.contains(r#"<code class="language-rust">fn main() {}"#));
    }

    #[test]
    fn test_indented_code_has_no_language() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Text\n\n    let a = 1;\n");
        assert!(html.contains("<pre><code>let a = 1;\n</code></pre>"));
    }

    #[test]
    fn test_code_block_through_syntect() {
        let renderer = MarkdownRenderer::from_config(&SiteConfig::default()).unwrap();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains("highlight language-rust"));
    }

    #[test]
    fn test_malformed_markdown_degrades() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("**unclosed [link](\n\n```\nnever closed");
        assert!(html.contains("**unclosed"));
        assert!(html.contains("never closed"));
    }

    #[test]
    fn test_custom_highlighter() {
        struct Upper;
        impl CodeHighlighter for Upper {
            fn highlight(&self, code: &str, lang: Option<&str>) -> String {
                format!("<{}>{}</>", lang.unwrap_or("-"), code.to_uppercase())
            }
        }

        let renderer = MarkdownRenderer::new().with_highlighter(Box::new(Upper));
        let html = renderer.render("```sh\necho hi\n```\n");
        assert_eq!(html, "<sh>ECHO HI\n</>");
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust"), Some("rust".to_string()));
        assert_eq!(fence_language("{.python}"), Some("python".to_string()));
        assert_eq!(fence_language("  "), None);
    }
}
