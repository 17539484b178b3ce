//! Code block output for the markdown renderer

use anyhow::{anyhow, Result};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{
    highlighted_html_for_string, styled_line_to_highlighted_html, IncludeBackground,
};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Turns one fenced or indented code block into HTML.
///
/// `lang` is the first word of the fence info string, if any.
pub trait CodeHighlighter: Send + Sync {
    fn highlight(&self, code: &str, lang: Option<&str>) -> String;
}

/// Emits escaped code tagged with its language so client-side highlighters
/// (Prism, highlight.js) can pick it up
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl CodeHighlighter for PlainHighlighter {
    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        plain_code_block(code, lang)
    }
}

/// Server-side highlighting with syntect
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
}

impl SyntectHighlighter {
    /// Create a highlighter using one of syntect's bundled themes
    pub fn new(theme_name: &str, line_numbers: bool) -> Result<Self> {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                tracing::warn!(
                    "Unknown highlight theme {:?}, using {}",
                    theme_name,
                    FALLBACK_THEME
                );
                theme_set
                    .themes
                    .remove(FALLBACK_THEME)
                    .ok_or_else(|| anyhow!("No highlight themes available"))?
            }
        };

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
        })
    }

    /// Highlight line by line and wrap the result in a gutter table
    fn highlight_numbered(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        lang: &str,
    ) -> Result<String, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            lines.push(styled_line_to_highlighted_html(
                &regions[..],
                IncludeBackground::No,
            )?);
        }

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            r#"<figure class="highlight language-{}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            lang,
            gutter,
            lines.concat()
        ))
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let Some(lang) = lang else {
            return plain_code_block(code, None);
        };

        let Some(syntax) = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
        else {
            return plain_code_block(code, Some(lang));
        };

        let class = escape_html(lang);
        let result = if self.line_numbers {
            self.highlight_numbered(code, syntax, &class)
        } else {
            highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme).map(
                |highlighted| {
                    format!(
                        r#"<figure class="highlight language-{}">{}</figure>"#,
                        class, highlighted
                    )
                },
            )
        };

        match result {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                plain_code_block(code, Some(lang))
            }
        }
    }
}

/// `<pre><code>` block with an optional `language-*` marker
fn plain_code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => {
            let lang = escape_html(lang);
            format!(
                r#"<pre class="language-{0}"><code class="language-{0}">{1}</code></pre>"#,
                lang,
                escape_html(code)
            )
        }
        None => format!("<pre><code>{}</code></pre>", escape_html(code)),
    }
}

/// Simple HTML escaping
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_marks_language() {
        let html = PlainHighlighter.highlight("let x = 1 < 2;\n", Some("rust"));
        assert_eq!(
            html,
            "<pre class=\"language-rust\"><code class=\"language-rust\">let x = 1 &lt; 2;\n</code></pre>"
        );
    }

    #[test]
    fn test_plain_without_language() {
        let html = PlainHighlighter.highlight("echo hi\n", None);
        assert_eq!(html, "<pre><code>echo hi\n</code></pre>");
    }

    #[test]
    fn test_syntect_known_language() {
        let highlighter = SyntectHighlighter::new("base16-ocean.dark", false).unwrap();
        let html = highlighter.highlight("fn main() {}\n", Some("rust"));
        assert!(html.starts_with(r#"<figure class="highlight language-rust">"#));
        assert!(html.contains("<span"));
    }

    #[test]
    fn test_syntect_line_numbers() {
        let highlighter = SyntectHighlighter::new("base16-ocean.dark", true).unwrap();
        let html = highlighter.highlight("a = 1\nb = 2\n", Some("py"));
        assert!(html.contains(r#"<span class="line-number">1</span>"#));
        assert!(html.contains(r#"class="gutter""#));
    }

    #[test]
    fn test_syntect_unknown_language_falls_back() {
        let highlighter = SyntectHighlighter::new("no-such-theme", false).unwrap();
        let html = highlighter.highlight("???", Some("klingon"));
        assert_eq!(
            html,
            r#"<pre class="language-klingon"><code class="language-klingon">???</code></pre>"#
        );
    }
}
