//! Excerpt splitting on a literal separator token

/// Result of splitting a body at the excerpt separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    /// Trimmed text before the first separator, if the separator occurs
    pub excerpt: Option<String>,
    /// Whole body with the separator removed
    pub content: String,
}

/// Split `body` at the first occurrence of `separator`.
///
/// Works on raw source text, before any markdown rendering. An empty
/// separator never matches.
pub fn split_excerpt(body: &str, separator: &str) -> Excerpt {
    if separator.is_empty() {
        return Excerpt {
            excerpt: None,
            content: body.to_string(),
        };
    }

    match body.split_once(separator) {
        Some((before, after)) => {
            let mut content = String::with_capacity(before.len() + after.len());
            content.push_str(before);
            content.push_str(after);
            Excerpt {
                excerpt: Some(before.trim().to_string()),
                content,
            }
        }
        None => Excerpt {
            excerpt: None,
            content: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: &str = "<!-- excerpt -->";

    #[test]
    fn test_split_inline_marker() {
        let split = split_excerpt("Intro text<!-- excerpt -->Rest of the article", SEP);
        assert_eq!(split.excerpt.as_deref(), Some("Intro text"));
        assert_eq!(split.content, "Intro textRest of the article");
        assert!(!split.content.contains(SEP));
    }

    #[test]
    fn test_split_without_marker() {
        let body = "Just one paragraph.\n\nAnd another.";
        let split = split_excerpt(body, SEP);
        assert_eq!(split.excerpt, None);
        assert_eq!(split.content, body);
    }

    #[test]
    fn test_split_first_occurrence_only() {
        let body = "One\n\n<!-- excerpt -->\n\nTwo <!-- excerpt --> three";
        let split = split_excerpt(body, SEP);
        assert_eq!(split.excerpt.as_deref(), Some("One"));
        assert_eq!(split.content, "One\n\n\n\nTwo <!-- excerpt --> three");
    }

    #[test]
    fn test_split_leading_marker_gives_empty_excerpt() {
        let split = split_excerpt("<!-- excerpt -->Body", SEP);
        assert_eq!(split.excerpt.as_deref(), Some(""));
        assert_eq!(split.content, "Body");
    }

    #[test]
    fn test_empty_separator_disables_excerpt() {
        let split = split_excerpt("Intro<!-- excerpt -->Rest", "");
        assert_eq!(split.excerpt, None);
        assert_eq!(split.content, "Intro<!-- excerpt -->Rest");
    }
}
