//! Content module - documents, collections, and content processing

pub mod collection;
mod document;
mod excerpt;
mod frontmatter;
pub mod highlight;
pub mod loader;
mod markdown;

pub use collection::{Collection, CollectionError};
pub use document::{Document, SourceFormat};
pub use excerpt::{split_excerpt, Excerpt};
pub use frontmatter::{FrontMatter, Permalink};
pub use markdown::MarkdownRenderer;
