//! Content module - pages, posts, stylesheets and where to find them

mod frontmatter;
mod markdown;
pub mod repository;
mod resource;
mod style;

pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use repository::{Backend, ContentRepository};
pub use resource::{Page, Post, Resource, ResourceId, ResourceKind, Style};
pub use style::StyleCompiler;
