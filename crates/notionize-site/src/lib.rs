//! Page tree discovery for generated documentation sites.
//!
//! [`SiteWalker`] reads the HTML output of a static site build and produces
//! a tree of [`SiteNode`]s mirroring the directory layout, with each page's
//! content already converted to Notion blocks.

mod error;
mod nav;
mod node;
mod title;
mod walker;

pub use error::WalkError;
pub use nav::NavOrder;
pub use node::{PageContent, SiteNode};
pub use title::titlecase_from_slug;
pub use notionize_config::DEFAULT_EXCLUDE;
pub use walker::SiteWalker;
