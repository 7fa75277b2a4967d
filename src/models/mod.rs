pub mod catalog;
pub mod thread;

pub use catalog::{Catalog, CatalogThread, Page};
pub use thread::{Attachment, Post, Thread};
