//! Service Ports

pub mod embedding;
pub mod feed;

pub use embedding::Embedder;
pub use feed::{EventFeed, RawEventRecord};
