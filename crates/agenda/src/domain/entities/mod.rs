//! Domain Entities

pub mod event;
pub mod search_result;

pub use event::Event;
pub use search_result::SearchResult;
