pub mod address;
pub mod caption;
pub mod config;
pub mod data;
pub mod details;
pub mod error;
pub mod format;
pub mod model;
pub mod queue;
pub mod raw;
pub mod synonyms;
pub mod traits;

pub use config::ScrapeConfig;
pub use details::{DetailsScraper, PageRequest, PageType};
pub use error::{BoxError, DetailsError, Result};
pub use model::{OutputRecord, RequestDebugInfo};
pub use raw::RawNode;
