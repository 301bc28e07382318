pub mod connections;
pub mod error;
pub mod query;

pub use connections::ConnectionFetcher;
pub use error::ScanError;
pub use query::QueryClient;
