//! Data layer: transports, retrying fetcher, CSV ingest and the parse cache.

pub mod cache;
pub mod fetch;
pub mod file;
pub mod http;
pub mod ingest;
pub mod provider;

pub use cache::{CacheStats, ParseCache};
pub use fetch::{RetryPolicy, SourceFetcher};
pub use file::FileTransport;
pub use http::HttpTransport;
pub use ingest::{normalize_header, parse_dataset, parse_rows, IngestError, ParsedRows, RawRow};
pub use provider::{FetchError, SourceTransport, TransportError};
