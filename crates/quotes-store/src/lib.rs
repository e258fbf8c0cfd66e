pub mod config;
pub mod error;
pub mod source;

pub use config::Config;
pub use error::{Result, StoreError};
pub use source::{FETCH_TIMEOUT, QuoteSource};
