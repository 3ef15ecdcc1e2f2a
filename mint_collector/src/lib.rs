pub mod cache;
pub mod collector;

pub use cache::{CacheState, MintCache};
pub use collector::{CollectorError, MintCollector, Result};
