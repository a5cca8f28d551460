use std::future::Future;

use crate::error::FetchError;

pub mod decode;
pub mod quotes;

pub use decode::decode_quote_pair;
pub use quotes::QuoteFetcher;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Prices for the two configured instruments, in configured order.
pub type QuotePair = (f64, f64);

/// Anything the poll loop can ask for one fresh pair of quotes.
pub trait QuoteSource {
    fn fetch(&self) -> impl Future<Output = FetchResult<QuotePair>> + Send;
}
