pub mod aggregator;
pub mod debounce;
pub mod logging;
pub mod normalize;
pub mod sources;

pub use aggregator::Aggregator;
pub use debounce::Debouncer;
pub use normalize::normalize;
pub use sources::NewsSource;

pub mod prelude {
    pub use super::aggregator::Aggregator;
    pub use super::sources::{guardian::GuardianSource, newsapi::NewsApiSource, NewsSource};
    pub use nh_core::{Article, Credentials, Error, Filters, Result};
}
