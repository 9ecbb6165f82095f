pub mod config;
pub mod error;
pub mod notify;
pub mod types;

pub use config::Credentials;
pub use error::Error;
pub use notify::{LogNotifier, Notification, Notifier, Severity};
pub use types::{Article, Filters};

pub type Result<T> = std::result::Result<T, Error>;
