mod engine;
mod error;
mod feed;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use feed::{FeedLanguage, FeedSnapshot};
pub use types::{IncidentCounts, Summary};
