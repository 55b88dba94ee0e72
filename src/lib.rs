pub mod cache;
pub mod config;
pub mod date;
pub mod error;
pub mod logger;
pub mod metadata;
pub mod network;
pub mod retry;
pub mod storage;

pub type Result<T> = std::result::Result<T, error::ToolError>;

pub mod prelude {
    pub use crate::cache::MediaCache;
    pub use crate::config::Config;
    pub use crate::date::{calculate_date, calculate_date_from, DateOffset};
    pub use crate::error::ToolError;
    pub use crate::metadata::{MediaKind, MediaMetadata};
    pub use crate::retry::{with_retry, RetryPolicy};
    pub use crate::storage::{DiskStore, MediaStore};
}
