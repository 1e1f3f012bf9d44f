//! Shared helpers for background actors

mod retry;

pub use retry::{RetryConfig, with_retry};
