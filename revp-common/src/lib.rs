//! # Review Polisher Common Library
//!
//! Shared code for the review polisher service including:
//! - Submission model received from the review form
//! - Label taxonomy and categorization
//! - Display clock used to stamp sink payloads
//! - Environment configuration for the synthesis service and sinks

pub mod config;
pub mod error;
pub mod submission;
pub mod taxonomy;
pub mod time;

pub use error::{Error, Result};
pub use submission::Submission;
pub use taxonomy::{categorize, Category, CategoryBuckets};
pub use time::RecordedAt;
