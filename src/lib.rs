//! Replays a directory of JSON transaction templates against a
//! DynamoDB-compatible store.
//!
//! The pipeline per file: read the template, expand `{NAME}` placeholders
//! from the environment, parse it into a transaction request, optionally
//! redirect every action to one table, then submit the whole request as a
//! single atomic write. Files run strictly one at a time, in sorted path
//! order.

pub mod discover;
pub mod error;
pub mod placeholder;
pub mod run;
pub mod store;
pub mod template;
