//! Shared CMS handler domain primitives.
//!
//! This crate owns the scan/queue contracts, message envelope decoding,
//! result ordering, and id generation shared by every handler. It
//! intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod ids;
pub mod ordering;
