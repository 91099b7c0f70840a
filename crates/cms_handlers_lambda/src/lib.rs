//! AWS-oriented adapters and handlers for the CMS serverless backend.
//!
//! This crate owns runtime integration details (Lambda entry points, queue
//! acknowledgement, storage/search/mail adapters, the shared API Gateway
//! response wrapper) and exposes a single runtime module boundary for the
//! contract, ordering, and id primitives.

pub mod adapters;
pub mod handlers;
pub mod response;
pub mod runtime;
