pub mod notify;
pub mod page_store;
pub mod queue;
pub mod search;
