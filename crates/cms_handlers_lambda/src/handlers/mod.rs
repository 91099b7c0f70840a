pub mod drain;
pub mod indexer;
pub mod list_content;
pub mod mailer;
