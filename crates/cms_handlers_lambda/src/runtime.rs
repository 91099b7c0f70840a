pub use cms_handlers_core::{contract, ids, ordering};
