pub mod cache;
pub mod clock;
pub mod encryption;
pub mod errors;
pub mod format;
pub mod pagination;
pub mod table;

pub use errors::describe_error;
pub use table::Table;
