//! Data models for the top-up portal
//!
//! Wire-level shapes exchanged with the backend plus the small view structs the
//! commands render.

pub mod page;
pub mod supplier;
pub mod transaction;
pub mod user;

pub use page::{HistoryQuery, PagedResult, SortDirection};
pub use supplier::{Supplier, SupplierList};
pub use transaction::{TopupRequest, TransactionRecord};
pub use user::{Credentials, LoginData, LoginRequest, RegisterRequest, User};
