//! Mobile operator models

use serde::{Deserialize, Serialize};

/// A mobile operator that can receive top-ups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
}

/// Supplier list as shown to the user
#[derive(Debug)]
pub struct SupplierList {
    pub suppliers: std::sync::Arc<Vec<Supplier>>,
    /// `true` when the list was served from the in-memory cache.
    pub from_cache: bool,
}
