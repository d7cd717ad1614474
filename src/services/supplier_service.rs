use tracing::info;

use crate::api::ApiError;
use crate::context::AppContext;
use crate::models::{Supplier, SupplierList};

/// Supplier list, served from the in-memory cache while it is fresh
pub async fn list_suppliers(ctx: &AppContext) -> Result<SupplierList, ApiError> {
    let mut fetched = false;
    let suppliers = ctx
        .suppliers
        .get_or_fetch(|| {
            fetched = true;
            ctx.client.suppliers()
        })
        .await?;

    if fetched {
        info!("Fetched {} suppliers from the backend", suppliers.len());
    }

    Ok(SupplierList {
        suppliers,
        from_cache: !fetched,
    })
}

/// Drop the cached list and fetch it again
pub async fn refresh_suppliers(ctx: &AppContext) -> Result<SupplierList, ApiError> {
    ctx.suppliers.invalidate();
    list_suppliers(ctx).await
}

/// Resolve a supplier given by id or by (case-insensitive) name.
///
/// Input that is not a known name is returned unchanged so the validator can
/// report it.
pub fn resolve_supplier_id(input: &str, suppliers: &[Supplier]) -> String {
    let input = input.trim();
    suppliers
        .iter()
        .find(|s| s.id == input || s.name.eq_ignore_ascii_case(input))
        .map(|s| s.id.clone())
        .unwrap_or_else(|| input.to_string())
}
