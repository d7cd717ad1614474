use clap::Args;

use crate::context::AppContext;
use crate::error::AppError;
use crate::services::supplier_service;
use crate::utils::Table;

#[derive(Debug, Args)]
pub struct SuppliersArgs {
    /// Skip the cache and fetch the list again
    #[arg(long)]
    pub refresh: bool,
}

pub async fn execute(ctx: &AppContext, args: SuppliersArgs) -> Result<(), AppError> {
    let list = if args.refresh {
        supplier_service::refresh_suppliers(ctx).await?
    } else {
        supplier_service::list_suppliers(ctx).await?
    };

    if list.suppliers.is_empty() {
        ctx.notifier.info("No suppliers available");
        return Ok(());
    }

    let mut table = Table::new(&["ID", "Operator"]);
    for supplier in list.suppliers.iter() {
        table.add_row(vec![supplier.id.clone(), supplier.name.clone()]);
    }

    ctx.notifier.info(&table.render());
    if list.from_cache {
        ctx.notifier.info("(cached, use --refresh to reload)");
    }
    Ok(())
}
