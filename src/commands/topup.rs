use clap::Args;
use tracing::warn;

use crate::context::AppContext;
use crate::error::AppError;
use crate::models::{TopupRequest, TransactionRecord};
use crate::services::topup_service::{self, TopupResult};
use crate::services::supplier_service;
use crate::utils::format::{format_amount, format_timestamp};

#[derive(Debug, Args)]
pub struct TopupArgs {
    /// 10-digit mobile number starting with 3
    pub phone: String,
    /// Amount in pesos
    pub amount: i64,
    /// Supplier id or operator name
    pub supplier: String,
}

pub async fn execute(ctx: &AppContext, args: TopupArgs) -> Result<(), AppError> {
    let supplier_id = supplier_id_for(ctx, &args.supplier).await;
    let request = TopupRequest {
        cell_phone: args.phone.trim().to_string(),
        value: args.amount,
        supplier_id,
    };

    let result = topup_service::submit_topup(ctx, request).await?;
    announce(ctx, &result);
    Ok(())
}

/// The backend accepted the top-up; a record that has not settled yet gets a hint.
fn announce(ctx: &AppContext, result: &TopupResult) {
    ctx.notifier.success(&result.message);
    if let Some(record) = &result.record {
        ctx.notifier.info(&receipt(record));
        if !record.status.is_completed() {
            ctx.notifier
                .info("The operator has not confirmed it yet; check `history` for the final status.");
        }
    }
}

/// Numeric input is used as-is; names are looked up in the supplier list.
async fn supplier_id_for(ctx: &AppContext, input: &str) -> String {
    let input = input.trim();
    if input.chars().all(|c| c.is_ascii_digit()) {
        return input.to_string();
    }

    match supplier_service::list_suppliers(ctx).await {
        Ok(list) => supplier_service::resolve_supplier_id(input, &list.suppliers),
        Err(e) => {
            warn!("Could not load suppliers to resolve '{}': {}", input, e);
            input.to_string()
        }
    }
}

fn receipt(record: &TransactionRecord) -> String {
    let mut lines = vec![
        format!("Transaction: {}", record.id),
        format!("Phone:       {}", record.cell_phone),
        format!("Operator:    {}", record.supplier_name),
        format!("Amount:      {}", format_amount(record.amount)),
        format!("Status:      {}", record.status),
        format!("Date:        {}", format_timestamp(&record.created_at)),
    ];
    if let Some(reference) = record.transactional_id.as_deref().filter(|r| !r.is_empty()) {
        lines.push(format!("Reference:   {}", reference));
    }
    if let Some(message) = record.message.as_deref().filter(|m| !m.is_empty()) {
        lines.push(format!("Detail:      {}", message));
    }
    lines.join("\n")
}
