use tracing::info;

use crate::context::AppContext;
use crate::error::AppError;
use crate::models::{TopupRequest, TransactionRecord};
use crate::validation::validate_topup;

pub struct TopupResult {
    pub message: String,
    pub record: Option<TransactionRecord>,
}

/// Validate locally, then submit the top-up.
///
/// Known-bad input never reaches the network.
pub async fn submit_topup(ctx: &AppContext, request: TopupRequest) -> Result<TopupResult, AppError> {
    ctx.require_sign_in()?;
    validate_topup(&request, &ctx.config)?;

    info!(
        "Submitting top-up of {} to supplier {}",
        request.value, request.supplier_id
    );
    let envelope = ctx.client.submit_topup(&request).await?;

    if let Some(record) = &envelope.data {
        info!("Top-up {} finished with status {}", record.id, record.status);
    }

    Ok(TopupResult {
        message: envelope.message,
        record: envelope.data,
    })
}
