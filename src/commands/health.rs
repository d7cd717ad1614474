use crate::context::AppContext;
use crate::error::AppError;

pub async fn execute(ctx: &AppContext) -> Result<(), AppError> {
    if ctx.client.health().await {
        ctx.notifier
            .success(&format!("Backend at {} is up", ctx.client.base_url()));
        Ok(())
    } else {
        Err(AppError::Usage(format!(
            "Backend at {} is not reachable",
            ctx.client.base_url()
        )))
    }
}
