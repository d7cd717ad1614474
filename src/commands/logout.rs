use crate::context::AppContext;
use crate::error::AppError;
use crate::services::auth_service;

pub fn execute(ctx: &AppContext) -> Result<(), AppError> {
    auth_service::logout(ctx)?;
    ctx.notifier.success("Signed out");
    Ok(())
}
