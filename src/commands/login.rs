use clap::Args;

use crate::context::AppContext;
use crate::error::AppError;
use crate::models::LoginRequest;
use crate::services::auth_service;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email
    pub email: String,
    #[arg(long)]
    pub password: String,
}

pub async fn execute(ctx: &AppContext, args: LoginArgs) -> Result<(), AppError> {
    let request = LoginRequest {
        email: args.email.trim().to_string(),
        password: args.password,
    };

    let user = auth_service::login(ctx, request).await?;
    ctx.notifier
        .success(&format!("Welcome back, {} ({})", user.name, user.email));
    Ok(())
}
