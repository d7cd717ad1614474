use clap::Args;

use crate::context::AppContext;
use crate::error::AppError;
use crate::models::RegisterRequest;
use crate::services::auth_service;

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Full name, letters and spaces only
    pub name: String,
    pub email: String,
    /// At least 8 characters with upper and lower case letters, a digit and one of @$!%*?&
    #[arg(long)]
    pub password: String,
    /// Repeat the password
    #[arg(long)]
    pub confirm: String,
}

pub async fn execute(ctx: &AppContext, args: RegisterArgs) -> Result<(), AppError> {
    let request = RegisterRequest {
        name: args.name.trim().to_string(),
        email: args.email.trim().to_string(),
        password: args.password,
    };

    let message = auth_service::register(ctx, request, &args.confirm).await?;
    ctx.notifier.success(&message);
    ctx.notifier.info("You can now sign in with `login`.");
    Ok(())
}
