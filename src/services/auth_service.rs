use tracing::{info, warn};

use crate::api::ApiError;
use crate::context::AppContext;
use crate::error::AppError;
use crate::models::{Credentials, LoginRequest, RegisterRequest, User};
use crate::validation::{validate_login, validate_registration};

/// Sign in and persist the returned token.
///
/// Any failure leaves the session signed out.
pub async fn login(ctx: &AppContext, request: LoginRequest) -> Result<User, AppError> {
    validate_login(&request)?;

    let result = ctx.client.login(&request).await;
    let envelope = match result {
        Ok(envelope) => envelope,
        Err(e) => {
            if let Err(clear_err) = ctx.session.sign_out() {
                warn!("Failed to clear credentials after login failure: {}", clear_err);
            }
            return Err(e.into());
        }
    };

    let Some(data) = envelope.data.filter(|d| !d.token.is_empty()) else {
        ctx.session.sign_out()?;
        return Err(ApiError::InvalidResponse("login response has no token".to_string()).into());
    };

    let user = data.user.clone();
    ctx.session.sign_in(Credentials {
        token: data.token,
        user: data.user,
    })?;
    info!("Signed in as {} ({} token)", user.email, data.token_type);

    Ok(user)
}

/// Create an account; returns the backend's confirmation message.
pub async fn register(
    ctx: &AppContext,
    request: RegisterRequest,
    confirm_password: &str,
) -> Result<String, AppError> {
    validate_registration(&request, confirm_password)?;

    let envelope = ctx.client.register(&request).await?;
    info!("Registered account for {}", request.email);

    let message = match envelope.data {
        Some(serde_json::Value::String(text)) if !text.is_empty() => text,
        _ => envelope.message,
    };
    Ok(message)
}

pub fn logout(ctx: &AppContext) -> Result<(), AppError> {
    ctx.session.sign_out()?;
    ctx.suppliers.invalidate();
    info!("Signed out");
    Ok(())
}
