use crate::context::AppContext;
use crate::error::AppError;

pub fn execute(ctx: &AppContext) -> Result<(), AppError> {
    let user = ctx.session.current_user().ok_or(AppError::NotSignedIn)?;
    if !ctx.session.is_authenticated() {
        return Err(AppError::NotSignedIn);
    }

    ctx.notifier
        .info(&format!("{} <{}> (id {})", user.name, user.email, user.id));
    Ok(())
}
