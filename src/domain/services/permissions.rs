use crate::domain::models::user::User;
use crate::error::AppError;

/// What a caller is trying to do with a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// List or retrieve inventory records.
    Read,
    /// Create, update, partially update or delete inventory records.
    Write,
    /// Ask the lab chatbot.
    Chatbot,
}

/// Checks `identity` against `access` and hands back the authorized user.
///
/// A missing identity is always `Unauthorized` (log in), never `Forbidden`
/// (ask for a different role).
pub fn authorize(identity: Option<&User>, access: Access) -> Result<&User, AppError> {
    let user = identity.ok_or(AppError::Unauthorized)?;

    match access {
        Access::Read => Ok(user),
        Access::Write if user.role.is_lab_staff() => Ok(user),
        Access::Write => Err(AppError::permission_denied()),
        Access::Chatbot if user.role.is_lab_staff() => Ok(user),
        Access::Chatbot => Err(AppError::Forbidden("You do not have permission to use the chatbot.".into())),
    }
}
