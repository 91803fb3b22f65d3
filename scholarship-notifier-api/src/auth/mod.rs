mod jwt_authorization_validator;
mod jwt_util;
mod role;
mod websocket_auth;

pub mod dto;

pub use jwt_authorization_validator::*;
pub use jwt_util::*;
pub use role::*;
pub use websocket_auth::*;

use crate::error::Error;
use dto::User;

///
/// Validates that user has all required roles.
///
/// ### Errors
/// - [Error::MissingRole] when any of the roles is missing
///
pub fn require_all_roles(user: &User, roles: &[Role]) -> Result<(), Error> {
    let user_has_all_roles = roles
        .iter()
        .map(|role| role.as_ref())
        .all(|role| user.roles.iter().any(|user_role| user_role == role));

    match user_has_all_roles {
        true => Ok(()),
        false => Err(Error::MissingRole),
    }
}
