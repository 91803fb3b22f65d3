use serde::Deserialize;
use uuid::Uuid;

///
/// Claims this service reads from an access token.
///
/// `sub` doubles as the notification recipient id and
/// `realm_access.roles` carries the producer role. Any other
/// claim of the token is ignored.
///
#[derive(Debug, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,
    pub exp: i64,
    pub realm_access: RealmAccess,
}

#[derive(Debug, Deserialize)]
pub struct RealmAccess {
    pub roles: Vec<String>,
}
