use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

///
/// Notification record as seen outside of the store.
///
/// All fields except `read` are immutable after creation.
/// `read` transitions false -> true only.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

///
/// Closed set of notification kinds.
///
/// Adding a kind is a compile-time checked change everywhere
/// the enum is matched.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Info,
    ScholarshipAccepted,
    ScholarshipRejected,
    ScholarshipUpdate,
}
