use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NotificationFilters {
    #[serde(default)]
    pub only_unread: bool,
}
