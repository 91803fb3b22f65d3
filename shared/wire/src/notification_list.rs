use super::Notification;
use serde::{Deserialize, Serialize};

///
/// One page of notifications, newest first.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationList {
    pub items: Vec<Notification>,
    pub pagination: PaginationMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    ///
    /// `page` and `limit` are the effective values used by the store,
    /// not the raw values requested by the caller.
    ///
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let total_pages =
            u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);

        Self {
            total,
            page,
            limit,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}
