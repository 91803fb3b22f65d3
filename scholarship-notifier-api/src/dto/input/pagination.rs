use serde::Deserialize;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Pagination {
    ///
    /// Page requested by the client, clamped to 1 when missing or zero
    ///
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    ///
    /// Page size requested by the client, clamped to [1, MAX_PAGE_LIMIT]
    ///
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
    }
}
