use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// Pagination parameters for list queries. Both fields are optional; when
/// neither is given the listing falls back to the first page at the default
/// size, matching the catalogue's 20-per-page listing.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: Option<i64>,
    /// Number of items per page.
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn effective_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Limit after applying the default and the cap.
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    /// SQL OFFSET derived from the effective page and limit.
    pub fn offset(&self) -> i64 {
        (self.effective_page() - 1) * self.effective_limit()
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: None, limit: None }
    }
}

/// Paginated response wrapper with metadata
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    /// Current page number (1-indexed)
    pub page: i64,
    /// Number of items per page
    pub limit: i64,
    /// Total number of items across all pages
    pub total_items: i64,
    /// Total number of pages
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if limit > 0 { (total_items + limit - 1) / limit } else { 1 };

        Self {
            data,
            page,
            limit,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_twenty() {
        let params = PaginationParams::default();
        assert_eq!(params.effective_page(), 1);
        assert_eq!(params.effective_limit(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn limit_is_capped() {
        let params = PaginationParams {
            page: Some(2),
            limit: Some(10_000),
        };
        assert_eq!(params.effective_limit(), PaginationParams::MAX_LIMIT);
        assert_eq!(params.offset(), PaginationParams::MAX_LIMIT);
    }

    #[test]
    fn total_pages_rounds_up() {
        let response = PaginatedResponse::new(vec![1, 2, 3], 1, 20, 41);
        assert_eq!(response.total_pages, 3);
    }
}
