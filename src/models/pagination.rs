//! Pagination types shared by the catalog listings

use serde::Deserialize;
use utoipa::IntoParams;

/// Query string of the `/paginado` routes
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number
    pub pagina: Option<i64>,
    /// Page size
    pub limite: Option<i64>,
}

/// A window of records plus the total page count for its page size
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub total_pages: i64,
    pub page: i64,
    pub page_size: i64,
}

/// ceil(total / page_size); zero records means zero pages
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        0
    } else {
        (total + page_size - 1) / page_size
    }
}

/// Row offset of a 1-based page, saturating for absurdly large pages
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page - 1).saturating_mul(page_size)
}
