//! Page/limit arithmetic for list and search results.
//!
//! Raw `page` and `limit` come straight from the query string. They are read
//! with integer-prefix semantics (`"3"`, `" 3"`, `"3abc"` and `"3.9"` all mean
//! 3), fall back to the defaults when no digits lead the value, and are then
//! clamped to at least 1. There is no upper bound on the page: asking for a
//! page past the end yields an empty slice, not an error.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Pagination metadata returned to clients alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub limit: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

/// Offset/limit to fetch from the store plus the metadata for the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: u64,
    pub pagination: Pagination,
}

/// Parse the leading integer of `raw`, ignoring leading whitespace.
///
/// Returns `None` when no digit follows the optional sign. Values outside the
/// `i64` range saturate.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        let d = i64::from(b - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(d)
        } else {
            value.saturating_add(d)
        };
    }
    seen.then_some(value)
}

fn normalize(raw: Option<&str>, default: u64) -> u64 {
    match raw.and_then(parse_int_prefix) {
        Some(n) if n >= 1 => n as u64,
        Some(_) => 1,
        None => default,
    }
}

/// Compute skip/limit and pagination metadata for `total` matching records.
pub fn paginate(page: Option<&str>, limit: Option<&str>, total: u64) -> PageWindow {
    let current_page = normalize(page, DEFAULT_PAGE);
    let items_per_page = normalize(limit, DEFAULT_LIMIT);

    let skip = (current_page - 1).saturating_mul(items_per_page);
    let total_pages = total.div_ceil(items_per_page);
    let has_next_page = current_page < total_pages;
    let has_prev_page = current_page > 1;

    PageWindow {
        skip,
        limit: items_per_page,
        pagination: Pagination {
            total,
            total_pages,
            current_page,
            limit: items_per_page,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| current_page + 1),
            prev_page: has_prev_page.then(|| current_page - 1),
        },
    }
}
