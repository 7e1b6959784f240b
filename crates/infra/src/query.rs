//! Listing inputs and outputs: fixed-size pages, search patterns, joined rows.

use serde::{Deserialize, Serialize};

use bloodbank_core::BloodGroup;
use bloodbank_donors::Donation;
use bloodbank_recipients::BloodRequest;

/// Number of items on every listing page.
pub const PAGE_SIZE: u32 = 10;

/// A 1-based page number. Zero is treated as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PageRequest {
    pub fn new(page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * i64::from(PAGE_SIZE)
    }
}

/// One page of a listing plus enough to render pagination controls.
///
/// A page past the end has no items but still reports the real total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        let total = u64::try_from(total).unwrap_or(0);
        Self {
            items,
            page: request.page.max(1),
            page_size: PAGE_SIZE,
            total,
            total_pages: total.div_ceil(u64::from(PAGE_SIZE)),
        }
    }
}

/// Turn a free-text search term into a `LIKE` substring pattern.
///
/// Blank terms mean "no filter". `%`, `_` and `\` in the term match
/// literally (queries use `ESCAPE '\'`).
pub fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    Some(pattern)
}

/// Exact-match filter value; blank means "no filter".
pub fn exact_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A donation together with the donor it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonationListing {
    #[serde(flatten)]
    pub donation: Donation,
    pub donor_name: String,
    pub donor_blood_group: BloodGroup,
}

/// A blood request together with the recipient's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestListing {
    #[serde(flatten)]
    pub request: BloodRequest,
    pub recipient_name: String,
}
