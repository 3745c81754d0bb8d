use serde::{Deserialize, Serialize};

use crate::{
    config::CATALOG_MOUNT,
    entities::movies,
    error::{AppError, FieldError},
};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 20;

/// Raw `?page=&per_page=` values, kept as text so malformed input can be
/// reported per field instead of rejecting the whole query string.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, per_page: DEFAULT_PER_PAGE }
    }
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Validates both parameters and reports every offending field at once.
    pub fn from_query(query: &ListQuery) -> Result<Self, AppError> {
        let mut errors = Vec::new();

        let page = parse_bounded(query.page.as_deref(), "page", DEFAULT_PAGE, 1, None)
            .map_err(|e| errors.push(e))
            .ok();
        let per_page = parse_bounded(
            query.per_page.as_deref(),
            "per_page",
            DEFAULT_PER_PAGE,
            1,
            Some(MAX_PER_PAGE),
        )
        .map_err(|e| errors.push(e))
        .ok();

        match (page, per_page) {
            (Some(page), Some(per_page)) => Ok(Self { page, per_page }),
            _ => Err(AppError::Validation(errors)),
        }
    }

    /// Rows to skip before this page. Saturates so absurd page numbers simply
    /// land past the end of the catalog.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.per_page)
    }

    pub fn prev_link(&self) -> Option<String> {
        (self.page > 1).then(|| page_link(self.page - 1, self.per_page))
    }

    pub fn next_link(&self, total_pages: u64) -> Option<String> {
        (self.page < total_pages).then(|| page_link(self.page + 1, self.per_page))
    }
}

fn parse_bounded(
    raw: Option<&str>,
    field: &'static str,
    default: u64,
    min: u64,
    max: Option<u64>,
) -> Result<u64, FieldError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let trimmed = raw.trim();
    let value = match trimmed.parse::<i64>() {
        Ok(value) if value < min as i64 => {
            return Err(FieldError::greater_than_equal("query", field, raw, min));
        },
        Ok(value) => value as u64,
        // Well-formed integers wider than 64 bits clamp to the far end of
        // their sign, so they still hit the range checks below.
        Err(_) if is_digits(trimmed.strip_prefix('+').unwrap_or(trimmed)) => u64::MAX,
        Err(_) if trimmed.strip_prefix('-').is_some_and(is_digits) => {
            return Err(FieldError::greater_than_equal("query", field, raw, min));
        },
        Err(_) => return Err(FieldError::int_parsing("query", field, raw)),
    };

    if let Some(max) = max.filter(|&max| value > max) {
        return Err(FieldError::less_than_equal("query", field, raw, max));
    }

    Ok(value)
}

pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn page_link(page: u64, per_page: u64) -> String {
    format!("{CATALOG_MOUNT}/movies/?page={page}&per_page={per_page}")
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageResult {
    pub movies: Vec<movies::Model>,
    pub prev_page: Option<String>,
    pub next_page: Option<String>,
    pub total_pages: u64,
    pub total_items: u64,
}

impl PageResult {
    /// Assembles a page from its rows and the catalog size. `None` when the
    /// slice is empty, which callers surface as "No movies found."
    pub fn assemble(
        req: PageRequest,
        movies: Vec<movies::Model>,
        total_items: u64,
    ) -> Option<Self> {
        if movies.is_empty() {
            return None;
        }

        let total_pages = req.total_pages(total_items);
        Some(Self {
            movies,
            prev_page: req.prev_link(),
            next_page: req.next_link(total_pages),
            total_pages,
            total_items,
        })
    }
}
