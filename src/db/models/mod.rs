//! This module contains all the sqlx structs for the database tables.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, Any, Decode, Row as _, Type, ValueRef as _};

/// sqlx structs for comment table.
pub mod comment;
/// sqlx structs for genre table.
pub mod genre;
/// sqlx structs for publication table.
pub mod publication;
/// sqlx structs for tag table.
pub mod tag;
/// sqlx structs for user table.
pub mod user;

/// Number of rows on a single page of a paginated listing.
pub const PAGE_SIZE: i64 = 10;

/// Format of timestamps selected as text from both backends.
/// Postgres renders microseconds and `SQLite` milliseconds, `%.f` accepts both (or none).
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Row offset of a 1-indexed page. Pages below 1 are treated as the first page.
#[must_use]
pub const fn page_offset(page: i64) -> i64 {
    let page = if page < 1 { 1 } else { page };
    (page - 1).saturating_mul(PAGE_SIZE)
}

/// Decode a nullable column, `None` for SQL `NULL`.
/// The `Any` driver refuses to decode `NULL` into an `Option`, so the raw value is checked first.
///
/// # Errors
/// Errors if the column is missing or a present value has an unexpected type.
pub fn try_get_nullable<'r, T>(row: &'r AnyRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: Decode<'r, Any> + Type<Any>,
{
    if row.try_get_raw(column)?.is_null() {
        return Ok(None);
    }
    row.try_get(column).map(Some)
}

/// Parse a timestamp column that was selected as text.
///
/// # Errors
/// Errors if the text is not a `YYYY-MM-DD HH:MM:SS[.fraction]` timestamp.
pub fn parse_datetime(column: &str, raw: &str) -> Result<NaiveDateTime, sqlx::Error> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).map_err(|err| sqlx::Error::ColumnDecode {
        index: column.to_owned(),
        source: Box::new(err),
    })
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// One page of a listing, together with the row count of the whole listing.
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// Total number of rows, used by callers to compute the number of pages.
    pub total: i64,
}

impl<T> Page<T> {
    /// Create a new page.
    #[must_use]
    pub const fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    /// Number of pages of `PAGE_SIZE` needed to show `total` rows.
    #[must_use]
    pub const fn pages_count(&self) -> i64 {
        (self.total + PAGE_SIZE - 1) / PAGE_SIZE
    }
}
