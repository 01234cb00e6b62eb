//! Author of publications and comments. Only ever read through a join.
use super::try_get_nullable;
use serde::{Deserialize, Serialize};
use sqlx::{any::AnyRow, Row as _};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
/// Model for a user.
pub struct User {
    /// User identifier.
    pub id: i64,
    /// Unique login.
    pub login: String,
    /// Display name.
    pub full_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Reputation of the user.
    pub karma: i64,
}

impl User {
    /// Decode the `"user"` columns of a row that left-joins the user table.
    /// Returns `None` when the join found no user.
    ///
    /// # Errors
    /// Errors if a present column has an unexpected type.
    pub fn from_joined_row(row: &AnyRow) -> Result<Option<Self>, sqlx::Error> {
        let Some(id) = try_get_nullable::<i64>(row, "user_id")? else {
            return Ok(None);
        };
        Ok(Some(Self {
            id,
            login: row.try_get("user_login")?,
            full_name: try_get_nullable(row, "user_full_name")?,
            email: try_get_nullable(row, "user_email")?,
            karma: row.try_get("user_karma")?,
        }))
    }
}
