//! Services composing the database managers for the web layer.

/// Comment moderation and publication comments.
pub mod comment;
