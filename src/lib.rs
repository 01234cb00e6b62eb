//! # habr
//!
//! Data-access layer of a blogging platform. Publications are written by users,
//! classified by genres and tags, discussed in comments and upvoted by readers.
//!
//! Every table has a model under [`db::models`] with a `Manager` trait implemented
//! for [`db::DatabaseConnection`], and a `TxManager` trait implemented for
//! [`db::DatabaseTransaction`] where writes span several statements.
//! Both Postgres and `SQLite` are supported.

// =========================================================================
//                  Canonical lints for whole crate
// =========================================================================
// Lints are warnings during development, CI denies them.
#![warn(
    clippy::all,
    missing_docs,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::blanket_clippy_restriction_lints,
    reason = "Restriction lints are opted into as a group and allowed one by one below."
)]
#![warn(clippy::restriction)]
//
// =========================================================================
//   Individually blanket-allow single lints relevant to this whole crate
// =========================================================================
#![allow(clippy::implicit_return, reason = "This is idiomatic Rust")]
#![allow(
    clippy::multiple_crate_versions,
    reason = "sqlx and clap pull in overlapping transitive versions"
)]
#![allow(
    clippy::std_instead_of_alloc,
    reason = "We're not interested in becoming no-std compatible"
)]
#![allow(
    clippy::std_instead_of_core,
    reason = "Import items from std instead of core"
)]
#![allow(
    clippy::mod_module_files,
    reason = "Each model is a directory with `mod.rs` and `manager.rs`"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Every public item awaits a database round trip, inlining is irrelevant"
)]
#![allow(
    clippy::exhaustive_structs,
    reason = "Models are plain row structs constructed by callers"
)]
#![allow(
    clippy::exhaustive_enums,
    reason = "Database kinds are matched exhaustively on purpose"
)]
#![allow(
    clippy::question_mark_used,
    reason = "We rely on propagating errors with question mark extensively"
)]
#![allow(
    clippy::single_call_fn,
    reason = "We tend to break up long functions into smaller ones, so this lint is not useful"
)]
#![allow(
    clippy::arithmetic_side_effects,
    reason = "Only page offsets are computed, from clamped page numbers"
)]
#![allow(
    clippy::arbitrary_source_item_ordering,
    reason = "Manager methods follow the order of their trait declaration"
)]

/// Database connection, schema and table models.
pub mod db;
/// Services composing the table managers.
pub mod service;
/// Command line interface.
pub mod utils;
