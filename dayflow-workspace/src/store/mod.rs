//! Row-level reads and writes, one module per table family
//!
//! Every function takes a plain `&Connection` so it composes inside the
//! transaction opened by [`crate::db::Database::write`].

pub mod activity;
pub mod cards;
pub mod columns;
pub mod roadmaps;
pub mod tools;
pub mod users;
pub mod workspaces;
