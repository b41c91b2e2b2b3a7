//! Database layer.
//!
//! Follows the repository pattern: each table has a repository in [`handlers`]
//! that operates over a borrowed `PgConnection`, returning the request/response
//! structs in [`models`]. Errors are categorized into [`errors::DbError`] so
//! handler code can react to constraint violations without string-matching.

pub mod errors;
pub mod handlers;
pub mod models;
