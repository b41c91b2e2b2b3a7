//! Authentication: argon2 password hashing and the basic-auth middleware.

pub mod middleware;
pub mod password;
