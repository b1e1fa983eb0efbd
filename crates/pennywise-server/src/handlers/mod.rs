//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific area of the site.

pub mod auth;
pub mod budget;
pub mod dashboard;
pub mod expenses;

// Re-export all handlers for use in router
pub use auth::*;
pub use budget::*;
pub use dashboard::*;
pub use expenses::*;
