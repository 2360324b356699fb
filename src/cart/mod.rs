//! Cart

pub mod models;
pub mod service;

pub use models::{CartLine, next_line_id};
pub use service::{CartError, CartStore};
