//! Inkpost core types and utilities

pub mod filter;
pub mod types;
pub mod validation;

pub use filter::PostQuery;
pub use types::{Comment, Image, Post, Subscriber, User};
pub use validation::ValidationError;
