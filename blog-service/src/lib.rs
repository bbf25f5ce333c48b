//! blog-service
//!
//! Core of the blogging platform: feed building over viewpoints, the
//! in-process global timeline cache, the follow graph, and the access
//! policy for gated actions. Entity storage is behind the `BlogStore`
//! trait with Postgres and in-memory implementations; authentication and
//! rendering live in neighboring services.

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repository;
pub mod services;

pub use error::{AppError, Result};
