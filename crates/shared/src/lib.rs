//! Shared configuration, errors, and role claims for GSTBooks.
//!
//! This crate provides common pieces used across all other crates:
//! - Application configuration (file + environment layering)
//! - Application-wide error types
//! - Bearer role-claim consumption for RBAC checks

pub mod auth;
pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
