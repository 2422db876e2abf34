//! Shared types, errors, and configuration for Tripsplit.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes and minor-unit money values
//! - Typed IDs for trips, expenses, and settlements
//! - Participant identifiers
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
