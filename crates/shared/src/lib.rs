//! Shared types, errors, and configuration for Spendwise.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Supported display currencies
//! - Application-wide error types
//! - Configuration management
//! - JWT claims, token service, and auth payloads
//! - Transactional email

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::{Claims, TokenKind, TokenPair};
pub use config::{AppConfig, EmailConfig, JwtConfig, ServerConfig, StoreConfig};
pub use email::{EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use jwt::{IssuedToken, JwtError, JwtService};
