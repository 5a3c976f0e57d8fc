//! `sellerdesk-core`: shared building blocks for the seller dashboard.
//!
//! Identifiers and the domain error model. No infrastructure concerns live here.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ProductId, TenantId};
