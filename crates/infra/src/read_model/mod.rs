//! Tenant-isolated in-process storage used by the in-memory adapters.

pub mod tenant_store;

pub use tenant_store::{InMemoryTenantStore, TenantStore};
