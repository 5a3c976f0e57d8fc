//! `sellerdesk-auth`: authentication/authorization boundary.
//!
//! Decoupled from HTTP and storage: the API layer feeds bearer tokens in and
//! gets tenant-scoped principals and allow/deny decisions out.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, CommandAuthorization, Principal, authorize, permissions_for_roles};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use permissions::Permission;
pub use principal::{PrincipalId, TenantMembership};
pub use roles::Role;
