use std::collections::HashSet;

use thiserror::Error;

use sellerdesk_core::TenantId;

use crate::permissions::replenishment;
use crate::{Permission, PrincipalId, Role, TenantMembership};

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub active_tenant_id: TenantId,
    pub membership: TenantMembership,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Operation-side authorization contract.
///
/// The API layer checks these requirements before running an operation.
pub trait CommandAuthorization {
    fn required_permissions(&self) -> &[Permission];
}

/// Authorize a principal within its active tenant context.
///
/// - No IO
/// - No panics
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    if principal.active_tenant_id != principal.membership.tenant_id {
        return Err(AuthzError::TenantMismatch);
    }

    let perms: HashSet<&str> = principal
        .membership
        .permissions
        .iter()
        .map(|p| p.as_str())
        .collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Static role→permission policy.
///
/// - `admin`: everything in the tenant
/// - `planner`: run forecasts and read their results
/// - `viewer`: read forecast results
pub fn permissions_for_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(|r| r.as_str() == "admin") {
        return vec![Permission::new("*")];
    }

    let mut out: Vec<Permission> = Vec::new();
    for role in roles {
        let granted = match role.as_str() {
            "planner" => vec![replenishment::FORECAST_RUN, replenishment::FORECAST_READ],
            "viewer" => vec![replenishment::FORECAST_READ],
            _ => Vec::new(),
        };
        for p in granted {
            if !out.contains(&p) {
                out.push(p);
            }
        }
    }
    out
}
