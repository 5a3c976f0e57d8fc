use sellerdesk_auth::{PrincipalId, Role, TenantMembership, permissions_for_roles};
use sellerdesk_core::TenantId;

/// Tenant context for a request.
///
/// Taken from the verified token; every catalog read and job lookup is scoped by it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Principal context for a request (authenticated identity + roles).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    roles: Vec<Role>,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, roles: Vec<Role>) -> Self {
        Self { principal_id, roles }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Membership in `tenant` with permissions expanded from the token's roles.
    pub fn membership(&self, tenant: &TenantContext) -> TenantMembership {
        TenantMembership {
            tenant_id: tenant.tenant_id(),
            roles: self.roles.clone(),
            permissions: permissions_for_roles(&self.roles),
        }
    }
}
