//! API-side authorization guard.
//!
//! Enforced at the route boundary before any catalog read, so the engine and
//! infra stay auth-agnostic.

use sellerdesk_auth::{AuthzError, CommandAuthorization, Principal, authorize};

use crate::context::{PrincipalContext, TenantContext};

/// Check the operation's required permissions in the current request context.
pub fn authorize_command<C: CommandAuthorization>(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    command: &C,
) -> Result<(), AuthzError> {
    let principal = Principal {
        principal_id: principal.principal_id(),
        active_tenant_id: tenant.tenant_id(),
        membership: principal.membership(tenant),
    };

    for perm in command.required_permissions() {
        authorize(&principal, perm)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::routes::common::CmdAuth;
    use sellerdesk_auth::{PrincipalId, Role, permissions::replenishment};
    use sellerdesk_core::TenantId;

    fn ctx(role: &'static str) -> (TenantContext, PrincipalContext) {
        (
            TenantContext::new(TenantId::new()),
            PrincipalContext::new(PrincipalId::new(), vec![Role::new(role)]),
        )
    }

    fn run_op() -> CmdAuth {
        CmdAuth::requiring(replenishment::FORECAST_RUN)
    }

    #[test]
    fn planner_may_run_forecasts() {
        let (t, p) = ctx("planner");
        assert!(authorize_command(&t, &p, &run_op()).is_ok());
    }

    #[test]
    fn viewer_may_not_run_forecasts() {
        let (t, p) = ctx("viewer");
        assert!(matches!(
            authorize_command(&t, &p, &run_op()),
            Err(AuthzError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_wildcard_covers_everything() {
        let (t, p) = ctx("admin");
        assert!(authorize_command(&t, &p, &run_op()).is_ok());
    }

    #[test]
    fn viewer_may_read_jobs() {
        let (t, p) = ctx("viewer");
        let read = CmdAuth::requiring(replenishment::FORECAST_READ);
        assert_eq!(read.required, vec![replenishment::FORECAST_READ]);
        assert!(authorize_command(&t, &p, &read).is_ok());
    }
}
