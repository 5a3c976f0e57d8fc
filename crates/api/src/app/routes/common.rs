use sellerdesk_auth::{CommandAuthorization, Permission};

/// Permissions an endpoint requires before it does any work.
pub struct CmdAuth {
    pub required: Vec<Permission>,
}

impl CmdAuth {
    pub fn requiring(permission: Permission) -> Self {
        Self {
            required: vec![permission],
        }
    }
}

impl CommandAuthorization for CmdAuth {
    fn required_permissions(&self) -> &[Permission] {
        &self.required
    }
}
