use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. "replenishment.forecast.run").
/// The wildcard `"*"` grants everything within the active tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permissions guarding the replenishment endpoints.
pub mod replenishment {
    use super::Permission;

    /// Run a replenishment forecast.
    pub const FORECAST_RUN: Permission = Permission::from_static("replenishment.forecast.run");

    /// Read forecast jobs and their reports.
    pub const FORECAST_READ: Permission = Permission::from_static("replenishment.forecast.read");
}
