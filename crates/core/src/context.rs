//! The acting identity carried into every engine operation and client call.

/// Tenant used when credentials carry no explicit tenant qualifier.
pub const DEFAULT_TENANT: &str = "-default-";

/// The tenant and user a call acts as.
///
/// Passed explicitly as a value into every operation. There is no ambient
/// "current context" anywhere: a call sees exactly the identity it was
/// handed, which keeps call sites order-independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Isolation boundary the call is scoped to.
    pub tenant: String,
    /// Acting user, unqualified (no tenant suffix).
    pub user: String,
}

impl RequestContext {
    pub fn new(tenant: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            user: user.into(),
        }
    }

    /// Parse a tenant-qualified username (`user@tenant`).
    ///
    /// A name without `@` falls into [`DEFAULT_TENANT`]. The last `@` wins,
    /// so user names containing `@` (email-style) still qualify correctly.
    pub fn from_username(name: &str) -> Self {
        match name.rsplit_once('@') {
            Some((user, tenant)) if !tenant.is_empty() => Self::new(tenant, user),
            _ => Self::new(DEFAULT_TENANT, name),
        }
    }

    /// The tenant-qualified form used as the HTTP Basic username.
    pub fn username(&self) -> String {
        if self.tenant == DEFAULT_TENANT {
            self.user.clone()
        } else {
            format!("{}@{}", self.user, self.tenant)
        }
    }
}
