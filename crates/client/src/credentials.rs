use flowgate_core::context::RequestContext;

/// The identity a call acts as, plus the secret that proves it.
///
/// Passed explicitly into every client call -- the client itself holds no
/// ambient "current user", so call sites stay order-independent and can
/// interleave identities freely.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The tenant/user identity the server scopes the call by.
    pub context: RequestContext,
    password: String,
}

impl Credentials {
    pub fn new(
        tenant: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            context: RequestContext::new(tenant, user),
            password: password.into(),
        }
    }

    /// The tenant-qualified HTTP Basic username (`user@tenant`).
    pub fn username(&self) -> String {
        self.context.username()
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}
