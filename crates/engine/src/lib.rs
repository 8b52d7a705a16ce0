//! In-memory workflow engine behind the flowgate REST surface.
//!
//! The engine is the authority for everything the API serves: the user and
//! group directory, deployments and their definitions, process instances,
//! the task lifecycle, variables, items, and activities. All state is
//! tenant-scoped and held in process memory; durable storage belongs to
//! the surrounding platform, not to this crate.
//!
//! Every operation takes an explicit [`RequestContext`] and resolves
//! resources inside that tenant only, so a foreign tenant's id simply does
//! not exist from the caller's point of view.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use flowgate_core::context::RequestContext;
use flowgate_core::error::CoreError;

mod definitions;
mod deployments;
mod processes;
mod query;
mod state;
mod tasks;
mod variables;

use state::{EngineState, UserRecord};

#[derive(Clone, Default)]
pub struct WorkflowEngine {
    inner: Arc<RwLock<EngineState>>,
}

impl WorkflowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a user in a tenant, creating the tenant on first use.
    pub fn register_user(&self, tenant: &str, user: &str, password: &str, admin: bool) {
        let mut state = self.write();
        state.ensure_tenant(tenant).users.insert(
            user.to_string(),
            UserRecord {
                password: password.to_string(),
                admin,
            },
        );
        tracing::debug!(tenant, user, admin, "Registered user");
    }

    /// Add a user to a group inside a tenant.
    pub fn add_group_member(&self, tenant: &str, group: &str, user: &str) {
        let mut state = self.write();
        state
            .ensure_tenant(tenant)
            .groups
            .entry(group.to_string())
            .or_default()
            .insert(user.to_string());
    }

    /// Check HTTP Basic credentials (`user@tenant` / password) against the
    /// directory.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<RequestContext, CoreError> {
        let ctx = RequestContext::from_username(username);
        let state = self.read();
        let valid = state
            .tenants
            .get(&ctx.tenant)
            .and_then(|t| t.users.get(&ctx.user))
            .is_some_and(|u| u.password == password);
        if valid {
            Ok(ctx)
        } else {
            Err(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        }
    }

    /// Whether the user is an administrator of the context's tenant.
    pub fn is_admin(&self, ctx: &RequestContext) -> bool {
        self.read()
            .tenants
            .get(&ctx.tenant)
            .is_some_and(|t| t.is_admin(&ctx.user))
    }
}
