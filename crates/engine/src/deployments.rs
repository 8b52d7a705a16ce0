//! Deployment operations. Deployments are a tenant-administrator surface:
//! plain users get 403 regardless of whether the deployment exists.

use flowgate_core::context::RequestContext;
use flowgate_core::definition::{ProcessDefinition, DEFAULT_CATEGORY};
use flowgate_core::deployment::{Deployment, NewDeployment};
use flowgate_core::error::CoreError;
use flowgate_core::ordering::OrderBy;
use flowgate_core::paging::{PagedList, Paging};
use flowgate_core::types::now;

use crate::state::StoredDefinition;
use crate::WorkflowEngine;

const DEPLOYMENT_ORDER_FIELDS: &[&str] = &["id", "name", "deployedAt"];

impl WorkflowEngine {
    pub fn create_deployment(
        &self,
        ctx: &RequestContext,
        body: NewDeployment,
    ) -> Result<Deployment, CoreError> {
        if body.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Deployment name must not be empty".into(),
            ));
        }
        let mut state = self.write();
        require_admin(&state, ctx)?;

        let deployment_id = state.next_id();
        let mut definitions = Vec::with_capacity(body.definitions.len());
        for spec in &body.definitions {
            let id = state.next_id();
            definitions.push((id, spec.clone()));
        }

        let tenant = state.tenant_mut(ctx)?;
        let deployment = Deployment {
            id: deployment_id.clone(),
            name: body.name.clone(),
            deployed_at: Some(now()),
        };
        for (id, spec) in definitions {
            let version = 1 + tenant
                .definitions
                .iter()
                .filter(|d| d.entity.key == spec.key)
                .map(|d| d.entity.version)
                .max()
                .unwrap_or(0);
            tenant.definitions.push(StoredDefinition {
                entity: ProcessDefinition {
                    id: format!("{}:{}:{}", spec.key, version, id),
                    key: spec.key.clone(),
                    version,
                    name: spec.name.clone(),
                    deployment_id: deployment_id.clone(),
                    title: spec.title.clone(),
                    description: spec.description.clone(),
                    category: spec
                        .category
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                    start_form_resource_key: spec.start_form_resource_key.clone(),
                    graphic_notation_defined: false,
                },
                start_form_fields: spec.start_form_fields.clone(),
                tasks: spec.tasks.clone(),
            });
        }
        tenant.deployments.push(deployment.clone());
        tracing::info!(
            tenant = %ctx.tenant,
            deployment_id = %deployment.id,
            name = %deployment.name,
            "Deployment created"
        );
        Ok(deployment)
    }

    pub fn list_deployments(
        &self,
        ctx: &RequestContext,
        order_by: Option<&OrderBy>,
        paging: &Paging,
    ) -> Result<PagedList<Deployment>, CoreError> {
        paging.validate()?;
        let state = self.read();
        require_admin(&state, ctx)?;
        let tenant = state.tenant(ctx)?;

        let mut matched: Vec<Deployment> = tenant.deployments.clone();
        if let Some(order) = order_by {
            order.validate_field(DEPLOYMENT_ORDER_FIELDS)?;
            matched.sort_by(|a, b| {
                let ordering = match order.field.as_str() {
                    "name" => a.name.cmp(&b.name),
                    "deployedAt" => a.deployed_at.cmp(&b.deployed_at),
                    _ => numeric_id(&a.id).cmp(&numeric_id(&b.id)),
                };
                if order.descending() {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        Ok(PagedList::paginate(matched, paging))
    }

    pub fn get_deployment(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Deployment, CoreError> {
        let state = self.read();
        require_admin(&state, ctx)?;
        let tenant = state.tenant(ctx)?;
        tenant
            .deployments
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Deployment", id))
    }

    /// Delete a deployment and the definitions it carries. Instances
    /// already started from those definitions keep running.
    pub fn delete_deployment(&self, ctx: &RequestContext, id: &str) -> Result<(), CoreError> {
        let mut state = self.write();
        require_admin(&state, ctx)?;
        let tenant = state.tenant_mut(ctx)?;
        let before = tenant.deployments.len();
        tenant.deployments.retain(|d| d.id != id);
        if tenant.deployments.len() == before {
            return Err(CoreError::not_found("Deployment", id));
        }
        tenant.definitions.retain(|d| d.entity.deployment_id != id);
        tracing::info!(tenant = %ctx.tenant, deployment_id = %id, "Deployment deleted");
        Ok(())
    }
}

fn require_admin(
    state: &crate::state::EngineState,
    ctx: &RequestContext,
) -> Result<(), CoreError> {
    let tenant = state.tenant(ctx)?;
    if tenant.is_admin(&ctx.user) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Deployments are only accessible to a tenant administrator".into(),
        ))
    }
}

