//! Process-definition queries. Definitions are readable by every
//! authenticated user of the tenant; they are only ever written through
//! deployments.

use flowgate_core::context::RequestContext;
use flowgate_core::definition::ProcessDefinition;
use flowgate_core::error::CoreError;
use flowgate_core::form::FormModelElement;
use flowgate_core::ordering::OrderBy;
use flowgate_core::paging::{PagedList, Paging};
use flowgate_core::where_clause::{Comparator, WhereClause};

use crate::query::{like_match, unsupported_filter};
use crate::WorkflowEngine;

const DEFINITION_ORDER_FIELDS: &[&str] =
    &["id", "key", "version", "name", "deploymentId", "category"];

#[derive(Default)]
struct DefinitionFilter {
    category: Option<String>,
    category_like: Option<String>,
    key: Option<String>,
    key_like: Option<String>,
    name: Option<String>,
    name_like: Option<String>,
    deployment_id: Option<String>,
    version: Option<i32>,
}

impl DefinitionFilter {
    fn from_clause(clause: &WhereClause) -> Result<Self, CoreError> {
        let mut filter = DefinitionFilter::default();
        for predicate in &clause.predicates {
            let value = predicate.value.clone();
            match (predicate.property.as_str(), predicate.comparator) {
                ("category", Comparator::Equals) => filter.category = Some(value),
                ("category", Comparator::Matches) => filter.category_like = Some(value),
                ("key", Comparator::Equals) => filter.key = Some(value),
                ("key", Comparator::Matches) => filter.key_like = Some(value),
                ("name", Comparator::Equals) => filter.name = Some(value),
                ("name", Comparator::Matches) => filter.name_like = Some(value),
                ("deploymentId", Comparator::Equals) => filter.deployment_id = Some(value),
                ("version", Comparator::Equals) => {
                    filter.version = Some(value.parse().map_err(|_| {
                        CoreError::Validation(format!("Invalid version value: {value}"))
                    })?);
                }
                (property, comparator) => {
                    return Err(unsupported_filter(property, comparator));
                }
            }
        }
        Ok(filter)
    }

    fn accepts(&self, definition: &ProcessDefinition) -> bool {
        self.category.as_deref().is_none_or(|c| c == definition.category)
            && self
                .category_like
                .as_deref()
                .is_none_or(|p| like_match(p, &definition.category))
            && self.key.as_deref().is_none_or(|k| k == definition.key)
            && self
                .key_like
                .as_deref()
                .is_none_or(|p| like_match(p, &definition.key))
            && self.name.as_deref().is_none_or(|n| n == definition.name)
            && self
                .name_like
                .as_deref()
                .is_none_or(|p| like_match(p, &definition.name))
            && self
                .deployment_id
                .as_deref()
                .is_none_or(|d| d == definition.deployment_id)
            && self.version.is_none_or(|v| v == definition.version)
    }
}

impl WorkflowEngine {
    pub fn list_process_definitions(
        &self,
        ctx: &RequestContext,
        clause: Option<&WhereClause>,
        order_by: Option<&OrderBy>,
        paging: &Paging,
    ) -> Result<PagedList<ProcessDefinition>, CoreError> {
        paging.validate()?;
        let filter = match clause {
            Some(clause) => DefinitionFilter::from_clause(clause)?,
            None => DefinitionFilter::default(),
        };
        let state = self.read();
        let tenant = state.tenant(ctx)?;

        let mut matched: Vec<ProcessDefinition> = tenant
            .definitions
            .iter()
            .map(|d| d.entity.clone())
            .filter(|d| filter.accepts(d))
            .collect();
        if let Some(order) = order_by {
            order.validate_field(DEFINITION_ORDER_FIELDS)?;
            matched.sort_by(|a, b| {
                let ordering = match order.field.as_str() {
                    "key" => a.key.cmp(&b.key),
                    "version" => a.version.cmp(&b.version),
                    "name" => a.name.cmp(&b.name),
                    "deploymentId" => a.deployment_id.cmp(&b.deployment_id),
                    "category" => a.category.cmp(&b.category),
                    _ => a.id.cmp(&b.id),
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

    pub fn get_process_definition(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ProcessDefinition, CoreError> {
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        tenant
            .definition(id)
            .map(|d| d.entity.clone())
            .ok_or_else(|| CoreError::not_found("ProcessDefinition", id))
    }

    pub fn start_form_model(
        &self,
        ctx: &RequestContext,
        definition_id: &str,
        paging: &Paging,
    ) -> Result<PagedList<FormModelElement>, CoreError> {
        paging.validate()?;
        let state = self.read();
        let tenant = state.tenant(ctx)?;
        let definition = tenant
            .definition(definition_id)
            .ok_or_else(|| CoreError::not_found("ProcessDefinition", definition_id))?;
        Ok(PagedList::paginate(
            definition.start_form_fields.clone(),
            paging,
        ))
    }
}
