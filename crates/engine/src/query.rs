//! Shared filter helpers: the SQL-`%` pattern matcher, the status filter,
//! and typed literal parsing for where-clause values.

use flowgate_core::error::CoreError;
use flowgate_core::types::Timestamp;
use flowgate_core::variable::{VariableValue, VariableTypeError};
use flowgate_core::{timefmt, where_clause::Comparator};

/// Match a `MATCHES(...)` pattern with `%` wildcards against a value.
///
/// Without a wildcard the pattern is an exact match. Segments between
/// wildcards must occur in order; the first and last segments stay
/// anchored to the value's ends.
pub(crate) fn like_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains('%') {
        return pattern == value;
    }
    let segments: Vec<&str> = pattern.split('%').collect();
    let first = segments[0];
    let last = segments[segments.len() - 1];
    if !value.starts_with(first) || value.len() < first.len() + last.len() {
        return false;
    }
    let mut rest = &value[first.len()..value.len() - last.len()];
    for segment in &segments[1..segments.len() - 1] {
        if segment.is_empty() {
            continue;
        }
        match rest.find(segment) {
            Some(at) => rest = &rest[at + segment.len()..],
            None => return false,
        }
    }
    value.ends_with(last)
}

/// The `status` filter shared by process and task collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusFilter {
    Active,
    Completed,
    Any,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            "any" => Ok(StatusFilter::Any),
            other => Err(CoreError::Validation(format!(
                "Invalid status parameter: {other}"
            ))),
        }
    }

    pub fn accepts(&self, completed: bool) -> bool {
        match self {
            StatusFilter::Active => !completed,
            StatusFilter::Completed => completed,
            StatusFilter::Any => true,
        }
    }
}

/// Parse a where-clause timestamp literal.
pub(crate) fn parse_time_literal(property: &str, raw: &str) -> Result<Timestamp, CoreError> {
    timefmt::parse(raw).map_err(|_| {
        CoreError::Validation(format!(
            "Invalid date value for property '{property}': {raw}"
        ))
    })
}

/// Parse a where-clause value into a typed variable value.
///
/// `'d_int 10'` style literals carry their tag inline; anything else is
/// inferred (bare numbers arrive as text and coerce downstream).
pub(crate) fn parse_variable_literal(raw: &str) -> Result<VariableValue, VariableTypeError> {
    if let Some((tag, rest)) = raw.split_once(' ') {
        let looks_typed = tag.starts_with("d:")
            || tag.starts_with("d_")
            || tag.starts_with("bpm:")
            || tag.starts_with("bpm_");
        if looks_typed {
            return VariableValue::from_wire(tag, &serde_json::Value::String(rest.to_string()));
        }
    }
    if let Ok(i) = raw.parse::<i64>() {
        return VariableValue::from_untyped(&serde_json::Value::from(i));
    }
    if let Ok(b) = raw.parse::<bool>() {
        return Ok(VariableValue::Boolean(b));
    }
    Ok(VariableValue::Text(raw.to_string()))
}

/// Engine ids are a numeric sequence; sorting them numerically keeps
/// creation order. Anything non-numeric sorts last.
pub(crate) fn numeric_id(id: &str) -> i64 {
    id.parse().unwrap_or(i64::MAX)
}

pub(crate) fn unsupported_filter(property: &str, comparator: Comparator) -> CoreError {
    CoreError::Validation(format!(
        "Filtering on '{property}' with comparator '{}' is not supported",
        comparator.as_str()
    ))
}
