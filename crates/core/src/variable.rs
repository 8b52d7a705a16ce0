//! Typed workflow variables.
//!
//! A variable on the wire is `{ "name", "type", "value" }` (task variables
//! add `"scope"`). The `type` tag comes from a fixed set and the value is
//! validated against it at parse time, so the rest of the system only ever
//! sees a [`VariableValue`] that already holds the converted representation.
//!
//! Two failure classes are kept apart on purpose: an unknown type tag is a
//! caller mistake (400), while a value that cannot be coerced to a known
//! tag surfaces as an internal conversion failure (500).

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::CoreError;
use crate::timefmt;
use crate::types::Timestamp;

pub const TYPE_TEXT: &str = "d:text";
pub const TYPE_INT: &str = "d:int";
pub const TYPE_LONG: &str = "d:long";
pub const TYPE_DOUBLE: &str = "d:double";
pub const TYPE_FLOAT: &str = "d:float";
pub const TYPE_BOOLEAN: &str = "d:boolean";
pub const TYPE_DATE: &str = "d:date";
pub const TYPE_DATETIME: &str = "d:datetime";
pub const TYPE_QNAME: &str = "d:qname";
pub const TYPE_NODEREF: &str = "d:noderef";
pub const TYPE_WORKFLOW_PACKAGE: &str = "bpm:workflowPackage";

#[derive(Debug, thiserror::Error)]
pub enum VariableTypeError {
    #[error("Unsupported type of variable: '{0}'.")]
    Unsupported(String),

    #[error("An array of node references is required for type '{0}'")]
    ScalarForList(String),

    #[error("Could not convert value '{value}' to type '{tag}'")]
    Coercion { tag: String, value: String },
}

impl From<VariableTypeError> for CoreError {
    fn from(err: VariableTypeError) -> Self {
        match err {
            VariableTypeError::Unsupported(_) | VariableTypeError::ScalarForList(_) => {
                CoreError::Validation(err.to_string())
            }
            VariableTypeError::Coercion { .. } => CoreError::Internal(err.to_string()),
        }
    }
}

/// A variable value, converted and validated per its wire type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Text(String),
    Int(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    Boolean(bool),
    Date(Timestamp),
    Datetime(Timestamp),
    QName(String),
    NodeRef(String),
    NodeRefList(Vec<String>),
    WorkflowPackage(Vec<String>),
}

/// Normalize the underscore spelling (`d_int`, `bpm_workflowPackage`) used
/// inside where-clause literals, where a colon would split the token.
fn canonical_tag(tag: &str) -> String {
    match tag.split_once('_') {
        Some((prefix, rest)) if prefix == "d" || prefix == "bpm" => format!("{prefix}:{rest}"),
        _ => tag.to_string(),
    }
}

fn coercion(tag: &str, value: &Value) -> VariableTypeError {
    VariableTypeError::Coercion {
        tag: tag.to_string(),
        value: value.to_string(),
    }
}

fn as_string_list(tag: &str, value: &Value) -> Result<Vec<String>, VariableTypeError> {
    let items = value.as_array().ok_or_else(|| match value {
        Value::String(_) => VariableTypeError::ScalarForList(tag.to_string()),
        _ => coercion(tag, value),
    })?;
    items
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| coercion(tag, value))
        })
        .collect()
}

impl VariableValue {
    /// Convert a raw JSON value against an explicit type tag.
    ///
    /// Numeric tags accept both JSON numbers and numeric strings (the
    /// string form is what where-clause literals produce). `d:noderef`
    /// accepts a single reference or an array of references; the package
    /// type requires the array form.
    pub fn from_wire(tag: &str, value: &Value) -> Result<Self, VariableTypeError> {
        let tag = canonical_tag(tag);
        match tag.as_str() {
            TYPE_TEXT => value
                .as_str()
                .map(|s| VariableValue::Text(s.to_string()))
                .ok_or_else(|| coercion(&tag, value)),
            TYPE_INT => parse_integer(&tag, value)?
                .try_into()
                .map(VariableValue::Int)
                .map_err(|_| coercion(&tag, value)),
            TYPE_LONG => parse_integer(&tag, value).map(VariableValue::Long),
            TYPE_DOUBLE => parse_number(&tag, value).map(VariableValue::Double),
            TYPE_FLOAT => parse_number(&tag, value).map(|n| VariableValue::Float(n as f32)),
            TYPE_BOOLEAN => match value {
                Value::Bool(b) => Ok(VariableValue::Boolean(*b)),
                Value::String(s) => s
                    .parse::<bool>()
                    .map(VariableValue::Boolean)
                    .map_err(|_| coercion(&tag, value)),
                _ => Err(coercion(&tag, value)),
            },
            TYPE_DATE | TYPE_DATETIME => {
                let raw = value.as_str().ok_or_else(|| coercion(&tag, value))?;
                let ts = timefmt::parse(raw).map_err(|_| coercion(&tag, value))?;
                Ok(if tag == TYPE_DATE {
                    VariableValue::Date(ts)
                } else {
                    VariableValue::Datetime(ts)
                })
            }
            TYPE_QNAME => value
                .as_str()
                .map(|s| VariableValue::QName(s.to_string()))
                .ok_or_else(|| coercion(&tag, value)),
            TYPE_NODEREF => match value {
                Value::String(s) => Ok(VariableValue::NodeRef(s.clone())),
                Value::Array(_) => as_string_list(&tag, value).map(VariableValue::NodeRefList),
                _ => Err(coercion(&tag, value)),
            },
            TYPE_WORKFLOW_PACKAGE => {
                as_string_list(&tag, value).map(VariableValue::WorkflowPackage)
            }
            other => Err(VariableTypeError::Unsupported(other.to_string())),
        }
    }

    /// Infer a value from untyped JSON (process-start bodies, variable
    /// maps). Strings stay text; there is no date sniffing.
    pub fn from_untyped(value: &Value) -> Result<Self, VariableTypeError> {
        match value {
            Value::Bool(b) => Ok(VariableValue::Boolean(*b)),
            Value::String(s) => Ok(VariableValue::Text(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(if i32::try_from(i).is_ok() {
                        VariableValue::Int(i as i32)
                    } else {
                        VariableValue::Long(i)
                    })
                } else {
                    Ok(VariableValue::Double(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::Array(_) => as_string_list("(untyped)", value).map(VariableValue::NodeRefList),
            _ => Err(coercion("(untyped)", value)),
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            VariableValue::Text(_) => TYPE_TEXT,
            VariableValue::Int(_) => TYPE_INT,
            VariableValue::Long(_) => TYPE_LONG,
            VariableValue::Double(_) => TYPE_DOUBLE,
            VariableValue::Float(_) => TYPE_FLOAT,
            VariableValue::Boolean(_) => TYPE_BOOLEAN,
            VariableValue::Date(_) => TYPE_DATE,
            VariableValue::Datetime(_) => TYPE_DATETIME,
            VariableValue::QName(_) => TYPE_QNAME,
            VariableValue::NodeRef(_) => TYPE_NODEREF,
            VariableValue::NodeRefList(_) => TYPE_NODEREF,
            VariableValue::WorkflowPackage(_) => TYPE_WORKFLOW_PACKAGE,
        }
    }

    pub fn to_wire(&self) -> Value {
        match self {
            VariableValue::Text(s) | VariableValue::QName(s) | VariableValue::NodeRef(s) => {
                Value::String(s.clone())
            }
            VariableValue::Int(i) => Value::from(*i),
            VariableValue::Long(i) => Value::from(*i),
            VariableValue::Double(f) => Value::from(*f),
            VariableValue::Float(f) => Value::from(*f as f64),
            VariableValue::Boolean(b) => Value::from(*b),
            VariableValue::Date(ts) | VariableValue::Datetime(ts) => {
                Value::String(timefmt::format(ts))
            }
            VariableValue::NodeRefList(items) | VariableValue::WorkflowPackage(items) => {
                Value::from(items.clone())
            }
        }
    }

    /// Order two values for filter comparisons.
    ///
    /// Numeric variants compare across widths; dates compare as instants;
    /// string-like variants compare lexicographically. List values and
    /// mixed kinds do not order.
    pub fn compare(&self, other: &VariableValue) -> Option<Ordering> {
        use VariableValue::*;
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => return a.partial_cmp(&b),
            (None, None) => {}
            _ => return None,
        }
        match (self, other) {
            (Text(a), Text(b)) | (QName(a), QName(b)) | (NodeRef(a), NodeRef(b)) => {
                Some(a.cmp(b))
            }
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (Date(a), Date(b))
            | (Datetime(a), Datetime(b))
            | (Date(a), Datetime(b))
            | (Datetime(a), Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            VariableValue::Int(i) => Some(*i as f64),
            VariableValue::Long(i) => Some(*i as f64),
            VariableValue::Double(f) => Some(*f),
            VariableValue::Float(f) => Some(*f as f64),
            _ => None,
        }
    }
}

fn parse_integer(tag: &str, value: &Value) -> Result<i64, VariableTypeError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| coercion(tag, value)),
        Value::String(s) => s.trim().parse().map_err(|_| coercion(tag, value)),
        _ => Err(coercion(tag, value)),
    }
}

fn parse_number(tag: &str, value: &Value) -> Result<f64, VariableTypeError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| coercion(tag, value)),
        Value::String(s) => s.trim().parse().map_err(|_| coercion(tag, value)),
        _ => Err(coercion(tag, value)),
    }
}

// Untyped JSON view, used where variables appear as a plain name→value map.
impl Serialize for VariableValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VariableValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        VariableValue::from_untyped(&value).map_err(serde::de::Error::custom)
    }
}

/// Scope of a task variable: local to the task or global to its process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableScope {
    Local,
    Global,
}

impl VariableScope {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "local" => Ok(VariableScope::Local),
            "global" => Ok(VariableScope::Global),
            other => Err(CoreError::Validation(format!(
                "Invalid variable scope: '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableScope::Local => "local",
            VariableScope::Global => "global",
        }
    }
}

/// A named, typed value scoped to a process instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: VariableValue,
}

/// A named, typed value attached to a task, tagged with its scope.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskVariable {
    pub scope: VariableScope,
    pub name: String,
    pub value: VariableValue,
}

#[derive(Serialize, Deserialize)]
struct WireVariable {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    scope: Option<VariableScope>,
    name: String,
    #[serde(rename = "type")]
    tag: String,
    value: Value,
}

impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireVariable {
            scope: None,
            name: self.name.clone(),
            tag: self.value.type_tag().to_string(),
            value: self.value.to_wire(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireVariable::deserialize(deserializer)?;
        let value =
            VariableValue::from_wire(&wire.tag, &wire.value).map_err(serde::de::Error::custom)?;
        Ok(Variable {
            name: wire.name,
            value,
        })
    }
}

impl Serialize for TaskVariable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireVariable {
            scope: Some(self.scope),
            name: self.name.clone(),
            tag: self.value.type_tag().to_string(),
            value: self.value.to_wire(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TaskVariable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireVariable::deserialize(deserializer)?;
        let value =
            VariableValue::from_wire(&wire.tag, &wire.value).map_err(serde::de::Error::custom)?;
        Ok(TaskVariable {
            scope: wire.scope.unwrap_or(VariableScope::Global),
            name: wire.name,
            value,
        })
    }
}

/// Request body for creating or updating a variable.
///
/// `type` and `scope` are optional; an untyped value is inferred. On the
/// name-in-path update form the body name, when present, must agree with
/// the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariablePayload {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub tag: Option<String>,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scope: Option<VariableScope>,
}

impl VariablePayload {
    pub fn resolve(&self, path_name: Option<&str>) -> Result<(String, VariableValue), CoreError> {
        let name = match (path_name, self.name.as_deref()) {
            (Some(path), Some(body)) if path != body => {
                return Err(CoreError::Validation(
                    "The variable name in the message body does not match the variable name in the URL"
                        .into(),
                ));
            }
            (Some(path), _) => path.to_string(),
            (None, Some(body)) => body.to_string(),
            (None, None) => {
                return Err(CoreError::Validation("Variable name is required".into()));
            }
        };
        let value = match self.tag.as_deref() {
            Some(tag) => VariableValue::from_wire(tag, &self.value)?,
            None => VariableValue::from_untyped(&self.value)?,
        };
        Ok((name, value))
    }
}
