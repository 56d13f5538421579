//! Validated dispatch of model-requested tool calls.
//!
//! The dispatcher never fails past its boundary: unknown tools, invalid
//! arguments and tool-body errors all come back as [`ToolOutcome::Failure`]
//! with a message meant to be fed back to the model so it can correct itself.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::coerce::{coerce, describe, CoercionError};
use super::registry::ToolRegistry;
use super::schema::{param_type, Param, ParamType, TypeHints};
use super::Arguments;

/// A tool call request from the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Result of a dispatched call, always returned as data.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Failure(String),
}

impl ToolOutcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success(_))
    }

    /// Text to place in the transcript. Strings are inserted verbatim,
    /// other values as JSON.
    pub fn to_content(&self) -> String {
        match self {
            ToolOutcome::Success(Value::String(s)) => s.clone(),
            ToolOutcome::Success(value) => value.to_string(),
            ToolOutcome::Failure(message) => message.clone(),
        }
    }
}

impl From<Result<Value, ToolError>> for ToolOutcome {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(value) => ToolOutcome::Success(value),
            Err(e) => ToolOutcome::Failure(e.to_string()),
        }
    }
}

/// Why a dispatch did not produce a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Tool not found")]
    NotFound(String),

    #[error("Invalid arguments for tool '{tool}': {reason}")]
    MalformedArguments { tool: String, reason: String },

    #[error("{}", validation_message(.tool, .issues))]
    Validation { tool: String, issues: Vec<FieldIssue> },

    #[error("Error executing tool '{tool}': {message}")]
    Execution { tool: String, message: String },
}

fn validation_message(tool: &str, issues: &[FieldIssue]) -> String {
    let details = issues
        .iter()
        .map(FieldIssue::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    let plural = if issues.len() == 1 { "" } else { "s" };
    format!(
        "{} validation error{} for tool '{}': {}",
        issues.len(),
        plural,
        tool,
        details
    )
}

/// A single field that failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field}: {kind}")]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IssueKind {
    #[error("missing required argument")]
    Missing,

    #[error("unexpected argument, not a parameter of this tool")]
    Unexpected,

    #[error(transparent)]
    Invalid(#[from] CoercionError),
}

/// Coercion target of one declared parameter.
#[derive(Debug, Clone, PartialEq)]
struct FieldSpec {
    name: String,
    param_type: ParamType,
    default: Option<Value>,
}

/// Validation schema of a tool's parameter set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallSchema {
    fields: Vec<FieldSpec>,
}

impl CallSchema {
    /// Build the schema from declared parameters and resolved type hints.
    pub fn new(params: &[Param], hints: &TypeHints) -> Self {
        let fields = params
            .iter()
            .map(|p| FieldSpec {
                name: p.name.clone(),
                param_type: param_type(hints, &p.name),
                default: p.default.clone(),
            })
            .collect();
        Self { fields }
    }

    /// Validate and coerce raw arguments.
    ///
    /// Reports every failing field, not just the first. Omitted optional
    /// parameters are filled with their defaults.
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<Arguments, Vec<FieldIssue>> {
        let mut values = Map::new();
        let mut issues = Vec::new();

        for field in &self.fields {
            match (raw.get(&field.name), &field.default) {
                (Some(value), _) => match coerce(value, field.param_type) {
                    Ok(coerced) => {
                        values.insert(field.name.clone(), coerced);
                    }
                    Err(e) => issues.push(FieldIssue {
                        field: field.name.clone(),
                        kind: e.into(),
                    }),
                },
                (None, Some(default)) => {
                    values.insert(field.name.clone(), default.clone());
                }
                (None, None) => issues.push(FieldIssue {
                    field: field.name.clone(),
                    kind: IssueKind::Missing,
                }),
            }
        }

        for key in raw.keys() {
            if !self.fields.iter().any(|f| &f.name == key) {
                issues.push(FieldIssue {
                    field: key.clone(),
                    kind: IssueKind::Unexpected,
                });
            }
        }

        if issues.is_empty() {
            Ok(Arguments::new(values))
        } else {
            Err(issues)
        }
    }
}

/// Turn the raw `arguments` of a call into an object.
///
/// Accepts an object, a JSON-encoded object string, or nothing at all.
fn normalize_arguments(raw: &Value) -> Result<Map<String, Value>, String> {
    match raw {
        Value::Object(map) => Ok(map.clone()),
        Value::Null => Ok(Map::new()),
        Value::String(s) if s.trim().is_empty() => Ok(Map::new()),
        Value::String(s) => match serde_json::from_str::<Value>(s.trim()) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("expected a JSON object, got {}", describe(&other))),
            Err(e) => Err(format!("arguments are not valid JSON: {}", e)),
        },
        other => Err(format!("expected a JSON object, got {}", describe(other))),
    }
}

impl ToolRegistry {
    /// Dispatch a model-requested call. Never fails; errors become
    /// [`ToolOutcome::Failure`].
    pub fn dispatch(&self, call: &ToolCallRequest) -> ToolOutcome {
        let outcome = ToolOutcome::from(self.try_dispatch(&call.name, &call.arguments));
        if let ToolOutcome::Failure(ref message) = outcome {
            warn!("Tool call {} ({}) failed: {}", call.id, call.name, message);
        }
        outcome
    }

    /// Dispatch a call, keeping the structured error.
    pub fn try_dispatch(&self, name: &str, arguments: &Value) -> Result<Value, ToolError> {
        let entry = self
            .entry(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let raw = normalize_arguments(arguments).map_err(|reason| ToolError::MalformedArguments {
            tool: name.to_string(),
            reason,
        })?;

        let args = entry
            .schema
            .validate(&raw)
            .map_err(|issues| ToolError::Validation {
                tool: name.to_string(),
                issues,
            })?;

        debug!("Invoking tool {} with {} argument(s)", name, args.len());

        entry.tool.call(&args).map_err(|e| ToolError::Execution {
            tool: name.to_string(),
            message: match e {
                crate::error::Error::Tool(message) => message,
                other => other.to_string(),
            },
        })
    }
}
