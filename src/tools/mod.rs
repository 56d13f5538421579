//! Tools module - local functions the model can call
//!
//! A tool declares its name, doc text and a static parameter table. From
//! that table the registry derives the descriptor sent to the model and the
//! schema used to validate and coerce the arguments the model sends back.

mod clock;
mod coerce;
mod dispatch;
mod math;
mod registry;
mod schema;

pub use clock::GetCurrentTimeTool;
pub use coerce::{coerce, CoercionError};
pub use dispatch::{CallSchema, FieldIssue, IssueKind, ToolCallRequest, ToolError, ToolOutcome};
pub use math::{DivideTool, IntegerOpTool};
pub use registry::ToolRegistry;
pub use schema::{
    hints_from_params, resolve_type_hints, Param, ParamSchema, ParamType, ToolDescriptor,
    TypeHints, NO_DESCRIPTION,
};

use serde_json::{Map, Value};

use crate::error::Error;
use crate::Result;

/// Tool trait - interface for all agent tools
pub trait Tool: Send + Sync {
    /// Tool name used in function calls
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does
    fn description(&self) -> Option<&str> {
        None
    }

    /// Declared parameters, in order
    fn params(&self) -> Vec<Param>;

    /// Declared semantic type of each parameter.
    ///
    /// Defaults to the type names in [`Tool::params`]. An error here is not
    /// fatal: callers fall back to treating every parameter as a string.
    fn type_hints(&self) -> Result<TypeHints> {
        Ok(hints_from_params(&self.params()))
    }

    /// Execute the tool with validated, coerced arguments
    fn call(&self, args: &Arguments) -> Result<Value>;
}

/// Validated arguments handed to a tool body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::Tool(format!("Missing or non-integer argument '{}'", name)))
    }

    pub fn number(&self, name: &str) -> Result<f64> {
        self.get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| Error::Tool(format!("Missing or non-numeric argument '{}'", name)))
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Tool(format!("Missing or non-string argument '{}'", name)))
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        self.get(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| Error::Tool(format!("Missing or non-boolean argument '{}'", name)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Dummy tool for testing; records how often it ran
#[cfg(test)]
pub struct DummyTool {
    pub name: String,
    pub params: Vec<Param>,
    pub calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl DummyTool {
    pub fn new(name: &str, params: Vec<Param>) -> Self {
        Self {
            name: name.to_string(),
            params,
            calls: Default::default(),
        }
    }
}

#[cfg(test)]
impl Tool for DummyTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some("Dummy tool for testing")
    }

    fn params(&self) -> Vec<Param> {
        self.params.clone()
    }

    /// Echoes its arguments back as an object
    fn call(&self, args: &Arguments) -> Result<Value> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(Value::Object(args.clone().into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_getters() {
        let args = Arguments::new(
            json!({"n": 3, "x": 1.5, "s": "hi", "b": true})
                .as_object()
                .cloned()
                .unwrap(),
        );

        assert_eq!(args.integer("n").unwrap(), 3);
        assert_eq!(args.number("x").unwrap(), 1.5);
        assert_eq!(args.number("n").unwrap(), 3.0);
        assert_eq!(args.string("s").unwrap(), "hi");
        assert!(args.boolean("b").unwrap());
        assert!(args.integer("s").is_err());
        assert!(args.string("missing").is_err());
        assert_eq!(args.len(), 4);
    }
}
