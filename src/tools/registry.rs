//! Tool registry - holds registered tools and their derived descriptors

use std::collections::HashMap;

use tracing::{debug, warn};

use super::clock::GetCurrentTimeTool;
use super::dispatch::CallSchema;
use super::math::{DivideTool, IntegerOpTool};
use super::schema::{resolve_type_hints, ToolDescriptor};
use super::Tool;

/// A registered tool with the metadata derived from it at registration.
pub(super) struct Entry {
    pub(super) tool: Box<dyn Tool>,
    pub(super) schema: CallSchema,
}

/// Registry of tools, built once at startup and read-only afterwards.
///
/// Descriptors are derived exactly once, when a tool is registered, and are
/// kept in registration order.
pub struct ToolRegistry {
    entries: Vec<Entry>,
    descriptors: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            descriptors: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create a registry with the built-in tools
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(GetCurrentTimeTool);

        // Arithmetic
        registry.register(IntegerOpTool::add());
        registry.register(IntegerOpTool::subtract());
        registry.register(IntegerOpTool::multiply());
        registry.register(DivideTool);

        registry
    }

    /// Register a tool.
    ///
    /// A tool with the same name as an existing one replaces it in place.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let hints = resolve_type_hints(&tool);
        let params = tool.params();
        let descriptor = ToolDescriptor::derive_with(&tool, &params, &hints);
        let schema = CallSchema::new(&params, &hints);
        let name = descriptor.name.clone();
        let entry = Entry {
            tool: Box::new(tool),
            schema,
        };

        match self.index.get(&name) {
            Some(&slot) => {
                warn!("Tool '{}' registered twice, replacing the earlier one", name);
                self.entries[slot] = entry;
                self.descriptors[slot] = descriptor;
            }
            None => {
                debug!("Registered tool '{}'", name);
                self.index.insert(name, self.entries.len());
                self.entries.push(entry);
                self.descriptors.push(descriptor);
            }
        }
    }

    /// Tool descriptors for the LLM, in registration order
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    /// Descriptor of a single tool
    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&slot| &self.descriptors[slot])
    }

    pub(super) fn entry(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// List registered tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{
        Arguments, DummyTool, Param, ParamType, ToolCallRequest, ToolOutcome, TypeHints,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_registry_register_and_dispatch() {
        let mut registry = ToolRegistry::new();
        registry.register(DummyTool::new("test_tool", vec![Param::new("x", "i32")]));

        assert!(registry.has("test_tool"));
        assert_eq!(registry.len(), 1);

        let outcome = registry.dispatch(&ToolCallRequest::new(
            "call_0",
            "test_tool",
            json!({"x": "4"}),
        ));
        assert_eq!(outcome, ToolOutcome::Success(json!({"x": 4})));
    }

    #[test]
    fn test_defaults_keep_registration_order() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(
            registry.tool_names(),
            vec!["get_current_time", "add", "subtract", "multiply", "divide"]
        );

        let add = registry.descriptor("add").unwrap();
        assert_eq!(add.description, "A simple function to add two integers");
        assert_eq!(add.required, vec!["a", "b"]);
        assert!(add
            .parameters
            .iter()
            .all(|p| p.param_type == ParamType::Integer));

        let time = registry.descriptor("get_current_time").unwrap();
        assert!(time.parameters.is_empty());
        assert!(time.required.is_empty());
    }

    struct Counting {
        params: Arc<AtomicUsize>,
        hints: Arc<AtomicUsize>,
    }

    impl Tool for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn params(&self) -> Vec<Param> {
            self.params.fetch_add(1, Ordering::SeqCst);
            vec![Param::new("n", "i64")]
        }

        fn type_hints(&self) -> crate::Result<TypeHints> {
            self.hints.fetch_add(1, Ordering::SeqCst);
            Err(crate::error::Error::Tool("no annotations".to_string()))
        }

        fn call(&self, _args: &Arguments) -> crate::Result<Value> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_register_resolves_metadata_once() {
        let params = Arc::new(AtomicUsize::new(0));
        let hints = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry.register(Counting {
            params: params.clone(),
            hints: hints.clone(),
        });

        assert_eq!(params.load(Ordering::SeqCst), 1);
        assert_eq!(hints.load(Ordering::SeqCst), 1);

        // Degraded hints apply to both the descriptor and validation
        let desc = registry.descriptor("counting").unwrap();
        assert_eq!(desc.parameters[0].param_type, ParamType::String);
        let value = registry.try_dispatch("counting", &json!({"n": 5})).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(DummyTool::new("dup", vec![Param::new("old", "String")]));
        registry.register(DummyTool::new("other", vec![]));
        registry.register(DummyTool::new("dup", vec![Param::new("new", "String")]));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tool_names(), vec!["dup", "other"]);
        assert!(registry.descriptor("dup").unwrap().parameter("new").is_some());

        let outcome = registry.dispatch(&ToolCallRequest::new("c", "dup", json!({"old": "x"})));
        assert!(!outcome.is_success());
    }
}
