//! Tool schema derivation.
//!
//! Every tool declares its parameters as a static table of [`Param`]s. The
//! deriver turns that table into a [`ToolDescriptor`], the function-calling
//! shape the model consumes:
//!
//! ```json
//! {
//!   "type": "function",
//!   "function": {
//!     "name": "add",
//!     "description": "A simple function to add two integers",
//!     "parameters": {
//!       "type": "object",
//!       "properties": {
//!         "a": {"type": "integer", "description": "Parameter a"},
//!         "b": {"type": "integer", "description": "Parameter b"}
//!       },
//!       "required": ["a", "b"]
//!     }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use super::Tool;

/// Description used when a tool carries no doc text.
pub const NO_DESCRIPTION: &str = "No description available";

/// Declared semantic type names, keyed by parameter name.
pub type TypeHints = HashMap<String, String>;

/// Coarse JSON-schema type tag of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Integer,
    Number,
    String,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    /// Map a declared semantic type name onto one of the six tags.
    ///
    /// Accepts Rust spellings (`i64`, `&str`, `Vec<String>`,
    /// `std::collections::HashMap<K, V>`) as well as the generic names
    /// `int`, `float`, `str`, `bool`, `list`, `dict`. `Option<T>` maps to
    /// the tag of `T`. Anything unrecognised is a string.
    pub fn from_type_name(name: &str) -> Self {
        let name = name.trim().trim_start_matches('&').trim();
        let name = name.strip_prefix("mut ").unwrap_or(name).trim();

        let (base, generic) = match name.find('<') {
            Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
            None => (name, None),
        };
        let base = base.rsplit("::").next().unwrap_or(base).to_ascii_lowercase();

        if base == "option" {
            if let Some(inner) = generic.and_then(|g| g.strip_suffix('>')) {
                return Self::from_type_name(inner);
            }
        }
        if name.starts_with('[') {
            return ParamType::Array;
        }

        match base.as_str() {
            "int" | "integer" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8"
            | "u16" | "u32" | "u64" | "u128" | "usize" => ParamType::Integer,
            "float" | "number" | "f32" | "f64" => ParamType::Number,
            "bool" | "boolean" => ParamType::Boolean,
            "list" | "array" | "vec" | "vecdeque" | "tuple" | "slice" => ParamType::Array,
            "dict" | "object" | "map" | "hashmap" | "btreemap" | "value" => ParamType::Object,
            _ => ParamType::String,
        }
    }

    /// JSON-schema spelling of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::String => "string",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared tool parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    /// Declared semantic type name, `None` when unannotated.
    pub type_name: Option<String>,
    /// Default value; a parameter without one is required.
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            default: None,
            description: None,
        }
    }

    /// A parameter without a declared type.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            default: None,
            description: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Collect the declared type names of a parameter table.
pub fn hints_from_params(params: &[Param]) -> TypeHints {
    params
        .iter()
        .filter_map(|p| p.type_name.clone().map(|t| (p.name.clone(), t)))
        .collect()
}

/// Resolve a tool's type metadata, degrading to an empty set on error.
pub fn resolve_type_hints(tool: &dyn Tool) -> TypeHints {
    match tool.type_hints() {
        Ok(hints) => hints,
        Err(e) => {
            warn!(
                "Could not resolve parameter types for tool '{}', treating all as string: {}",
                tool.name(),
                e
            );
            TypeHints::new()
        }
    }
}

/// Coarse type of a parameter under the given hints.
pub fn param_type(hints: &TypeHints, name: &str) -> ParamType {
    hints
        .get(name)
        .map(|t| ParamType::from_type_name(t))
        .unwrap_or(ParamType::String)
}

/// One entry of a descriptor's `properties` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSchema {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub description: String,
}

/// Tool descriptor sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ParamSchema>,
    /// Names of parameters without a default, in declaration order.
    pub required: Vec<String>,
}

impl ToolDescriptor {
    /// Derive the descriptor of a tool. Never fails.
    pub fn derive(tool: &dyn Tool) -> Self {
        Self::derive_with(tool, &tool.params(), &resolve_type_hints(tool))
    }

    /// Derive the descriptor from an already resolved parameter table.
    pub fn derive_with(tool: &dyn Tool, params: &[Param], hints: &TypeHints) -> Self {
        let description = tool
            .description()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_DESCRIPTION)
            .to_string();

        let parameters = params
            .iter()
            .map(|p| ParamSchema {
                name: p.name.clone(),
                param_type: param_type(hints, &p.name),
                description: p
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Parameter {}", p.name)),
            })
            .collect();

        let required = params
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name.clone())
            .collect();

        Self {
            name: tool.name().to_string(),
            description,
            parameters,
            required,
        }
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParamSchema> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl Serialize for ToolDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            #[serde(rename = "type")]
            kind: &'static str,
            function: Function<'a>,
        }

        #[derive(Serialize)]
        struct Function<'a> {
            name: &'a str,
            description: &'a str,
            parameters: Parameters<'a>,
        }

        #[derive(Serialize)]
        struct Parameters<'a> {
            #[serde(rename = "type")]
            kind: &'static str,
            properties: Properties<'a>,
            required: &'a [String],
        }

        struct Properties<'a>(&'a [ParamSchema]);

        impl Serialize for Properties<'_> {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for param in self.0 {
                    map.serialize_entry(&param.name, param)?;
                }
                map.end()
            }
        }

        Wire {
            kind: "function",
            function: Function {
                name: &self.name,
                description: &self.description,
                parameters: Parameters {
                    kind: "object",
                    properties: Properties(&self.parameters),
                    required: &self.required,
                },
            },
        }
        .serialize(serializer)
    }
}
