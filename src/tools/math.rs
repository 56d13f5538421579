//! Arithmetic tools - integer add/subtract/multiply and divide

use serde_json::Value;

use super::{Arguments, Param, Tool};
use crate::error::Error;
use crate::Result;

fn operands() -> Vec<Param> {
    vec![Param::new("a", "i64"), Param::new("b", "i64")]
}

/// Binary integer operation; overflow is reported as a tool error.
pub struct IntegerOpTool {
    name: &'static str,
    description: &'static str,
    op: fn(i64, i64) -> Option<i64>,
}

impl IntegerOpTool {
    pub fn add() -> Self {
        Self {
            name: "add",
            description: "A simple function to add two integers",
            op: i64::checked_add,
        }
    }

    pub fn subtract() -> Self {
        Self {
            name: "subtract",
            description: "A simple function to subtract two integers",
            op: i64::checked_sub,
        }
    }

    pub fn multiply() -> Self {
        Self {
            name: "multiply",
            description: "A simple function to multiply two integers",
            op: i64::checked_mul,
        }
    }
}

impl Tool for IntegerOpTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> Option<&str> {
        Some(self.description)
    }

    fn params(&self) -> Vec<Param> {
        operands()
    }

    fn call(&self, args: &Arguments) -> Result<Value> {
        let a = args.integer("a")?;
        let b = args.integer("b")?;

        (self.op)(a, b)
            .map(Value::from)
            .ok_or_else(|| Error::Tool(format!("Integer overflow in {}({}, {})", self.name, a, b)))
    }
}

/// Divide two integers, producing a float
pub struct DivideTool;

impl Tool for DivideTool {
    fn name(&self) -> &str {
        "divide"
    }

    fn description(&self) -> Option<&str> {
        Some("A simple function to divide two integers")
    }

    fn params(&self) -> Vec<Param> {
        operands()
    }

    fn call(&self, args: &Arguments) -> Result<Value> {
        let a = args.integer("a")?;
        let b = args.integer("b")?;

        if b == 0 {
            return Err(Error::Tool("Cannot divide by zero".to_string()));
        }

        Ok(Value::from(a as f64 / b as f64))
    }
}
