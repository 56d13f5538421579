//! Clock tool - current local time

use serde_json::Value;

use super::{Arguments, Param, Tool};
use crate::Result;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Report the current local time
pub struct GetCurrentTimeTool;

impl Tool for GetCurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> Option<&str> {
        Some("A simple function to get the current time")
    }

    fn params(&self) -> Vec<Param> {
        Vec::new()
    }

    fn call(&self, _args: &Arguments) -> Result<Value> {
        Ok(Value::String(
            chrono::Local::now().format(TIME_FORMAT).to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_time_format() {
        let value = GetCurrentTimeTool.call(&Arguments::default()).unwrap();
        let text = value.as_str().unwrap();

        assert!(chrono::NaiveDateTime::parse_from_str(text, TIME_FORMAT).is_ok());
    }
}
