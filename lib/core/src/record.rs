use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dataset row with its row id and JSON fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub payload: Value,
}

impl Record {
    pub fn new(id: u64, payload: Value) -> Self {
        Self { id, payload }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    /// Group key of a field. Strings are used verbatim, numbers and booleans
    /// are rendered; null, arrays and objects have no category.
    pub fn category(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric value of a field. Numeric strings are parsed.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}
