use crate::{Error, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One categorized count, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub bed_type: String,
    pub status: String,
    pub counts: f64,
}

impl Record {
    pub fn new(bed_type: impl Into<String>, status: impl Into<String>, counts: f64) -> Self {
        Self {
            bed_type: bed_type.into(),
            status: status.into(),
            counts,
        }
    }

    /// Validates a loosely-typed host row.
    ///
    /// Labels may be strings or numbers (numbers are stringified the way they appear in JSON).
    /// `counts` must be a finite, non-negative number; numeric strings are accepted.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_value_at(value, 0)
    }

    fn from_value_at(value: &Value, index: usize) -> Result<Self> {
        let Some(obj) = value.as_object() else {
            return Err(Error::invalid_input(format!(
                "record {index}: expected an object, got {}",
                json_kind(value)
            )));
        };

        let bed_type = label_field(obj.get("bed_type"), "bed_type", index)?;
        let status = label_field(obj.get("status"), "status", index)?;

        let counts = match obj.get("counts") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(other) => {
                return Err(Error::invalid_input(format!(
                    "record {index}: `counts` must be a number, got {}",
                    json_kind(other)
                )));
            }
            None => {
                return Err(Error::invalid_input(format!(
                    "record {index}: missing `counts`"
                )));
            }
        };
        let Some(counts) = counts else {
            return Err(Error::invalid_input(format!(
                "record {index}: `counts` is not numeric"
            )));
        };
        if !counts.is_finite() || counts < 0.0 {
            return Err(Error::invalid_input(format!(
                "record {index}: `counts` must be a finite non-negative number, got {counts}"
            )));
        }

        Ok(Self {
            bed_type,
            status,
            counts,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.counts.is_finite() || self.counts < 0.0 {
            return Err(Error::invalid_input(format!(
                "record {}/{}: `counts` must be a finite non-negative number, got {}",
                self.bed_type, self.status, self.counts
            )));
        }
        Ok(())
    }
}

fn label_field(value: Option<&Value>, name: &str, index: usize) -> Result<String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(Error::invalid_input(format!(
            "record {index}: `{name}` must be a string, got {}",
            json_kind(other)
        ))),
        None => Err(Error::invalid_input(format!(
            "record {index}: missing `{name}`"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validates a JSON array of host rows.
pub fn records_from_value(value: &Value) -> Result<Vec<Record>> {
    let Some(rows) = value.as_array() else {
        return Err(Error::invalid_input(format!(
            "expected an array of records, got {}",
            json_kind(value)
        )));
    };
    rows.iter()
        .enumerate()
        .map(|(i, row)| Record::from_value_at(row, i))
        .collect()
}

pub fn records_from_json(text: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(text)?;
    records_from_value(&value)
}

/// Distinct `bed_type` values in order of first occurrence.
pub fn categories(records: &[Record]) -> IndexSet<&str> {
    records.iter().map(|r| r.bed_type.as_str()).collect()
}

/// Sum of `counts` across every record, all categories included.
pub fn total_counts(records: &[Record]) -> f64 {
    records.iter().map(|r| r.counts).sum()
}
