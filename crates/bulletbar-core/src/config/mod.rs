mod defaults;

use crate::{Error, Result};
use serde_json::{Map, Value};

pub use defaults::{DEFAULT_PALETTE, default_chart_config};

/// Chart configuration as a JSON object, addressed with dotted paths (`bullet.margin.top`).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig(Value);

impl Default for ChartConfig {
    fn default() -> Self {
        default_chart_config()
    }
}

impl ChartConfig {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses a JSON object of overrides and merges it over the defaults.
    pub fn from_overrides_json(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        if !overrides.is_object() {
            return Err(Error::invalid_config("config overrides must be a JSON object"));
        }
        let mut config = default_chart_config();
        config.deep_merge(&overrides);
        Ok(config)
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        dotted_path
            .split('.')
            .try_fold(&self.0, |node, key| node.as_object()?.get(key))
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    /// `None` unless the value is an array of strings.
    pub fn get_str_list(&self, dotted_path: &str) -> Option<Vec<String>> {
        self.get(dotted_path)?
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Sets one key, creating (or replacing non-object) parents along the way.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let keys: Vec<&str> = dotted_path.split('.').collect();
        insert_at(&mut self.0, &keys, value);
    }

    /// Objects merge key by key; every other value, arrays included, is replaced.
    pub fn deep_merge(&mut self, overrides: &Value) {
        merge_into(&mut self.0, overrides);
    }
}

fn insert_at(node: &mut Value, keys: &[&str], value: Value) {
    let Some((key, rest)) = keys.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        insert_at(map.entry(*key).or_insert(Value::Null), rest, value);
    }
}

fn merge_into(node: &mut Value, overrides: &Value) {
    if let (Some(map), Some(incoming)) = (node.as_object_mut(), overrides.as_object()) {
        for (key, value) in incoming {
            merge_into(map.entry(key.as_str()).or_insert(Value::Null), value);
        }
        return;
    }
    *node = overrides.clone();
}
