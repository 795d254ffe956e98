use std::collections::HashMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::node::PortId;

/// Type tag of a port or value. The array variant of a scalar tag is the tag
/// with `[]` appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DataType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "string[]")]
    StringList,
}

impl DataType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::StringList => "string[]",
        }
    }

    pub const fn is_array(self) -> bool {
        matches!(self, DataType::StringList)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value flowing between ports, tagged with its wire type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "value")]
pub enum DataValue {
    #[serde(rename = "string")]
    String(String),
    #[serde(rename = "string[]")]
    StringList(Vec<String>),
}

impl DataValue {
    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::String(_) => DataType::String,
            DataValue::StringList(_) => DataType::StringList,
        }
    }

    /// Convert to `target`. Identity conversions aside, the only permitted
    /// coercion is scalar string <-> single-element string list.
    pub fn coerce(self, target: DataType) -> Result<DataValue, NodeError> {
        match (self, target) {
            (v @ DataValue::String(_), DataType::String) => Ok(v),
            (v @ DataValue::StringList(_), DataType::StringList) => Ok(v),
            (DataValue::String(s), DataType::StringList) => Ok(DataValue::StringList(vec![s])),
            (DataValue::StringList(mut items), DataType::String) if items.len() == 1 => {
                Ok(DataValue::String(items.remove(0)))
            }
            (v, target) => Err(NodeError::Coercion {
                expected: target,
                actual: v.data_type(),
            }),
        }
    }

    pub fn into_string(self) -> Result<String, NodeError> {
        match self.coerce(DataType::String)? {
            DataValue::String(s) => Ok(s),
            other => Err(NodeError::Coercion {
                expected: DataType::String,
                actual: other.data_type(),
            }),
        }
    }

    pub fn into_string_list(self) -> Result<Vec<String>, NodeError> {
        match self.coerce(DataType::StringList)? {
            DataValue::StringList(items) => Ok(items),
            other => Err(NodeError::Coercion {
                expected: DataType::StringList,
                actual: other.data_type(),
            }),
        }
    }
}

/// Resolved values bound to a node's input ports for one invocation.
pub type Inputs = HashMap<PortId, DataValue>;

/// One value per declared output port. The key set of a successful result
/// must equal the declared output port set.
pub type Outputs = HashMap<PortId, DataValue>;

/// Resolve a field that may come either from an input port or from stored
/// configuration: when `use_input` is set and the port carries a resolved
/// value, the coerced input wins; otherwise the stored field is used.
pub fn string_input_or_data(
    use_input: bool,
    inputs: &Inputs,
    port: &str,
    stored: &str,
) -> Result<String, NodeError> {
    if use_input {
        if let Some(value) = inputs.get(port) {
            return value.clone().into_string();
        }
    }
    Ok(stored.to_string())
}
