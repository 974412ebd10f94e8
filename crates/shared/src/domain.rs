use serde::{Deserialize, Serialize};

/// Data type of a host-managed parameter, as reported by the host API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterDataType {
    Bool,
    Date,
    DateTime,
    Float,
    Int,
    Spatial,
    String,
}

/// A named input value owned and displayed by the host dashboard.
/// Read-only from the panel's perspective; valid for one fetch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub data_type: ParameterDataType,
    pub formatted_value: String,
}

/// Internal projection of a [`Parameter`], built fresh per fetch and
/// discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub parameter_name: String,
    pub parameter_type: ParameterDataType,
    pub parameter_value: String,
}

impl From<Parameter> for ParameterRecord {
    fn from(parameter: Parameter) -> Self {
        Self {
            parameter_name: parameter.name,
            parameter_type: parameter.data_type,
            parameter_value: parameter.formatted_value,
        }
    }
}

/// Trigger-control lifecycle. Owned exclusively by the UI controller:
/// `Idle -> Busy` on click, `Busy -> Idle` when the dispatch settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    #[default]
    Idle,
    Busy,
}
