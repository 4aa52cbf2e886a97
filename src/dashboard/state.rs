use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{DateRange, Machine};
use crate::settings::DashboardSettings;

/// User-driven inputs of the dashboard. Every change leads to one
/// recomputation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    pub machine_type: Option<String>,
    pub machine_name: Option<String>,
    pub range: DateRange,
}

impl DashboardFilter {
    pub fn new(range: DateRange) -> Self {
        Self {
            machine_type: None,
            machine_name: None,
            range,
        }
    }

    /// Selecting a type clears the machine selection.
    pub fn with_machine_type(mut self, machine_type: Option<String>) -> Self {
        self.machine_type = non_empty(machine_type);
        self.machine_name = None;
        self
    }

    pub fn with_machine(mut self, machine_name: Option<String>) -> Self {
        self.machine_name = non_empty(machine_name);
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Texts and lists derived from the filter, independent of any log data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub machine_types: Vec<String>,
    pub machine_names: Vec<String>,
    pub header_text: String,
    pub project_text: String,
}

pub fn derive_view_state(
    filter: &DashboardFilter,
    machines: &[Machine],
    settings: &DashboardSettings,
) -> ViewState {
    let machine_types: Vec<String> = machines
        .iter()
        .map(|m| m.machine_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let machine_names = machines
        .iter()
        .filter(|m| match &filter.machine_type {
            Some(machine_type) => &m.machine_type == machine_type,
            None => true,
        })
        .filter(|m| !m.name.is_empty())
        .map(|m| m.name.clone())
        .collect();

    let header_text = match (&filter.machine_type, &filter.machine_name) {
        (Some(machine_type), Some(machine_name)) => format!("{machine_type} - {machine_name}"),
        (Some(machine_type), None) => machine_type.clone(),
        _ => settings.default_header_text.clone(),
    };

    let project_text = filter
        .machine_name
        .clone()
        .unwrap_or_else(|| settings.default_project_text.clone());

    ViewState {
        machine_types,
        machine_names,
        header_text,
        project_text,
    }
}
