use serde::{Deserialize, Serialize};

use crate::aggregation::engine::AggregateResult;
use crate::models::MachineStatus;

pub const NO_DATA_LABEL: &str = "No data";
const NO_DATA_COLOR: &str = "#808080";

/// One section of the single stacked proportion bar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarSection {
    pub status: Option<MachineStatus>,
    pub name: String,
    pub value: f64,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StackedBar {
    pub no_data: bool,
    pub sections: Vec<BarSection>,
}

impl StackedBar {
    pub fn no_data() -> Self {
        Self {
            no_data: true,
            sections: vec![BarSection {
                status: None,
                name: NO_DATA_LABEL.to_string(),
                value: 0.0,
                label: String::new(),
                color: NO_DATA_COLOR.to_string(),
            }],
        }
    }

    /// Off, Loaded, On sections in drawing order. `Unknown` time is part of
    /// the denominator but is not drawn.
    pub fn from_aggregate(result: &AggregateResult) -> Self {
        let proportions = match result {
            AggregateResult::NoData => return Self::no_data(),
            AggregateResult::Proportions(p) => p,
        };

        let sections = MachineStatus::DEFINED
            .iter()
            .map(|status| {
                let value = proportions.fraction(*status);
                BarSection {
                    status: Some(*status),
                    name: status.label().to_string(),
                    value,
                    label: format_percent(value),
                    color: status.color().to_string(),
                }
            })
            .collect();

        Self {
            no_data: false,
            sections,
        }
    }
}

/// Whole-percent label, e.g. `0.354` -> `"35%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::engine::StatusProportions;

    #[test]
    fn sentinel_renders_single_gray_section() {
        let bar = StackedBar::from_aggregate(&AggregateResult::NoData);
        assert!(bar.no_data);
        assert_eq!(bar.sections.len(), 1);
        assert_eq!(bar.sections[0].name, NO_DATA_LABEL);
        assert_eq!(bar.sections[0].value, 0.0);
    }

    #[test]
    fn sections_follow_drawing_order_with_labels() {
        let result = AggregateResult::Proportions(StatusProportions {
            off: 0.3,
            loaded: 0.5,
            on: 0.2,
            unknown: 0.0,
            total_secs: 100.0,
        });
        let bar = StackedBar::from_aggregate(&result);
        let labels: Vec<_> = bar.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["30%", "50%", "20%"]);
        assert_eq!(bar.sections[1].status, Some(MachineStatus::Loaded));
        assert_eq!(bar.sections[1].color, "#FFA500");
    }

    #[test]
    fn percent_rounds_to_whole_numbers() {
        assert_eq!(format_percent(0.354), "35%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(1.0), "100%");
    }
}
