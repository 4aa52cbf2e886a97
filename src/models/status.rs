use serde::{Deserialize, Serialize};

/// Observed machine state. Anything the log store reports that is not one of
/// the known states is kept as `Unknown` so proportions still add up.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "camelCase")]
pub enum MachineStatus {
    Off,
    Loaded,
    On,
    #[default]
    Unknown,
}

impl MachineStatus {
    /// Statuses that get their own chart section and timeline lane, in drawing order.
    pub const DEFINED: [MachineStatus; 3] =
        [MachineStatus::Off, MachineStatus::Loaded, MachineStatus::On];

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Off => "Off",
            MachineStatus::Loaded => "Loaded",
            MachineStatus::On => "On",
            MachineStatus::Unknown => "Unknown",
        }
    }

    /// Parses a status column value. Older databases store the operator-facing
    /// Russian labels instead of the canonical names.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Off" | "Выключен" => MachineStatus::Off,
            "Loaded" | "Нагрузка" => MachineStatus::Loaded,
            "On" | "Включен" => MachineStatus::On,
            _ => MachineStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MachineStatus::Off => "Off",
            MachineStatus::Loaded => "Under load",
            MachineStatus::On => "Powered on",
            MachineStatus::Unknown => "Unknown",
        }
    }

    /// Fill colour used by both the stacked bar and the timeline row.
    pub fn color(&self) -> &'static str {
        match self {
            MachineStatus::Off => "#000000",
            MachineStatus::Loaded => "#FFA500",
            MachineStatus::On => "#008000",
            MachineStatus::Unknown => "#808080",
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, MachineStatus::Unknown)
    }
}

impl std::fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
