use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::aggregation::{AggregationConfig, DurationPolicy};

/// Overrides the configured database path when set.
pub const DB_PATH_ENV: &str = "MACHINE_DASHBOARD_DB";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardSettings {
    pub database_path: PathBuf,
    pub default_range_days: u32,
    pub timeline_window_hours: u32,
    pub duration_policy: DurationPolicy,
    pub default_header_text: String,
    pub default_project_text: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("app.db"),
            default_range_days: 7,
            timeline_window_hours: 24,
            duration_policy: DurationPolicy::WholeEntry,
            default_header_text: "AxiOMA Control".into(),
            default_project_text: "Project 2".into(),
        }
    }
}

impl DashboardSettings {
    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig {
            duration_policy: self.duration_policy,
        }
    }

    /// Database path after applying the environment override.
    pub fn resolved_database_path(&self) -> PathBuf {
        match std::env::var_os(DB_PATH_ENV) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => self.database_path.clone(),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<DashboardSettings>,
}

impl SettingsStore {
    /// Loads settings from `path`. A missing or unreadable JSON document
    /// yields the defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring malformed settings at {}: {err}", path.display());
                DashboardSettings::default()
            })
        } else {
            DashboardSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> DashboardSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: DashboardSettings) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &DashboardSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
