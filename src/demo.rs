use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::db::Database;
use crate::log_info;
use crate::models::{Machine, MachineStatus, StatusLogEntry};

const ENABLE_LOGS: bool = true;

const DEMO_MACHINES: [(&str, &str); 4] = [
    ("Lathe 1", "Lathe"),
    ("Lathe 2", "Lathe"),
    ("Mill 1", "Milling center"),
    ("Grinder 1", "Grinder"),
];

const DEMO_COMPONENTS: [(&str, f64, f64); 3] = [
    ("Coolant pressure", 2.0, 6.0),
    ("Spindle load", 0.0, 100.0),
    ("Spindle temperature", 25.0, 80.0),
];

const HISTORY_HOURS: i64 = 48;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSummary {
    pub machines: usize,
    pub status_logs: usize,
    pub component_values: usize,
}

/// Back-to-back status intervals covering `[from, until)`, the last one
/// still running at `until`.
pub fn generate_status_history(
    rng: &mut impl Rng,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Vec<StatusLogEntry> {
    let mut entries = Vec::new();
    let mut cursor = from;
    while cursor < until {
        let status = MachineStatus::DEFINED[rng.gen_range(0..MachineStatus::DEFINED.len())];
        let duration_secs = f64::from(rng.gen_range(10u32..=120) * 60);
        entries.push(StatusLogEntry::new(status, cursor, duration_secs));
        cursor += Duration::seconds(duration_secs as i64);
    }
    entries
}

/// Fills the database with reproducible sample machines and logs.
pub async fn seed_demo(db: &Database, now: DateTime<Utc>, seed: u64) -> Result<DemoSummary> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut summary = DemoSummary {
        machines: 0,
        status_logs: 0,
        component_values: 0,
    };

    for (name, machine_type) in DEMO_MACHINES {
        db.insert_machine(&Machine {
            name: name.to_string(),
            machine_type: machine_type.to_string(),
        })
        .await?;
        summary.machines += 1;

        let history = generate_status_history(&mut rng, now - Duration::hours(HISTORY_HOURS), now);
        db.insert_status_logs(name, &history).await?;
        summary.status_logs += history.len();

        for (component, low, high) in DEMO_COMPONENTS {
            for minutes_ago in [30, 20, 10] {
                let value = (rng.gen_range(low..high) * 10.0).round() / 10.0;
                db.insert_component_value(name, component, value, now - Duration::minutes(minutes_ago))
                    .await?;
                summary.component_values += 1;
            }
        }
    }

    log_info!(
        "Seeded {} machines, {} status logs, {} component values",
        summary.machines,
        summary.status_logs,
        summary.component_values
    );

    Ok(summary)
}
