use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use machine_dashboard::{
    aggregation::DurationPolicy,
    dashboard::{DashboardController, DashboardFilter, RefreshOutcome},
    db::Database,
    demo::seed_demo,
    models::DateRange,
    settings::{DashboardSettings, SettingsStore},
};

#[derive(Parser, Debug)]
#[command(name = "machine-dashboard", version)]
struct Args {
    /// Settings file (JSON). Created with defaults by `seed-demo` if missing.
    #[arg(long, default_value = "./dashboard-settings.json")]
    settings: PathBuf,

    /// SQLite database path. Takes precedence over the settings file and
    /// the MACHINE_DASHBOARD_DB environment variable.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List distinct machine types.
    Types,

    /// List machines, optionally of one type.
    Machines {
        #[arg(long = "type")]
        machine_type: Option<String>,
    },

    /// Compute the dashboard for one machine.
    Snapshot {
        #[arg(long)]
        machine: Option<String>,

        #[arg(long = "type")]
        machine_type: Option<String>,

        /// First day of the aggregation range (YYYY-MM-DD, UTC).
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the aggregation range (YYYY-MM-DD, UTC).
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Count only the part of each entry inside the range.
        #[arg(long)]
        clip: bool,
    },

    /// Populate the database with reproducible sample data.
    SeedDemo {
        #[arg(long, default_value_t = 7)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    machine_dashboard::init_logging();

    let args = Args::parse();
    let store = SettingsStore::new(args.settings.clone())?;
    let mut settings = store.get();

    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| settings.resolved_database_path());
    let db = Database::new(db_path.clone())
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    match args.command {
        Command::Types => {
            print_json(&db.machine_types().await?, args.pretty)?;
        }
        Command::Machines { machine_type } => {
            let machines: Vec<_> = db
                .all_machines()
                .await?
                .into_iter()
                .filter(|m| machine_type.as_ref().map_or(true, |t| &m.machine_type == t))
                .collect();
            print_json(&machines, args.pretty)?;
        }
        Command::Snapshot {
            machine,
            machine_type,
            from,
            to,
            clip,
        } => {
            if clip {
                settings.duration_policy = DurationPolicy::ClipToRange;
            }
            let range = resolve_range(from, to, &settings)?;
            let controller = DashboardController::new(db, settings);
            controller.load_machines().await?;

            let machine_type = match (machine_type, &machine) {
                (Some(machine_type), _) => Some(machine_type),
                (None, Some(name)) => controller
                    .machines()
                    .await
                    .into_iter()
                    .find(|m| &m.name == name)
                    .map(|m| m.machine_type),
                (None, None) => None,
            };
            let filter = DashboardFilter::new(range)
                .with_machine_type(machine_type)
                .with_machine(machine);

            match controller.refresh(&filter).await? {
                RefreshOutcome::Applied(snapshot) => print_json(&snapshot, args.pretty)?,
                RefreshOutcome::Discarded { .. } => {}
            }
        }
        Command::SeedDemo { seed } => {
            let summary = seed_demo(&db, Utc::now(), seed).await?;
            if !store.path().exists() {
                store.update(DashboardSettings {
                    database_path: db_path,
                    ..settings
                })?;
                info!("Wrote default settings to {}", store.path().display());
            }
            print_json(&summary, args.pretty)?;
        }
    }

    Ok(())
}

fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    settings: &DashboardSettings,
) -> Result<DateRange> {
    let days = i64::from(settings.default_range_days.max(1));
    let today = Utc::now().date_naive();
    let range = match (from, to) {
        (Some(first), Some(last)) => DateRange::from_days(first, last)?,
        (Some(first), None) => DateRange::from_days(first, today)?,
        (None, Some(last)) => DateRange::from_days(last - Duration::days(days - 1), last)?,
        (None, None) => DateRange::last_days(Utc::now(), settings.default_range_days)?,
    };
    Ok(range)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
