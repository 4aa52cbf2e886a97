use anyhow::{Context, Result};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{check_duration, format_timestamp, parse_timestamp},
};
use crate::models::{DateRange, MachineStatus, StatusLogEntry, TimelineWindow};

fn row_to_entry(row: &Row) -> Result<StatusLogEntry> {
    let status: String = row.get("status")?;
    let log_time: String = row.get("log_time")?;
    let duration_seconds: f64 = row.get("duration_seconds")?;

    Ok(StatusLogEntry {
        status: MachineStatus::parse(&status),
        start_time: parse_timestamp(&log_time, "log_time")?,
        duration_secs: check_duration(duration_seconds, "duration_seconds")?,
    })
}

impl Database {
    /// Entries whose log time falls inside the range, counted whole by the
    /// default aggregation.
    pub async fn fetch_status_logs(
        &self,
        machine_name: &str,
        range: &DateRange,
    ) -> Result<Vec<StatusLogEntry>> {
        let machine_name = machine_name.to_string();
        let start = range.start.timestamp();
        let end = range.end.timestamp();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT status, log_time, duration_seconds
                 FROM machine_status_logs
                 WHERE machine_name = ?1
                   AND CAST(strftime('%s', log_time) AS INTEGER) BETWEEN ?2 AND ?3
                 ORDER BY CAST(strftime('%s', log_time) AS INTEGER) ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![machine_name, start, end])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_entry(row)?);
            }

            Ok(entries)
        })
        .await
    }

    /// Entries whose interval overlaps the range, ordered by log time. Unlike
    /// [`Database::fetch_status_logs`] this includes an entry that started
    /// before the range and is still running when the range begins.
    pub async fn fetch_overlapping_logs(
        &self,
        machine_name: &str,
        range: &DateRange,
    ) -> Result<Vec<StatusLogEntry>> {
        let machine_name = machine_name.to_string();
        let start = range.start.timestamp_micros() as f64 / 1e6;
        let end = range.end.timestamp_micros() as f64 / 1e6;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT status, log_time, duration_seconds
                 FROM machine_status_logs
                 WHERE machine_name = ?1
                   AND unixepoch(log_time, 'subsec') <= ?3
                   AND unixepoch(log_time, 'subsec') + duration_seconds > ?2
                 ORDER BY unixepoch(log_time, 'subsec') ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![machine_name, start, end])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_entry(row)?);
            }

            Ok(entries)
        })
        .await
    }

    /// Ordered entries for the timeline row.
    pub async fn fetch_timeline_logs(
        &self,
        machine_name: &str,
        window: &TimelineWindow,
    ) -> Result<Vec<StatusLogEntry>> {
        self.fetch_overlapping_logs(machine_name, &window.as_range())
            .await
    }

    /// Batch insert status log entries for one machine.
    pub async fn insert_status_logs(
        &self,
        machine_name: &str,
        entries: &[StatusLogEntry],
    ) -> Result<()> {
        let machine_name = machine_name.to_string();
        let entries = entries.to_vec();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            for entry in &entries {
                tx.execute(
                    "INSERT INTO machine_status_logs (
                        machine_name,
                        status,
                        log_time,
                        duration_seconds
                    ) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        machine_name,
                        entry.status.as_str(),
                        format_timestamp(&entry.start_time),
                        entry.duration_secs,
                    ],
                )
                .with_context(|| format!("failed to insert status log for {machine_name}"))?;
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }
}
