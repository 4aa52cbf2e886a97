use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{format_timestamp, parse_timestamp},
};
use crate::models::ComponentValue;

fn row_to_component_value(row: &Row) -> Result<ComponentValue> {
    let recorded_at: String = row.get("recorded_at")?;

    Ok(ComponentValue {
        name: row.get("component_name")?,
        value: row.get("value")?,
        recorded_at: parse_timestamp(&recorded_at, "recorded_at")?,
    })
}

impl Database {
    /// Most recent reading of every component of a machine, by component name.
    pub async fn latest_component_values(&self, machine_name: &str) -> Result<Vec<ComponentValue>> {
        let machine_name = machine_name.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT component_name, value, recorded_at
                 FROM component_values
                 WHERE machine_name = ?1
                 ORDER BY component_name ASC, unixepoch(recorded_at, 'subsec') DESC, id DESC",
            )?;

            let mut rows = stmt.query(params![machine_name])?;
            let mut values: Vec<ComponentValue> = Vec::new();
            while let Some(row) = rows.next()? {
                let value = row_to_component_value(row)?;
                // Rows come newest first within each component.
                if values.last().map(|v| v.name == value.name).unwrap_or(false) {
                    continue;
                }
                values.push(value);
            }

            Ok(values)
        })
        .await
    }

    pub async fn insert_component_value(
        &self,
        machine_name: &str,
        component_name: &str,
        value: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<()> {
        let machine_name = machine_name.to_string();
        let component_name = component_name.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO component_values (machine_name, component_name, value, recorded_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    machine_name,
                    component_name,
                    value,
                    format_timestamp(&recorded_at),
                ],
            )
            .with_context(|| format!("failed to insert {component_name} reading"))?;
            Ok(())
        })
        .await
    }
}
