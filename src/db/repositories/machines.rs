use anyhow::{Context, Result};
use rusqlite::{params, Row};

use crate::db::connection::Database;
use crate::models::Machine;

fn row_to_machine(row: &Row) -> Result<Machine> {
    Ok(Machine {
        name: row.get("name")?,
        machine_type: row.get("machine_type")?,
    })
}

impl Database {
    /// Distinct machine types, sorted.
    pub async fn machine_types(&self) -> Result<Vec<String>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT machine_type
                 FROM machines
                 ORDER BY machine_type ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut types = Vec::new();
            while let Some(row) = rows.next()? {
                types.push(row.get(0)?);
            }

            Ok(types)
        })
        .await
    }

    pub async fn all_machines(&self) -> Result<Vec<Machine>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name, machine_type
                 FROM machines
                 ORDER BY name ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut machines = Vec::new();
            while let Some(row) = rows.next()? {
                machines.push(row_to_machine(row)?);
            }

            Ok(machines)
        })
        .await
    }

    /// Inserts a machine, or updates the type of an existing one.
    pub async fn insert_machine(&self, machine: &Machine) -> Result<()> {
        let record = machine.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO machines (name, machine_type)
                 VALUES (?1, ?2)
                 ON CONFLICT(name) DO UPDATE SET machine_type = excluded.machine_type",
                params![record.name, record.machine_type],
            )
            .with_context(|| format!("failed to insert machine {}", record.name))?;
            Ok(())
        })
        .await
    }
}
