use anyhow::{bail, Context, Result};
use rusqlite::{Connection, Transaction};

const CURRENT_SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let mut version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    if version > CURRENT_SCHEMA_VERSION {
        bail!(
            "database version ({}) is newer than supported schema ({})",
            version,
            CURRENT_SCHEMA_VERSION
        );
    }

    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .context("failed to open migration transaction")?;

    while version < CURRENT_SCHEMA_VERSION {
        let next_version = version + 1;
        apply_migration(&tx, next_version)
            .with_context(|| format!("migration to version {next_version} failed"))?;
        version = next_version;
    }

    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
        .context("failed to update user_version pragma")?;
    tx.commit().context("failed to commit migrations")?;

    Ok(())
}

/// Drop the three health relations and rebuild them at the current version.
///
/// Destructive; every row written by earlier runs is gone afterwards.
pub fn reset_schema(conn: &mut Connection) -> Result<()> {
    let tx = conn
        .transaction()
        .context("failed to open reset transaction")?;

    tx.execute_batch(include_str!("schemas/drop_all.sql"))
        .context("failed to drop health tables")?;
    for version in 1..=CURRENT_SCHEMA_VERSION {
        apply_migration(&tx, version)
            .with_context(|| format!("recreating schema version {version} failed"))?;
    }

    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
        .context("failed to update user_version pragma")?;
    tx.commit().context("failed to commit schema reset")?;

    Ok(())
}

fn apply_migration(tx: &Transaction<'_>, version: i32) -> Result<()> {
    match version {
        1 => {
            tx.execute_batch(include_str!("schemas/schema_v1.sql"))
                .context("failed to execute schema_v1.sql")?;
            Ok(())
        }
        _ => bail!("unknown migration target version: {version}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_migrations_create_tables_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        assert_eq!(
            table_names(&conn),
            vec!["batteries", "battery_cycles", "cycle_plot_data"]
        );
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_reset_clears_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO batteries (battery_id, total_cycles, description) VALUES ('B0005', 3, 'x')",
            [],
        )
        .unwrap();

        reset_schema(&mut conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM batteries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(table_names(&conn).len(), 3);
    }

    #[test]
    fn test_newer_database_is_refused() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION + 1)
            .unwrap();

        let err = run_migrations(&mut conn).unwrap_err();
        assert!(err.to_string().contains("newer than supported schema"));
    }

    #[test]
    fn test_battery_cycles_column_order() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        let stmt = conn.prepare("SELECT * FROM battery_cycles").unwrap();
        let columns: Vec<&str> = stmt.column_names();
        assert_eq!(
            columns,
            vec![
                "battery_id",
                "cycle_id",
                "SOH",
                "HI1_peak_temp_time",
                "HI2_peak_temp",
                "HI3_avg_temp",
                "HI4_initial_voltage",
                "HI5_final_voltage",
                "HI6_voltage_drop",
                "HI7_avg_voltage",
                "HI8_avg_current",
                "HI9_peak_current",
            ]
        );
    }
}
