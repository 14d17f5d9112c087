use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{run_pending_migrations, table_exists};
use crate::db::pool::DbPool;
use crate::db::queries::count_rows;
use crate::errors::AppResult;
use crate::ui::messages::{detail, error, header, info, success};

const STAGING_TABLES: [&str; 5] = ["customers", "jobs", "time_entries", "team_memberships", "log"];

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        info: show_info,
    } = cmd
    {
        let db_path = cfg.database_path();
        let pool = DbPool::new(&db_path.to_string_lossy())?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            info("Running migrations…");
            run_pending_migrations(&pool.conn)?;
            success("Migration completed.");
        }

        //
        // 2) INFO
        //
        if *show_info {
            header("Database");
            detail("path", db_path.display());
            for table in STAGING_TABLES {
                if table_exists(&pool.conn, table)? {
                    detail(table, count_rows(&pool.conn, table)?);
                } else {
                    detail(table, "missing (run `rteamline db --migrate`)");
                }
            }
        }

        //
        // 3) CHECK
        //
        if *check {
            info("Running integrity check…");

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                success("Integrity check passed.");
            } else {
                error(format!("Integrity check failed: {}", integrity));
            }
        }
    }

    Ok(())
}
