use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config file (kept when it already exists)
///  - the SQLite staging database
///  - all pending DB migrations
pub fn handle(cli: &Cli, config_path: &Path) -> AppResult<()> {
    let cfg = Config::init_all(config_path, cli.db.as_deref())?;
    let db_path = cfg.database_path();

    info("Initializing rTeamline…");
    info(format!("Config file : {}", config_path.display()));
    info(format!("Database    : {}", db_path.display()));

    if let Some(dir) = db_path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }

    let conn = Connection::open(&db_path)?;
    init_db(&conn)?;

    // non bloccante
    if let Err(e) = log::ttlog(
        &conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", db_path.display()),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    success("rTeamline initialization completed!");
    Ok(())
}
