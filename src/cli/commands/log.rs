use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::table::{Column, Table};

const MAX_MESSAGE: usize = 60;

fn truncate(s: &str) -> String {
    if s.chars().count() > MAX_MESSAGE {
        let mut t: String = s.chars().take(MAX_MESSAGE - 3).collect();
        t.push_str("...");
        t
    } else {
        s.to_string()
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = DbPool::new(&cfg.database_path().to_string_lossy())?;
        init_db(&pool.conn)?;
        let rows = load_log(&pool.conn)?;

        if rows.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("id"),
            Column::new("date"),
            Column::new("operation"),
            Column::new("message"),
        ]);

        for r in rows {
            let op = if r.target.is_empty() {
                r.operation
            } else {
                format!("{} ({})", r.operation, truncate(&r.target))
            };
            table.add_row(vec![r.id.to_string(), r.date, op, truncate(&r.message)]);
        }

        header("Internal log");
        print!("{}", table.render());
    }

    Ok(())
}
