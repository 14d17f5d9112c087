use crate::cli::commands::read_source;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::logic::Core;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::replace_staging;
use crate::errors::AppResult;
use crate::ui::messages::{detail, header, success};
use crate::ui::report::{ReportKind, print_report};

/// Run both pipelines over the same source and replace the staging tables.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Load {
        source,
        corrections,
    } = cmd
    {
        let settings = cfg.to_settings()?;
        let corrections = cfg.load_corrections(corrections.as_deref())?;
        let refs = cfg.load_references()?;
        let sheets = read_source(source)?;

        // both pipelines must succeed before anything is written
        let timeline = Core::track_teams(&sheets, &settings, &corrections)?;
        let set = Core::build_jobs(&sheets, &settings, &refs)?;

        let db_path = cfg.database_path();
        let mut pool = DbPool::new(&db_path.to_string_lossy())?;
        init_db(&pool.conn)?;

        let counts = replace_staging(
            &mut pool,
            &set.customers,
            &set.jobs,
            &set.time_entries,
            &timeline.memberships,
        )?;

        ttlog(
            &pool.conn,
            "load",
            &source.display().to_string(),
            &format!(
                "{} customers, {} jobs, {} time entries, {} memberships",
                counts.customers, counts.jobs, counts.time_entries, counts.memberships
            ),
        )?;

        print_report(&timeline.report, ReportKind::Teams);
        print_report(&set.report, ReportKind::Jobs);

        header("Staging database");
        detail("database", db_path.display());
        detail("customers", counts.customers);
        detail("jobs", counts.jobs);
        detail("time entries", counts.time_entries);
        detail("memberships", counts.memberships);
        success("Staging tables replaced.");
    }

    Ok(())
}
