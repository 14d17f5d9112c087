use crate::cli::commands::{read_source, resolve_format};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::logic::Core;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::report::{ReportKind, print_report};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Jobs {
        source,
        out,
        format,
        force,
    } = cmd
    {
        let settings = cfg.to_settings()?;
        let refs = cfg.load_references()?;
        let sheets = read_source(source)?;

        let set = Core::build_jobs(&sheets, &settings, &refs)?;

        let format = resolve_format(format, out);
        ExportLogic::export_job_set(&set, &format, out, *force)?;

        print_report(&set.report, ReportKind::Jobs);
    }

    Ok(())
}
