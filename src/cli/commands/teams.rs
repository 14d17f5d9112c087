use crate::cli::commands::{read_source, resolve_format};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::logic::Core;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::info;
use crate::ui::report::{ReportKind, print_report};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Teams {
        source,
        out,
        format,
        periods,
        corrections,
        force,
    } = cmd
    {
        let settings = cfg.to_settings()?;
        let corrections = cfg.load_corrections(corrections.as_deref())?;
        if !corrections.is_empty() {
            info(format!("{} correction(s) loaded", corrections.len()));
        }

        let sheets = read_source(source)?;
        let timeline = Core::track_teams(&sheets, &settings, &corrections)?;

        let format = resolve_format(format, out);
        ExportLogic::export_memberships(&timeline, &format, out, *force)?;

        if let Some(periods_path) = periods {
            ExportLogic::export_periods(&timeline, &format, periods_path, *force)?;
        }

        print_report(&timeline.report, ReportKind::Teams);
    }

    Ok(())
}
