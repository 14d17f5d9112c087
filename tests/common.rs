#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use rteamline::models::observation::Observation;
use rteamline::models::period::Period;
use rteamline::source::{Cell, Sheet, SourceRow};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const WAGES_HEADER: &str =
    "Date,Team,Customer,Start,Finish,Lunch,Hours,Price,Pay,Travel,Notes,Paid,Team ID";

pub fn rtl() -> Command {
    cargo_bin_cmd!("rteamline")
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid test date")
}

/// Day of December 2024, the month most fixtures live in.
pub fn dec(day: u32) -> NaiveDate {
    d(2024, 12, day)
}

pub fn obs(team_id: i64, date: NaiveDate, label: &str) -> Observation {
    Observation::core(date, team_id, label)
}

pub fn period(team_id: i64, label: &str, start: NaiveDate, end: NaiveDate) -> Period {
    Period::observed(team_id, label, start, end)
}

/// Row of text cells, as the CSV reader produces them.
/// One observation per boundary date of each period; consolidating the
/// result gives the same periods back.
pub fn to_observations(periods: &[Period]) -> Vec<Observation> {
    periods
        .iter()
        .flat_map(|p| {
            let mut v = vec![Observation::core(p.start, p.team_id, &p.label)];
            if p.end != p.start {
                v.push(Observation::core(p.end, p.team_id, &p.label));
            }
            v
        })
        .collect()
}

pub fn text_row(number: usize, cells: &[&str]) -> SourceRow {
    SourceRow::new(number, cells.iter().map(|c| Cell::text_of(c)).collect())
}

/// A full 13-column wages row.
#[allow(clippy::too_many_arguments)]
pub fn wages_row(
    number: usize,
    date: &str,
    team: &str,
    customer: &str,
    start: &str,
    finish: &str,
    lunch: &str,
    price: &str,
    team_id: &str,
) -> SourceRow {
    text_row(
        number,
        &[
            date, team, customer, start, finish, lunch, "", price, "", "", "", "", team_id,
        ],
    )
}

pub fn sheet(name: &str, rows: Vec<SourceRow>) -> Sheet {
    Sheet {
        name: name.to_string(),
        rows,
    }
}

/// Scratch directory with its own config file and database, so CLI runs
/// never touch the real home directory.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn config(&self) -> PathBuf {
        self.path("rteamline.conf")
    }

    pub fn db(&self) -> PathBuf {
        self.path("staging.sqlite")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let p = self.path(name);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&p, content).expect("write fixture");
        p
    }

    /// CSV sheet with the wages header followed by `lines`.
    pub fn write_sheet(&self, name: &str, lines: &[&str]) -> PathBuf {
        let mut content = String::from(WAGES_HEADER);
        for l in lines {
            content.push('\n');
            content.push_str(l);
        }
        content.push('\n');
        self.write(name, &content)
    }

    /// `rteamline --config <ws>/rteamline.conf --db <ws>/staging.sqlite ...`
    pub fn cmd(&self) -> Command {
        let mut cmd = rtl();
        cmd.arg("--config")
            .arg(self.config())
            .arg("--db")
            .arg(self.db())
            .env_remove("RUST_LOG");
        cmd
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}
