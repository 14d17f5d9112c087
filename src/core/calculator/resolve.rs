//! Overlap/gap resolver.
//!
//! Turns the consolidated periods of one team id into a partition of its
//! observed span: no two periods share a day, and the only days left
//! uncovered are the ones the [`GapPolicy`] tolerates (off weekdays and
//! explicit off windows). Operator corrections are applied last and always
//! win over what the roster says.

use crate::errors::{AppError, AppResult};
use crate::models::observation::TeamId;
use crate::models::period::{Correction, Period, PeriodOrigin};
use crate::utils::date::{days_between, serde_dmy};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

// ---------------------------
// Gap policy
// ---------------------------

/// Closed range of days nobody is expected to work (holidays, closures).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffWindow {
    #[serde(with = "serde_dmy")]
    pub start: NaiveDate,
    #[serde(with = "serde_dmy")]
    pub end: NaiveDate,
}

impl OffWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Which days a gap may consist of and still be left open.
#[derive(Debug, Clone, Default)]
pub struct GapPolicy {
    pub off_weekdays: Vec<Weekday>,
    pub off_windows: Vec<OffWindow>,
}

impl GapPolicy {
    pub fn is_off(&self, date: NaiveDate) -> bool {
        self.off_weekdays.contains(&date.weekday()) || self.off_windows.iter().any(|w| w.contains(date))
    }

    /// `true` when every day of `[from, to]` is off.
    pub fn tolerates(&self, from: NaiveDate, to: NaiveDate) -> bool {
        from <= to && days_between(from, to).into_iter().all(|d| self.is_off(d))
    }
}

// ---------------------------
// Corrections
// ---------------------------

/// The corrections file: a flat YAML list of authoritative periods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionSet {
    pub corrections: Vec<Correction>,
}

impl CorrectionSet {
    pub fn new(corrections: Vec<Correction>) -> Self {
        Self { corrections }
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn for_team(&self, team_id: TeamId) -> Vec<&Correction> {
        self.corrections
            .iter()
            .filter(|c| c.team_id == team_id)
            .collect()
    }

    pub fn teams(&self) -> BTreeSet<TeamId> {
        self.corrections.iter().map(|c| c.team_id).collect()
    }
}

// ---------------------------
// Building blocks
// ---------------------------

/// Copy of `p` restricted to `[start, end]`, or nothing when that is empty.
fn span(p: &Period, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Period> {
    let (start, end) = (start?, end?);
    (start <= end).then(|| Period {
        start,
        end,
        ..p.clone()
    })
}

/// Remove the days of `winner` from every piece; pieces it covers only
/// partly are truncated, pieces it sits inside are split in two.
pub fn carve(pieces: Vec<Period>, winner: &Period) -> Vec<Period> {
    let mut out = Vec::with_capacity(pieces.len() + 1);

    for piece in pieces {
        if !piece.overlaps(winner) {
            out.push(piece);
            continue;
        }

        debug!(team_id = piece.team_id, loser = %piece, winner = %winner, "overlap carved");

        if let Some(before) = span(&piece, Some(piece.start), winner.start.pred_opt()) {
            out.push(before);
        }
        if let Some(after) = span(&piece, winner.end.succ_opt(), Some(piece.end)) {
            out.push(after);
        }
    }

    out
}

fn inconsistency(team_id: TeamId, earlier: &Period, later: &Period) -> AppError {
    AppError::PeriodInconsistency {
        team_id,
        earlier: earlier.to_string(),
        later: later.to_string(),
    }
}

/// Reject inverted periods, naming the neighbour (in start order) they
/// clash with.
fn check_inverted(team_id: TeamId, periods: &[Period]) -> AppResult<()> {
    let mut order: Vec<&Period> = periods.iter().collect();
    order.sort_by_key(|p| p.start);

    for (i, &p) in order.iter().enumerate() {
        if !p.is_inverted() {
            continue;
        }
        return Err(match i.checked_sub(1).map(|j| order[j]) {
            Some(prev) => inconsistency(team_id, prev, p),
            None => inconsistency(team_id, p, order.get(i + 1).copied().unwrap_or(p)),
        });
    }

    Ok(())
}

/// Close every gap the policy does not tolerate.
///
/// When the later period's label already held earlier in the timeline it is
/// stretched backwards; otherwise the earlier period is stretched forwards.
/// Only periods accepted by `extendable` may move.
pub fn fill_gaps<F>(periods: &mut [Period], policy: &GapPolicy, extendable: F)
where
    F: Fn(&Period) -> bool,
{
    let mut seen: HashSet<String> = HashSet::new();

    for i in 1..periods.len() {
        seen.insert(periods[i - 1].label.clone());

        let (Some(gap_start), Some(gap_end)) =
            (periods[i - 1].end.succ_opt(), periods[i].start.pred_opt())
        else {
            continue;
        };
        if gap_start > gap_end {
            continue;
        }

        if policy.tolerates(gap_start, gap_end) {
            debug!(team_id = periods[i].team_id, %gap_start, %gap_end, "gap left open (off days)");
            continue;
        }

        let backward = seen.contains(&periods[i].label) && extendable(&periods[i]);

        if backward {
            periods[i].start = gap_start;
        } else if extendable(&periods[i - 1]) {
            periods[i - 1].end = gap_end;
        } else if extendable(&periods[i]) {
            periods[i].start = gap_start;
        } else {
            warn!(
                team_id = periods[i].team_id,
                %gap_start,
                %gap_end,
                "gap between two corrections left open"
            );
            continue;
        }

        debug!(team_id = periods[i].team_id, %gap_start, %gap_end, backward, "gap filled");
    }
}

/// Merge touching observed periods that carry the same label.
pub fn coalesce(periods: Vec<Period>) -> Vec<Period> {
    let mut out: Vec<Period> = Vec::with_capacity(periods.len());

    for p in periods {
        if let Some(last) = out.last_mut()
            && last.label == p.label
            && last.origin == PeriodOrigin::Observed
            && p.origin == PeriodOrigin::Observed
            && last.end.succ_opt() == Some(p.start)
        {
            last.end = p.end;
            continue;
        }
        out.push(p);
    }

    out
}

/// Carve the team's corrections into the automatic periods.
pub fn apply_corrections(
    team_id: TeamId,
    pieces: Vec<Period>,
    corrections: &[&Correction],
) -> AppResult<Vec<Period>> {
    let mut overrides: Vec<Period> = corrections.iter().map(|c| c.to_period()).collect();
    check_inverted(team_id, &overrides)?;
    overrides.sort_by_key(|p| p.start);

    // sorted by start: any overlap shows up between neighbours
    for w in overrides.windows(2) {
        if w[0].overlaps(&w[1]) {
            return Err(AppError::OverlappingCorrections {
                team_id,
                first: w[0].to_string(),
                second: w[1].to_string(),
            });
        }
    }

    let mut out = pieces;
    for o in overrides {
        out = carve(out, &o);
        out.push(o);
    }
    out.sort_by_key(|p| p.start);

    Ok(out)
}

/// Uncovered ranges between consecutive periods.
pub fn open_gaps(periods: &[Period]) -> Vec<(NaiveDate, NaiveDate)> {
    periods
        .windows(2)
        .filter_map(|w| {
            let (from, to) = (w[0].end.succ_opt()?, w[1].start.pred_opt()?);
            (from <= to).then_some((from, to))
        })
        .collect()
}

/// Sorted, non-inverted, pairwise disjoint.
pub fn verify_partition(team_id: TeamId, periods: &[Period]) -> AppResult<()> {
    check_inverted(team_id, periods)?;

    for w in periods.windows(2) {
        if w[1].start <= w[0].end {
            return Err(inconsistency(team_id, &w[0], &w[1]));
        }
    }

    Ok(())
}

// ---------------------------
// Entry points
// ---------------------------

/// Resolve the periods of one team id.
pub fn resolve(
    team_id: TeamId,
    periods: &[Period],
    corrections: &[&Correction],
    policy: &GapPolicy,
) -> AppResult<Vec<Period>> {
    check_inverted(team_id, periods)?;

    // stable: same-start periods keep input order, the later one wins
    let mut sorted = periods.to_vec();
    sorted.sort_by_key(|p| p.start);

    let mut pieces: Vec<Period> = Vec::with_capacity(sorted.len());
    for p in sorted {
        pieces = carve(pieces, &p);
        pieces.push(p);
        pieces.sort_by_key(|x| x.start);
    }

    fill_gaps(&mut pieces, policy, |_| true);
    let mut pieces = coalesce(pieces);

    if !corrections.is_empty() {
        pieces = apply_corrections(team_id, pieces, corrections)?;
        fill_gaps(&mut pieces, policy, |p| p.origin == PeriodOrigin::Observed);
        pieces = coalesce(pieces);
    }

    verify_partition(team_id, &pieces)?;

    Ok(pieces)
}

/// Resolve every team id that has periods or corrections.
pub fn resolve_all(
    consolidated: &BTreeMap<TeamId, Vec<Period>>,
    corrections: &CorrectionSet,
    policy: &GapPolicy,
) -> AppResult<BTreeMap<TeamId, Vec<Period>>> {
    let mut teams: BTreeSet<TeamId> = consolidated.keys().copied().collect();
    teams.extend(corrections.teams());

    let mut resolved = BTreeMap::new();
    for team_id in teams {
        let periods = consolidated.get(&team_id).map(Vec::as_slice).unwrap_or(&[]);
        let team = resolve(team_id, periods, &corrections.for_team(team_id), policy)?;
        resolved.insert(team_id, team);
    }

    Ok(resolved)
}
