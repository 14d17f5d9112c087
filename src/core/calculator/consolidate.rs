//! Period consolidation: per-date observations → contiguous label runs.

use crate::models::observation::{Observation, Role, TeamId};
use crate::models::period::Period;
use std::collections::BTreeMap;

/// Build the periods of one team id.
///
/// Observations are stable-sorted by date, so same-date observations keep
/// their input order. Consecutive identical labels merge into one period; a
/// label change closes the current period on the last date the old label was
/// seen and opens a new one. Calendar gaps alone never split a period.
pub fn consolidate(team_id: TeamId, observations: &[Observation]) -> Vec<Period> {
    let mut sorted: Vec<&Observation> = observations
        .iter()
        .filter(|o| o.team_id == team_id && o.role == Role::CoreMember)
        .collect();
    sorted.sort_by_key(|o| o.date);

    let mut periods: Vec<Period> = Vec::new();

    for obs in sorted {
        match periods.last_mut() {
            Some(current) if current.label == obs.raw_label => {
                // sorted input: the date can only move forward
                if obs.date > current.end {
                    current.end = obs.date;
                }
            }
            _ => periods.push(Period::observed(team_id, &obs.raw_label, obs.date, obs.date)),
        }
    }

    periods
}

/// Consolidate every team id found in `observations`, in team id order.
pub fn consolidate_all(observations: &[Observation]) -> BTreeMap<TeamId, Vec<Period>> {
    let mut by_team: BTreeMap<TeamId, Vec<Observation>> = BTreeMap::new();

    for obs in observations.iter().filter(|o| o.role == Role::CoreMember) {
        by_team.entry(obs.team_id).or_default().push(obs.clone());
    }

    by_team
        .into_iter()
        .map(|(team_id, obs)| (team_id, consolidate(team_id, &obs)))
        .collect()
}
