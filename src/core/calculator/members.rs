//! Team-label splitter.

use crate::models::observation::TeamId;
use crate::models::period::{MembershipInterval, Period};
use std::collections::BTreeMap;

const SEPARATOR: char = '&';

/// Individual names of a composite label, in label order.
///
/// Names are trimmed, empty fragments dropped and repeated names kept once.
pub fn split_members(label: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for part in label.split(SEPARATOR) {
        let name = part.split_whitespace().collect::<Vec<_>>().join(" ");
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }

    names
}

/// Canonical spelling of a label: `A & B & C`.
pub fn canonical_label(names: &[String]) -> String {
    names.join(" & ")
}

/// One membership interval per individual of the period's label.
pub fn expand(period: &Period) -> Vec<MembershipInterval> {
    split_members(&period.label)
        .into_iter()
        .map(|name| MembershipInterval {
            team_id: period.team_id,
            name,
            original_team: period.label.clone(),
            start: period.start,
            end: period.end,
        })
        .collect()
}

pub fn expand_all(resolved: &BTreeMap<TeamId, Vec<Period>>) -> Vec<MembershipInterval> {
    resolved.values().flatten().flat_map(expand).collect()
}
