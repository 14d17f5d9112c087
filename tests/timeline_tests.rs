mod common;
use common::{dec, obs, period, to_observations};
use rteamline::core::calculator::consolidate::{consolidate, consolidate_all};
use rteamline::core::calculator::members::{canonical_label, expand, split_members};
use rteamline::core::calculator::resolve::{
    CorrectionSet, GapPolicy, OffWindow, open_gaps, resolve, resolve_all,
};
use rteamline::errors::AppError;
use rteamline::models::period::{Correction, Period, PeriodOrigin};
use std::collections::BTreeMap;

fn spans(periods: &[Period]) -> Vec<(String, u32, u32)> {
    use chrono::Datelike;
    periods
        .iter()
        .map(|p| (p.label.clone(), p.start.day(), p.end.day()))
        .collect()
}

fn correction(team_id: i64, name: &str, start: u32, end: u32) -> Correction {
    Correction {
        team_id,
        name: name.to_string(),
        start_date: dec(start),
        end_date: dec(end),
    }
}

// ---------------------------
// Consolidator
// ---------------------------

#[test]
fn test_consolidate_merges_runs_and_ignores_calendar_gaps() {
    let input = vec![
        obs(1, dec(2), "A & B"),
        obs(1, dec(9), "A & B"),
        obs(1, dec(3), "A & B"),
        obs(1, dec(16), "A & C"),
    ];

    let periods = consolidate(1, &input);

    assert_eq!(
        spans(&periods),
        vec![("A & B".to_string(), 2, 9), ("A & C".to_string(), 16, 16)]
    );
    assert!(periods.iter().all(|p| p.origin == PeriodOrigin::Observed));
}

#[test]
fn test_consolidate_is_idempotent() {
    let input = vec![
        obs(4, dec(5), "A & B"),
        obs(4, dec(13), "A & B"),
        obs(4, dec(11), "A & C"),
        obs(4, dec(20), "A & C"),
        obs(4, dec(20), "D"),
    ];

    let once = consolidate(4, &input);
    let twice = consolidate(4, &to_observations(&once));

    assert_eq!(once, twice);
}

#[test]
fn test_consolidate_same_date_ties_keep_input_order() {
    let input = vec![obs(1, dec(5), "A"), obs(1, dec(5), "B"), obs(1, dec(6), "B")];

    let periods = consolidate(1, &input);

    assert_eq!(
        spans(&periods),
        vec![("A".to_string(), 5, 5), ("B".to_string(), 5, 6)]
    );
}

#[test]
fn test_consolidate_all_groups_by_team() {
    let input = vec![obs(2, dec(1), "X"), obs(1, dec(1), "Y"), obs(2, dec(3), "X")];

    let all = consolidate_all(&input);

    assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(spans(&all[&2]), vec![("X".to_string(), 1, 3)]);
}

// ---------------------------
// Resolver
// ---------------------------

#[test]
fn test_scenario_label_returns_after_interlude() {
    let input = vec![
        obs(1, dec(5), "A & B"),
        obs(1, dec(13), "A & B"),
        obs(1, dec(11), "A & C"),
    ];

    let consolidated = consolidate(1, &input);
    let resolved = resolve(1, &consolidated, &[], &GapPolicy::default()).expect("resolve");

    assert_eq!(
        spans(&resolved),
        vec![
            ("A & B".to_string(), 5, 10),
            ("A & C".to_string(), 11, 11),
            ("A & B".to_string(), 12, 13),
        ]
    );
}

#[test]
fn test_overlap_truncates_the_earlier_period() {
    let input = vec![period(1, "A", dec(1), dec(10)), period(1, "B", dec(6), dec(15))];

    let resolved = resolve(1, &input, &[], &GapPolicy::default()).expect("resolve");

    assert_eq!(
        spans(&resolved),
        vec![("A".to_string(), 1, 5), ("B".to_string(), 6, 15)]
    );
}

#[test]
fn test_contained_period_splits_the_outer_one() {
    let input = vec![period(1, "A", dec(1), dec(20)), period(1, "B", dec(8), dec(10))];

    let resolved = resolve(1, &input, &[], &GapPolicy::default()).expect("resolve");

    assert_eq!(
        spans(&resolved),
        vec![
            ("A".to_string(), 1, 7),
            ("B".to_string(), 8, 10),
            ("A".to_string(), 11, 20),
        ]
    );
}

#[test]
fn test_same_start_later_input_wins_the_day() {
    let input = vec![period(1, "A", dec(5), dec(5)), period(1, "B", dec(5), dec(5))];

    let resolved = resolve(1, &input, &[], &GapPolicy::default()).expect("resolve");

    assert_eq!(spans(&resolved), vec![("B".to_string(), 5, 5)]);
}

#[test]
fn test_gap_with_new_label_extends_earlier_period() {
    let input = vec![period(1, "A", dec(1), dec(3)), period(1, "B", dec(9), dec(12))];

    let resolved = resolve(1, &input, &[], &GapPolicy::default()).expect("resolve");

    assert_eq!(
        spans(&resolved),
        vec![("A".to_string(), 1, 8), ("B".to_string(), 9, 12)]
    );
}

#[test]
fn test_gap_between_same_labels_is_coalesced() {
    let input = vec![period(1, "A", dec(1), dec(3)), period(1, "A", dec(9), dec(12))];

    let resolved = resolve(1, &input, &[], &GapPolicy::default()).expect("resolve");

    assert_eq!(spans(&resolved), vec![("A".to_string(), 1, 12)]);
}

#[test]
fn test_gap_of_off_days_stays_open() {
    // 14-15/12/2024 is a weekend
    let input = vec![period(1, "A", dec(9), dec(13)), period(1, "B", dec(16), dec(20))];
    let policy = GapPolicy {
        off_weekdays: vec![chrono::Weekday::Sat, chrono::Weekday::Sun],
        off_windows: Vec::new(),
    };

    let resolved = resolve(1, &input, &[], &policy).expect("resolve");

    assert_eq!(open_gaps(&resolved), vec![(dec(14), dec(15))]);
}

#[test]
fn test_gap_partly_outside_off_window_is_filled() {
    let input = vec![period(1, "A", dec(1), dec(20)), period(1, "B", dec(28), dec(31))];
    let policy = GapPolicy {
        off_weekdays: Vec::new(),
        off_windows: vec![OffWindow {
            start: dec(24),
            end: dec(26),
        }],
    };

    let resolved = resolve(1, &input, &[], &policy).expect("resolve");

    assert!(open_gaps(&resolved).is_empty());
    assert_eq!(resolved[0].end, dec(27));
}

#[test]
fn test_inverted_period_is_fatal_and_names_both() {
    let input = vec![period(7, "A", dec(1), dec(4)), period(7, "B", dec(10), dec(6))];

    let err = resolve(7, &input, &[], &GapPolicy::default()).unwrap_err();

    match err {
        AppError::PeriodInconsistency {
            team_id,
            earlier,
            later,
        } => {
            assert_eq!(team_id, 7);
            assert!(earlier.contains("'A'"));
            assert!(later.contains("'B'"));
            assert!(later.contains("10/12/2024"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_partition_covers_observed_span() {
    let input = vec![
        obs(3, dec(1), "A"),
        obs(3, dec(4), "B"),
        obs(3, dec(4), "C"),
        obs(3, dec(9), "A"),
        obs(3, dec(15), "D"),
        obs(3, dec(2), "B"),
    ];

    let resolved = resolve(3, &consolidate(3, &input), &[], &GapPolicy::default()).expect("resolve");

    assert_eq!(resolved.first().map(|p| p.start), Some(dec(1)));
    assert_eq!(resolved.last().map(|p| p.end), Some(dec(15)));
    for w in resolved.windows(2) {
        assert_eq!(w[0].end.succ_opt(), Some(w[1].start));
        assert!(w[0].start <= w[0].end);
    }
}

// ---------------------------
// Corrections
// ---------------------------

#[test]
fn test_correction_carves_and_wins() {
    let input = vec![period(1, "A", dec(1), dec(20))];
    let fix = correction(1, "A & Z", 5, 8);

    let resolved = resolve(1, &input, &[&fix], &GapPolicy::default()).expect("resolve");

    assert_eq!(
        spans(&resolved),
        vec![
            ("A".to_string(), 1, 4),
            ("A & Z".to_string(), 5, 8),
            ("A".to_string(), 9, 20),
        ]
    );
    assert_eq!(resolved[1].origin, PeriodOrigin::Override);
}

#[test]
fn test_overlapping_corrections_are_fatal() {
    let set = CorrectionSet::new(vec![correction(2, "X", 1, 10), correction(2, "Y", 10, 12)]);
    let consolidated = BTreeMap::from([(2, vec![period(2, "A", dec(1), dec(31))])]);

    let err = resolve_all(&consolidated, &set, &GapPolicy::default()).unwrap_err();

    assert!(matches!(err, AppError::OverlappingCorrections { team_id: 2, .. }));
}

#[test]
fn test_inverted_correction_is_fatal() {
    let fix = correction(1, "X", 10, 3);

    let err = resolve(1, &[], &[&fix], &GapPolicy::default()).unwrap_err();

    assert!(matches!(err, AppError::PeriodInconsistency { team_id: 1, .. }));
}

#[test]
fn test_corrections_for_unobserved_team_are_kept() {
    let set = CorrectionSet::new(vec![correction(9, "Solo", 1, 5)]);

    let resolved = resolve_all(&BTreeMap::new(), &set, &GapPolicy::default()).expect("resolve");

    assert_eq!(spans(&resolved[&9]), vec![("Solo".to_string(), 1, 5)]);
}

#[test]
fn test_corrections_parse_from_yaml() {
    let yaml = r#"
- team_id: 1
  name: "Orla & Tia"
  start_date: 05/12/2024
  end_date: 10/12/2024
"#;
    let set: CorrectionSet = serde_yaml::from_str(yaml).expect("parse corrections");

    assert_eq!(set.len(), 1);
    assert_eq!(set.corrections[0].start_date, dec(5));
    assert_eq!(set.for_team(1).len(), 1);
}

// ---------------------------
// Label splitter
// ---------------------------

#[test]
fn test_split_and_rejoin_is_canonical() {
    let messy = "  Orla   Shelly&Tia &  ";
    let names = split_members(messy);

    assert_eq!(names, vec!["Orla Shelly".to_string(), "Tia".to_string()]);
    assert_eq!(canonical_label(&names), "Orla Shelly & Tia");
    assert_eq!(split_members(&canonical_label(&names)), names);
}

#[test]
fn test_expand_keeps_original_label() {
    let p = period(5, "A & B", dec(1), dec(3));

    let rows = expand(&p);

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|m| m.original_team == "A & B"));
    assert!(rows.iter().all(|m| m.start == dec(1) && m.end == dec(3)));
    assert_eq!(rows[1].name, "B");
}
