use super::falseticker_round;
use crate::error::SyncError;
use crate::estimate::round::Candidate;
use crate::estimate::select::{Bracket, Endpoint, EndpointKind, QuorumInterval, Selector};

// ===== Endpoint ordering =====

#[test]
fn test_endpoints_three_per_candidate() {
    let selector = Selector::new(&falseticker_round());
    assert_eq!(selector.endpoints().len(), 15);
    assert_eq!(selector.candidate_count(), 5);
}

#[test]
fn test_endpoints_sorted_with_kind_tie_break() {
    let selector = Selector::new(&falseticker_round());
    let order: Vec<(f64, EndpointKind, usize)> = selector
        .endpoints()
        .iter()
        .map(|e| (e.value, e.kind, e.owner))
        .collect();

    use EndpointKind::{High, Low, Mid};
    assert_eq!(
        order,
        vec![
            (-2.0, Low, 3),
            (-1.0, Low, 0),
            (-1.0, Mid, 3),
            (-0.5, Low, 1),
            (0.0, Low, 2),
            (0.0, Mid, 0),
            (0.0, High, 3),
            (0.5, Mid, 1),
            (1.0, Mid, 2),
            (1.0, High, 0),
            (1.5, High, 1),
            (2.0, High, 2),
            (10.0, Low, 4),
            (11.0, Mid, 4),
            (12.0, High, 4),
        ]
    );
}

#[test]
fn test_endpoint_ties_broken_by_owner() {
    let a = Endpoint {
        kind: EndpointKind::Low,
        value: 1.0,
        owner: 0,
    };
    let b = Endpoint { owner: 1, ..a };
    assert!(a < b);
    assert_ne!(a, b);
    assert_eq!(a, Endpoint { ..a });
}

// ===== Falseticker round =====

#[test]
fn test_unanimity_unreachable_with_outlier() {
    let selector = Selector::new(&falseticker_round());
    // Five-way overlap never happens: (10, 12) overlaps nobody.
    assert_eq!(selector.scan(0), None);
    assert_eq!(selector.try_falsetickers(0), None);
}

#[test]
fn test_four_way_overlap_is_a_single_point() {
    let selector = Selector::new(&falseticker_round());
    // The four agreeing intervals only share the point 0.
    assert_eq!(
        selector.scan(1),
        Some(Bracket {
            lower: 0.0,
            upper: 0.0,
            midpoints_outside: 4,
        })
    );
    assert_eq!(selector.try_falsetickers(1), None);
}

#[test]
fn test_two_falsetickers_yield_quorum() {
    let selector = Selector::new(&falseticker_round());
    assert_eq!(
        selector.scan(2),
        Some(Bracket {
            lower: -0.5,
            upper: 1.0,
            midpoints_outside: 2,
        })
    );
    assert_eq!(
        selector.try_falsetickers(2),
        Some(QuorumInterval {
            lower: -0.5,
            upper: 1.0,
            falsetickers: 2,
        })
    );
}

#[test]
fn test_select_falseticker_round() {
    let selector = Selector::new(&falseticker_round());
    assert_eq!(selector.falseticker_limit(), 3);

    let interval = selector.select().unwrap();
    assert_eq!(interval.lower, -0.5);
    assert_eq!(interval.upper, 1.0);
    assert_eq!(interval.falsetickers, 2);
    assert_eq!(interval.width(), 1.5);
}

// ===== Other rounds =====

#[test]
fn test_select_unanimous_round() {
    let candidates = vec![
        Candidate::new(0.0, 2.0),
        Candidate::new(0.5, 2.5),
        Candidate::new(1.0, 3.0),
    ];
    let interval = Selector::new(&candidates).select().unwrap();
    assert_eq!(
        interval,
        QuorumInterval {
            lower: 1.0,
            upper: 2.0,
            falsetickers: 0,
        }
    );
}

#[test]
fn test_select_single_candidate() {
    let interval = Selector::new(&[Candidate::new(-0.25, 0.75)])
        .select()
        .unwrap();
    assert_eq!(interval.lower, -0.25);
    assert_eq!(interval.upper, 0.75);
}

#[test]
fn test_touching_intervals_have_no_quorum() {
    // Two sources sharing only the point 1.0; a majority of two is both.
    let candidates = vec![Candidate::new(0.0, 1.0), Candidate::new(1.0, 2.0)];
    let err = Selector::new(&candidates).select().unwrap_err();
    assert!(matches!(
        err,
        SyncError::NoQuorum {
            candidates: 2,
            falsetickers: 0
        }
    ));
}

#[test]
fn test_disjoint_sources_have_no_quorum() {
    let candidates = vec![
        Candidate::new(0.0, 1.0),
        Candidate::new(5.0, 6.0),
        Candidate::new(10.0, 11.0),
        Candidate::new(15.0, 16.0),
    ];
    let err = Selector::new(&candidates).select().unwrap_err();
    assert!(err.is_quorum_failure());
}

#[test]
fn test_select_empty_round_is_invalid() {
    let err = Selector::new(&[]).select().unwrap_err();
    assert!(matches!(err, SyncError::InvalidInput { .. }));
}

#[test]
fn test_scan_more_falsetickers_than_candidates() {
    let selector = Selector::new(&falseticker_round());
    assert_eq!(selector.scan(6), None);
}

// ===== QuorumInterval =====

#[test]
fn test_contains_midpoint_inclusive() {
    let interval = QuorumInterval {
        lower: -0.5,
        upper: 1.0,
        falsetickers: 0,
    };
    assert!(interval.contains_midpoint(&Candidate::new(-1.0, 0.0)));
    assert!(interval.contains_midpoint(&Candidate::new(0.0, 2.0)));
    assert!(!interval.contains_midpoint(&Candidate::new(-2.0, 0.0)));
    assert!(!interval.contains_midpoint(&Candidate::new(10.0, 12.0)));
}
