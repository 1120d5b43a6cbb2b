use crate::error::SyncError;
use crate::estimate::cluster::Survivor;
use crate::estimate::combine::Combiner;
use crate::estimate::round::Candidate;

fn survivor(lower: f64, upper: f64, index: usize) -> Survivor {
    Survivor::new(Candidate::new(lower, upper), index)
}

#[test]
fn test_weight_is_two_over_width() {
    assert_eq!(Combiner::weight(&survivor(0.0, 4.0, 0)).unwrap(), 0.5);
    assert_eq!(Combiner::weight(&survivor(1.0, 1.5, 0)).unwrap(), 4.0);
}

#[test]
fn test_equal_widths_reduce_to_mean() {
    let survivors = vec![
        survivor(-0.5, 1.5, 0),
        survivor(0.5, 2.5, 1),
        survivor(1.5, 3.5, 2),
    ];
    // Midpoints 0.5, 1.5, 2.5
    assert_eq!(Combiner::combine(&survivors).unwrap(), 1.5);
}

#[test]
fn test_narrow_interval_dominates() {
    // Weights 2.0 and 0.5 on midpoints 0.5 and 2.0
    let survivors = vec![survivor(0.0, 1.0, 0), survivor(0.0, 4.0, 1)];
    let estimate = Combiner::combine(&survivors).unwrap();
    assert!((estimate - 0.8).abs() < 1e-12, "estimate was {estimate}");
}

#[test]
fn test_single_survivor_is_its_midpoint() {
    let estimate = Combiner::combine(&[survivor(3.0, 5.0, 0)]).unwrap();
    assert_eq!(estimate, 4.0);
}

#[test]
fn test_zero_width_is_division_by_zero() {
    let survivors = vec![survivor(0.0, 1.0, 0), survivor(2.0, 2.0, 1)];
    let err = Combiner::combine(&survivors).unwrap_err();
    assert!(matches!(err, SyncError::DivisionByZero { .. }));
}

#[test]
fn test_negative_width_rejected() {
    let err = Combiner::combine(&[survivor(1.0, 0.0, 0)]).unwrap_err();
    assert!(matches!(err, SyncError::InvalidInput { .. }));
}

#[test]
fn test_empty_rejected() {
    let err = Combiner::combine(&[]).unwrap_err();
    assert!(matches!(err, SyncError::InvalidInput { .. }));
}
