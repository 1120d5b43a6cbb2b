mod combine;
mod select;

use crate::estimate::round::Candidate;

/// The five-source round with one gross falseticker at (10, 12).
pub(super) fn falseticker_round() -> Vec<Candidate> {
    vec![
        Candidate::new(-1.0, 1.0),
        Candidate::new(-0.5, 1.5),
        Candidate::new(0.0, 2.0),
        Candidate::new(-2.0, 0.0),
        Candidate::new(10.0, 12.0),
    ]
}
