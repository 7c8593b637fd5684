//! Type inference: heuristic scoring, selection and column classification.

mod classifier;
mod distribution;
mod scorer;

pub use classifier::{classify, ClassifierConfig, ColumnClassifier};
pub use distribution::{Distribution, ScoreDistribution};
pub use scorer::{
    has_fraction, score, score_facts, type_probabilities, ColumnFacts, FRACTION_TOLERANCE,
};
