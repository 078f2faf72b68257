//! Error type for BCE-MOEA/D setup and execution.

/// Errors raised while setting up or running BCE-MOEA/D.
///
/// All of these are detected before or at the evaluation boundary; the
/// generation step itself never fails once its inputs are consistent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BceError {
    /// The problem declares constraints. Only unconstrained problems are supported.
    #[error("problem declares {n_constraints} constraint(s); BCE-MOEA/D supports unconstrained problems only")]
    ConstrainedProblem { n_constraints: usize },

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fewer reference directions than the algorithm needs.
    #[error("at least {required} reference directions are required, got {found}")]
    TooFewReferenceDirections { required: usize, found: usize },

    /// A reference direction has the wrong number of components.
    #[error("reference direction {index} has {found} components, expected {expected}")]
    ReferenceDimension {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// The problem bounds are empty or inverted.
    #[error("invalid bounds for variable {index}: low {low} > high {high}")]
    InvalidBounds { index: usize, low: f64, high: f64 },

    /// The problem has no decision variables.
    #[error("problem has no decision variables")]
    NoVariables,

    /// A fixed initial population does not match the problem shape.
    #[error("fixed sampling provides {found} vectors of the wrong shape, expected {expected} vectors of length {n_var}")]
    SamplingShape {
        expected: usize,
        found: usize,
        n_var: usize,
    },

    /// A supplied decision vector lies outside the problem bounds.
    #[error("decision vector {index} has variable {variable} = {value} outside its bounds")]
    SampleOutOfBounds {
        index: usize,
        variable: usize,
        value: f64,
    },

    /// The evaluator returned an objective vector of the wrong length.
    #[error("evaluation returned {found} objectives, expected {expected}")]
    ObjectiveDimension { expected: usize, found: usize },
}
