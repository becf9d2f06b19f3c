use thiserror::Error;

/// Failures surfaced by reification and replay.
///
/// Every variant is fatal to the call that produced it; nothing in this crate retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReifyError {
    #[error("rebuild expected {expected} replacement values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("replacement plan has {planned} slots but the traversal visited {foci} foci")]
    InvalidPlan { planned: usize, foci: usize },

    #[error("plan slot {slot} points at replacement {index}, but only {len} replacements exist")]
    PlanIndexOutOfRange { slot: usize, index: usize, len: usize },

    /// The replayed traversal asked for more values than it visited while collecting.
    #[error("replay asked for more than the {planned} planned values")]
    ReplayOverrun { planned: usize },

    /// The replayed traversal finished before consuming every planned value.
    #[error("replay consumed {visited} of {planned} planned values")]
    ReplayUnderrun { planned: usize, visited: usize },

    #[error("intermediate value differs from the source the outer traversal was reified against")]
    StaleIntermediate,
}
