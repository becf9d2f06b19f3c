//! Executable laws for traversals and their reified forms.
//!
//! Each check runs the given traversal (or traversals) and reports the first
//! disagreement it finds as a [`LawViolation`], carrying `Debug` renderings of
//! both sides. Visitors must be deterministic: most checks call them more than once.

use std::fmt::Debug;

use thiserror::Error;

use crate::{
    effect::{traverse_vec, Effect, Identity},
    error::ReifyError,
    fusion::{traverse_all, Fused},
    reified::reify,
    traversal::{Compose, Traversal, Whole},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LawViolation {
    #[error("lowered reification disagrees with the direct run: direct {direct}, lowered {lowered}")]
    RoundTrip { direct: String, lowered: String },

    #[error("rebuilding from the original holes changed the output: expected {expected}, rebuilt {rebuilt}")]
    RebuildIdentity { expected: String, rebuilt: String },

    #[error("rebuild accepted {supplied} replacements for {planned} planned slots")]
    ArityNotEnforced { planned: usize, supplied: usize },

    #[error("composition is not associative: grouped left {left}, grouped right {right}")]
    Associativity { left: String, right: String },

    #[error("identity is not a {side} unit of composition: composed {composed}, alone {alone}")]
    IdentityUnit {
        side: &'static str,
        composed: String,
        alone: String,
    },

    #[error("batched run disagrees with element-wise runs: batched {batched}, element-wise {separate}")]
    FusionCoherence { batched: String, separate: String },

    #[error(transparent)]
    Reify(#[from] ReifyError),
}

fn agree<X: PartialEq + Debug>(
    left: X,
    right: X,
    violation: impl FnOnce(String, String) -> LawViolation,
) -> Result<(), LawViolation> {
    if left == right {
        Ok(())
    } else {
        Err(violation(format!("{:?}", left), format!("{:?}", right)))
    }
}

/// `lower(reify(t, s))` run on `s` equals `t` run on `s`, wrapped in `Ok`.
pub fn round_trip<'a, E, Tr, A, B, S, T>(
    traversal: &'a Tr,
    source: S,
    mut visit: impl FnMut(A) -> E::Of<B>,
) -> Result<(), LawViolation>
where
    E: Effect<'a>,
    Tr: Traversal<A, B, S, T>,
    A: Clone + 'a,
    B: Clone + 'a,
    S: Clone + 'a,
    T: 'a,
    E::Of<Result<T, ReifyError>>: PartialEq + Debug,
{
    let direct = E::map(
        traversal.traverse::<E>(source.clone(), &mut visit),
        Ok::<T, ReifyError>,
    );
    let lowered = reify(traversal, source.clone())
        .lower()
        .traverse::<E>(source, visit);

    agree(direct, lowered, |direct, lowered| LawViolation::RoundTrip {
        direct,
        lowered,
    })
}

/// Rebuilding from the holes themselves reproduces the plain run with an
/// identity visitor.
pub fn rebuild_identity<Tr, A, S, T>(traversal: &Tr, source: S) -> Result<(), LawViolation>
where
    Tr: Traversal<A, A, S, T>,
    A: Clone,
    S: Clone,
    T: PartialEq + Debug,
{
    let expected = traversal.traverse::<Identity>(source.clone(), |a| a);
    let reified = reify(traversal, source);
    let rebuilt = reified.rebuild(reified.holes().to_vec())?;

    agree(expected, rebuilt, |expected, rebuilt| {
        LawViolation::RebuildIdentity { expected, rebuilt }
    })
}

/// Rebuild succeeds exactly when the replacement count matches the plan.
pub fn arity_enforced<Tr, A, B, S, T>(
    traversal: &Tr,
    source: S,
    replacements: Vec<B>,
) -> Result<(), LawViolation>
where
    Tr: Traversal<A, B, S, T>,
    B: Clone,
    S: Clone,
{
    let reified = reify(traversal, source);
    let planned = reified.plan().len();
    let supplied = replacements.len();

    match reified.rebuild(replacements) {
        Ok(_) if supplied == planned => Ok(()),
        Err(ReifyError::ArityMismatch { expected, actual })
            if supplied != planned && expected == planned && actual == supplied =>
        {
            Ok(())
        }
        Err(err) if supplied == planned => Err(err.into()),
        _ => Err(LawViolation::ArityNotEnforced { planned, supplied }),
    }
}

/// `(f . g) . h` and `f . (g . h)` agree on `source`.
#[allow(clippy::too_many_arguments)]
pub fn associativity<'a, E, F, G, H, A, B, S, T, M1, N1, M2, N2>(
    f: &'a F,
    g: &'a G,
    h: &'a H,
    source: S,
    mut visit: impl FnMut(A) -> E::Of<B>,
) -> Result<(), LawViolation>
where
    E: Effect<'a>,
    F: Traversal<M1, N1, S, T>,
    G: Traversal<M2, N2, M1, N1>,
    H: Traversal<A, B, M2, N2>,
    A: 'a,
    B: 'a,
    S: Clone + 'a,
    T: 'a,
    M1: 'a,
    N1: 'a,
    M2: 'a,
    N2: 'a,
    E::Of<T>: PartialEq + Debug,
{
    let grouped_left = Compose::<_, _, M2, N2>::new(Compose::<_, _, M1, N1>::new(f, g), h);
    let grouped_right = Compose::<_, _, M1, N1>::new(f, Compose::<_, _, M2, N2>::new(g, h));

    let left = grouped_left.traverse::<E>(source.clone(), &mut visit);
    let right = grouped_right.traverse::<E>(source, visit);

    agree(left, right, |left, right| LawViolation::Associativity {
        left,
        right,
    })
}

/// [`Whole`] composed on either side of `traversal` changes nothing.
pub fn identity_unit<'a, E, Tr, A, B, S, T>(
    traversal: &'a Tr,
    source: S,
    mut visit: impl FnMut(A) -> E::Of<B>,
) -> Result<(), LawViolation>
where
    E: Effect<'a>,
    Tr: Traversal<A, B, S, T>,
    A: 'a,
    B: 'a,
    S: Clone + 'a,
    T: 'a,
    E::Of<T>: PartialEq + Debug,
{
    let alone = traversal.traverse::<E>(source.clone(), &mut visit);
    let left = Compose::<_, _, S, T>::new(Whole, traversal).traverse::<E>(source.clone(), &mut visit);
    let right = Compose::<_, _, A, B>::new(traversal, Whole).traverse::<E>(source, visit);

    agree(&left, &alone, |composed, alone| LawViolation::IdentityUnit {
        side: "left",
        composed,
        alone,
    })?;
    agree(&right, &alone, |composed, alone| LawViolation::IdentityUnit {
        side: "right",
        composed,
        alone,
    })
}

/// A batched run agrees with running each source on its own, both for
/// [`Fused::run_batch`] and for the split-and-join [`traverse_all`].
pub fn fusion_coherence<'a, E, Tr, A, B, S, T, V>(
    traversal: &'a Tr,
    sources: Vec<S>,
    visit: &'a V,
) -> Result<(), LawViolation>
where
    E: Effect<'a>,
    Tr: Traversal<A, B, S, T> + Sync,
    V: Fn(A) -> E::Of<B> + Sync,
    A: 'a,
    B: 'a,
    S: Clone + Send + 'a,
    T: 'a,
    E::Of<Vec<T>>: PartialEq + Debug + Send,
{
    let separate = || {
        traverse_vec::<E, S, T>(sources.clone(), |source| {
            traversal.traverse::<E>(source, visit)
        })
    };

    let batched = Fused::<Tr, E>::new(traversal).run_batch::<A, B, S, T>(sources.clone(), visit);
    agree(batched, separate(), |batched, separate| {
        LawViolation::FusionCoherence { batched, separate }
    })?;

    let joined = traverse_all::<E, Tr, A, B, S, T, V>(traversal, sources.clone(), visit);
    agree(joined, separate(), |batched, separate| {
        LawViolation::FusionCoherence { batched, separate }
    })
}
