use std::{fmt, rc::Rc};

use tracing::{debug, trace, warn};

use crate::{
    collector::{Collected, Collector},
    effect::{traverse_vec, Effect},
    error::ReifyError,
    supplier::{Cursor, Supplier},
    traversal::Traversal,
};

type Replay<'r, B, T> = dyn Fn(&[B], &[usize]) -> Result<T, ReifyError> + 'r;

/// A traversal captured against one source: the foci it visited (its *holes*),
/// a plan saying which replacement fills each slot, and a replay that rebuilds
/// the output from replacement values.
///
/// ```rust
/// use reify::{reify, Each, ReifyError};
///
/// let reified = reify(&Each, vec![1, 2, 3]);
/// assert_eq!(reified.holes(), &[1, 2, 3]);
/// assert_eq!(reified.plan(), &[0, 1, 2]);
/// assert_eq!(reified.rebuild(vec![10, 20, 30]), Ok(vec![10, 20, 30]));
/// assert_eq!(
///     reified.rebuild(vec![10, 20]),
///     Err(ReifyError::ArityMismatch { expected: 3, actual: 2 })
/// );
/// ```
pub struct Reified<'r, A, B, S, T> {
    holes: Vec<A>,
    plan: Vec<usize>,
    source: S,
    replay: Box<Replay<'r, B, T>>,
}

/// Capture `traversal` against `source` with the identity plan.
///
/// Runs the traversal once under the collector. The returned value replays it
/// under the supplier each time it is rebuilt, so `traversal` must visit the
/// same foci on every run over the same source.
pub fn reify<'r, Tr, A, B, S, T>(traversal: &'r Tr, source: S) -> Reified<'r, A, B, S, T>
where
    Tr: Traversal<A, B, S, T> + ?Sized,
    A: 'r,
    B: Clone + 'r,
    S: Clone + 'r,
    T: 'r,
{
    let holes = traversal
        .traverse::<Collector<A>>(source.clone(), Collected::focus)
        .into_foci();
    debug!(foci = holes.len(), "reified traversal");

    let plan = (0..holes.len()).collect();
    let replay_source = source.clone();
    let replay = move |replacements: &[B], plan: &[usize]| -> Result<T, ReifyError> {
        let mut cursor = Cursor::new(replacements, plan);
        let rebuilt =
            traversal.traverse::<Supplier>(replay_source.clone(), |_| cursor.supply())?;
        cursor.finish()?;
        Ok(rebuilt)
    };

    Reified {
        holes,
        plan,
        source,
        replay: Box::new(replay),
    }
}

/// [`reify`], then swap in a custom plan.
pub fn reify_with_plan<'r, Tr, A, B, S, T>(
    traversal: &'r Tr,
    source: S,
    plan: Vec<usize>,
) -> Result<Reified<'r, A, B, S, T>, ReifyError>
where
    Tr: Traversal<A, B, S, T> + ?Sized,
    A: 'r,
    B: Clone + 'r,
    S: Clone + 'r,
    T: 'r,
{
    reify(traversal, source).with_plan(plan)
}

impl<'r, A, B, S, T> Reified<'r, A, B, S, T> {
    /// Foci in visitation order.
    pub fn holes(&self) -> &[A] {
        &self.holes
    }

    pub fn into_holes(self) -> Vec<A> {
        self.holes
    }

    /// Slot `i` of a rebuild is filled with `replacements[plan[i]]`.
    pub fn plan(&self) -> &[usize] {
        &self.plan
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Replace the plan. It must have one entry per hole and every entry must
    /// index into a replacement sequence of that same length. Entries may
    /// repeat, so a plan can fill several slots from one replacement and leave
    /// other replacements unused.
    pub fn with_plan(mut self, plan: Vec<usize>) -> Result<Self, ReifyError> {
        if plan.len() != self.holes.len() {
            return Err(ReifyError::InvalidPlan {
                planned: plan.len(),
                foci: self.holes.len(),
            });
        }
        let len = plan.len();
        if let Some((slot, &index)) = plan.iter().enumerate().find(|&(_, &index)| index >= len) {
            return Err(ReifyError::PlanIndexOutOfRange { slot, index, len });
        }

        self.plan = plan;
        Ok(self)
    }

    /// Rebuild the output for the captured source from `replacements`, one per slot.
    pub fn rebuild(&self, replacements: Vec<B>) -> Result<T, ReifyError> {
        if replacements.len() != self.plan.len() {
            debug!(
                expected = self.plan.len(),
                actual = replacements.len(),
                "rebuild arity mismatch"
            );
            return Err(ReifyError::ArityMismatch {
                expected: self.plan.len(),
                actual: replacements.len(),
            });
        }

        trace!(slots = self.plan.len(), "replaying traversal");
        (self.replay)(&replacements, &self.plan)
    }

    /// Turn this back into a traversal: the visitor is applied to each hole in
    /// order and the results are rebuilt. The lowered traversal ignores the
    /// source it is handed and always rebuilds the captured one.
    pub fn lower(self) -> Lowered<'r, A, B, S, T> {
        Lowered(Rc::new(self))
    }

    /// Staged composition: rebuild the intermediate value from `replacements`
    /// and hand over to `outer`, which must have been reified against exactly
    /// that intermediate.
    ///
    /// The result has this traversal's holes and `outer`'s plan and replay, so
    /// both must have visited the same number of foci; otherwise this fails
    /// with [`ReifyError::InvalidPlan`].
    pub fn pipe<C, U>(
        self,
        replacements: Vec<B>,
        outer: Reified<'r, B, C, T, U>,
    ) -> Result<Reified<'r, A, C, S, U>, ReifyError>
    where
        T: PartialEq,
    {
        if outer.plan.len() != self.holes.len() {
            warn!(
                inner_foci = self.holes.len(),
                outer_slots = outer.plan.len(),
                "piped traversals disagree on focus count"
            );
            return Err(ReifyError::InvalidPlan {
                planned: outer.plan.len(),
                foci: self.holes.len(),
            });
        }

        let intermediate = self.rebuild(replacements)?;
        if intermediate != outer.source {
            warn!("outer traversal was reified against a different intermediate value");
            return Err(ReifyError::StaleIntermediate);
        }

        debug!(
            inner_foci = self.holes.len(),
            outer_foci = outer.holes.len(),
            "piped reified traversals"
        );
        Ok(Reified {
            holes: self.holes,
            plan: outer.plan,
            source: self.source,
            replay: outer.replay,
        })
    }
}

impl<'r, A: fmt::Debug, B, S: fmt::Debug, T> fmt::Debug for Reified<'r, A, B, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reified")
            .field("holes", &self.holes)
            .field("plan", &self.plan)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// A [`Reified`] traversal lowered back into a [`Traversal`].
pub struct Lowered<'r, A, B, S, T>(Rc<Reified<'r, A, B, S, T>>);

impl<'r, A, B, S, T> Clone for Lowered<'r, A, B, S, T> {
    fn clone(&self) -> Self {
        Lowered(Rc::clone(&self.0))
    }
}

impl<'r, A, B, S, T> Lowered<'r, A, B, S, T> {
    pub fn reified(&self) -> &Reified<'r, A, B, S, T> {
        &self.0
    }
}

impl<'r, A: Clone, B, S, T> Traversal<A, B, S, Result<T, ReifyError>> for Lowered<'r, A, B, S, T> {
    fn traverse<'a, E>(
        &self,
        _source: S,
        visit: impl FnMut(A) -> E::Of<B>,
    ) -> E::Of<Result<T, ReifyError>>
    where
        E: Effect<'a>,
        Self: 'a,
        A: 'a,
        B: 'a,
        S: 'a,
        Result<T, ReifyError>: 'a,
    {
        let reified = Rc::clone(&self.0);
        let replacements = traverse_vec::<E, A, B>(reified.holes.iter().cloned(), visit);
        E::map(replacements, move |replacements: Vec<B>| {
            reified.rebuild(replacements)
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        effect::{Identity, PartiallyApplied},
        traversal::{Both, Each, TraversalExt},
    };

    #[test]
    fn reify_then_rebuild() {
        let reified = reify(&Each, vec![1, 2, 3]);
        assert_eq!(reified.holes(), &[1, 2, 3]);
        assert_eq!(reified.plan(), &[0, 1, 2]);
        assert_eq!(reified.source(), &vec![1, 2, 3]);
        assert_eq!(reified.rebuild(vec![10, 20, 30]), Ok(vec![10, 20, 30]));
    }

    #[test]
    fn rebuild_never_truncates_or_pads() {
        let reified = reify(&Each, vec![1, 2, 3]);
        assert_eq!(
            reified.rebuild(vec![10, 20]),
            Err(ReifyError::ArityMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            reified.rebuild(vec![10, 20, 30, 40]),
            Err(ReifyError::ArityMismatch {
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn rebuild_can_change_the_focus_type() {
        let reified: Reified<'_, i32, String, _, _> = reify(&Both, (1, 2));
        assert_eq!(
            reified.rebuild(vec!["one".to_string(), "two".to_string()]),
            Ok(("one".to_string(), "two".to_string()))
        );
    }

    #[test]
    fn empty_sources_rebuild_from_nothing() {
        let reified: Reified<'_, u8, u8, _, _> = reify(&Each, Vec::new());
        assert!(reified.holes().is_empty());
        assert_eq!(reified.rebuild(Vec::new()), Ok(Vec::new()));
    }

    #[test]
    fn custom_plans_repeat_and_omit() {
        let reified = Each
            .reify_with_plan(vec!['a', 'b', 'c'], vec![0, 0, 2])
            .unwrap();
        assert_eq!(reified.plan(), &[0, 0, 2]);
        assert_eq!(reified.rebuild(vec!['x', 'y', 'z']), Ok(vec!['x', 'x', 'z']));
    }

    #[test]
    fn malformed_plans_are_rejected() {
        let too_short =
            TraversalExt::<char, char, _, _>::reify_with_plan(&Each, vec!['a', 'b'], vec![0]).err();
        assert_eq!(
            too_short,
            Some(ReifyError::InvalidPlan {
                planned: 1,
                foci: 2
            })
        );

        let out_of_range =
            TraversalExt::<char, char, _, _>::reify_with_plan(&Each, vec!['a', 'b'], vec![1, 2])
                .err();
        assert_eq!(
            out_of_range,
            Some(ReifyError::PlanIndexOutOfRange {
                slot: 1,
                index: 2,
                len: 2
            })
        );
    }

    #[test]
    fn lowering_round_trips() {
        let source = vec![1, 2, 3];
        let lowered = reify(&Each, source.clone()).lower();

        assert_eq!(
            lowered.traverse::<Identity>(source.clone(), |x| x + 1),
            Ok(vec![2, 3, 4])
        );
        assert_eq!(
            lowered.traverse::<Option<PartiallyApplied>>(source.clone(), |x: i32| {
                x.checked_sub(2).filter(|y| *y >= 0)
            }),
            None
        );
        assert_eq!(
            lowered.traverse::<Option<PartiallyApplied>>(source, |x: i32| Some(x * 2)),
            Some(Ok(vec![2, 4, 6]))
        );
    }

    #[test]
    fn lowered_ignores_the_source_it_is_handed() {
        let lowered = reify(&Each, vec![1, 2]).lower();
        assert_eq!(lowered.over(vec![7, 8, 9], |x: i32| x), Ok(vec![1, 2]));
    }

    #[test]
    fn pipe_checks_the_intermediate() {
        let inner = reify(&Each, vec![1, 2]);
        let outer: Reified<'_, i32, String, _, _> = reify(&Each, vec![10, 20]);
        let piped = inner.pipe(vec![10, 20], outer).unwrap();
        assert_eq!(piped.holes(), &[1, 2]);
        assert_eq!(piped.source(), &vec![1, 2]);
        assert_eq!(
            piped.rebuild(vec!["a".to_string(), "b".to_string()]),
            Ok(vec!["a".to_string(), "b".to_string()])
        );

        let inner = reify(&Each, vec![1, 2]);
        let outer: Reified<'_, i32, String, _, _> = reify(&Each, vec![10, 20]);
        assert_eq!(
            inner.pipe(vec![10, 99], outer).err(),
            Some(ReifyError::StaleIntermediate)
        );
    }

    #[test]
    fn pipe_rejects_differing_focus_counts() {
        let inner = reify(&Each, vec![(1, 2)]);
        let outer: Reified<'_, (i32, i32), i32, _, _> = reify(&Each, vec![(1, 2), (3, 4)]);
        assert_eq!(
            inner.pipe(vec![(1, 2)], outer).err(),
            Some(ReifyError::InvalidPlan {
                planned: 2,
                foci: 1
            })
        );
    }

    #[test]
    fn long_sequences_rebuild_and_lower() {
        let source: Vec<u32> = (0..100_000).collect();
        let bumped: Vec<u32> = source.iter().map(|x| x + 1).collect();

        let reified = reify(&Each, source.clone());
        assert_eq!(reified.holes().len(), 100_000);
        assert_eq!(reified.rebuild(bumped.clone()), Ok(bumped.clone()));

        let lowered = reified.lower();
        assert_eq!(
            lowered.traverse::<Option<PartiallyApplied>>(source.clone(), |x: u32| x.checked_add(1)),
            Some(Ok(bumped))
        );
    }

    proptest! {
        #[test]
        fn slots_follow_the_plan(
            (source, plan) in (1usize..16).prop_flat_map(|n| {
                (prop::collection::vec(any::<i32>(), n), prop::collection::vec(0..n, n))
            })
        ) {
            let replacements: Vec<i64> = source.iter().map(|x| i64::from(*x) * 2).collect();
            let expected: Vec<i64> = plan.iter().map(|&i| replacements[i]).collect();

            let reified =
                TraversalExt::<i32, i64, _, _>::reify_with_plan(&Each, source, plan).unwrap();
            prop_assert_eq!(reified.rebuild(replacements), Ok(expected));
        }
    }
}
