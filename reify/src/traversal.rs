use std::marker::PhantomData;

use crate::{
    collector::{Collected, Collector},
    effect::{traverse_vec, Effect, Identity},
    error::ReifyError,
    reified::{reify, reify_with_plan, Reified},
};

/// An effectful, structure-preserving update of `S` into `T` that visits zero
/// or more foci of type `A`, replacing each with a `B`.
///
/// Implementations see the effect only through [`Effect`], so a traversal is
/// parametric: the foci it visits, and their order, depend on `source` alone.
/// The visitor must be called in the same order its results are combined.
/// Traversals that break this (say, by consulting a counter between runs) are
/// not supported; reification detects the mismatch at replay time when it can.
///
/// ```rust
/// use reify::{Each, Identity, PartiallyApplied, Traversal};
///
/// let doubled = Each.traverse::<Identity>(vec![1, 2, 3], |x| x * 2);
/// assert_eq!(doubled, vec![2, 4, 6]);
///
/// let checked = Each.traverse::<Option<PartiallyApplied>>(vec![1, 2, 3], |x: u8| x.checked_mul(100));
/// assert_eq!(checked, None);
/// ```
pub trait Traversal<A, B, S, T> {
    fn traverse<'a, E>(&self, source: S, visit: impl FnMut(A) -> E::Of<B>) -> E::Of<T>
    where
        E: Effect<'a>,
        Self: 'a,
        A: 'a,
        B: 'a,
        S: 'a,
        T: 'a;
}

impl<'t, Tr, A, B, S, T> Traversal<A, B, S, T> for &'t Tr
where
    Tr: Traversal<A, B, S, T> + ?Sized,
{
    fn traverse<'a, E>(&self, source: S, visit: impl FnMut(A) -> E::Of<B>) -> E::Of<T>
    where
        E: Effect<'a>,
        Self: 'a,
        A: 'a,
        B: 'a,
        S: 'a,
        T: 'a,
    {
        (**self).traverse::<E>(source, visit)
    }
}

/// The identity traversal: the whole source is the single focus.
///
/// The two-sided unit of [`Compose`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Whole;

pub fn identity() -> Whole {
    Whole
}

impl<S, T> Traversal<S, T, S, T> for Whole {
    fn traverse<'a, E>(&self, source: S, mut visit: impl FnMut(S) -> E::Of<T>) -> E::Of<T>
    where
        E: Effect<'a>,
        Self: 'a,
        S: 'a,
        T: 'a,
    {
        visit(source)
    }
}

/// Visits nothing, returning the source unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ignored;

impl<A, B, S> Traversal<A, B, S, S> for Ignored {
    fn traverse<'a, E>(&self, source: S, _visit: impl FnMut(A) -> E::Of<B>) -> E::Of<S>
    where
        E: Effect<'a>,
        Self: 'a,
        A: 'a,
        B: 'a,
        S: 'a,
    {
        E::lift(source)
    }
}

/// Every element of a `Vec`, in index order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Each;

impl<A, B> Traversal<A, B, Vec<A>, Vec<B>> for Each {
    fn traverse<'a, E>(&self, source: Vec<A>, visit: impl FnMut(A) -> E::Of<B>) -> E::Of<Vec<B>>
    where
        E: Effect<'a>,
        Self: 'a,
        A: 'a,
        B: 'a,
        Vec<A>: 'a,
        Vec<B>: 'a,
    {
        traverse_vec::<E, A, B>(source, visit)
    }
}

/// Both halves of a homogeneous pair, left first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Both;

impl<A, B> Traversal<A, B, (A, A), (B, B)> for Both {
    fn traverse<'a, E>(
        &self,
        source: (A, A),
        mut visit: impl FnMut(A) -> E::Of<B>,
    ) -> E::Of<(B, B)>
    where
        E: Effect<'a>,
        Self: 'a,
        A: 'a,
        B: 'a,
        (A, A): 'a,
        (B, B): 'a,
    {
        let (left, right) = source;
        let left = E::map(visit(left), |l: B| move |r: B| (l, r));
        E::combine(left, visit(right))
    }
}

/// `outer` then `inner`: every focus `M` of the outer traversal is traversed
/// in turn by the inner one, all under the same effect.
///
/// Composition is associative and [`Whole`] is its unit on both sides.
pub struct Compose<Outer, Inner, M, N> {
    outer: Outer,
    inner: Inner,
    _mid: PhantomData<fn(M) -> N>,
}

impl<Outer, Inner, M, N> Compose<Outer, Inner, M, N> {
    pub fn new(outer: Outer, inner: Inner) -> Self {
        Self {
            outer,
            inner,
            _mid: PhantomData,
        }
    }
}

impl<Outer: Clone, Inner: Clone, M, N> Clone for Compose<Outer, Inner, M, N> {
    fn clone(&self) -> Self {
        Self::new(self.outer.clone(), self.inner.clone())
    }
}

impl<A, B, S, T, M, N, Outer, Inner> Traversal<A, B, S, T> for Compose<Outer, Inner, M, N>
where
    Outer: Traversal<M, N, S, T>,
    Inner: Traversal<A, B, M, N>,
{
    fn traverse<'a, E>(&self, source: S, mut visit: impl FnMut(A) -> E::Of<B>) -> E::Of<T>
    where
        E: Effect<'a>,
        Self: 'a,
        A: 'a,
        B: 'a,
        S: 'a,
        T: 'a,
    {
        let inner = &self.inner;
        self.outer
            .traverse::<E>(source, |mid| inner.traverse::<E>(mid, &mut visit))
    }
}

/// Convenience methods available on every traversal.
pub trait TraversalExt<A, B, S, T>: Traversal<A, B, S, T> + Sized {
    /// Run as a plain function, under [`Identity`].
    fn over(&self, source: S, visit: impl FnMut(A) -> B) -> T {
        self.traverse::<Identity>(source, visit)
    }

    /// The foci visited in `source`, in order.
    fn foci(&self, source: S) -> Vec<A> {
        self.traverse::<Collector<A>>(source, Collected::focus)
            .into_foci()
    }

    fn compose<C, D, Inner>(self, inner: Inner) -> Compose<Self, Inner, A, B>
    where
        Inner: Traversal<C, D, A, B>,
    {
        Compose::new(self, inner)
    }

    fn reify<'r>(&'r self, source: S) -> Reified<'r, A, B, S, T>
    where
        A: 'r,
        B: Clone + 'r,
        S: Clone + 'r,
        T: 'r,
    {
        reify(self, source)
    }

    fn reify_with_plan<'r>(
        &'r self,
        source: S,
        plan: Vec<usize>,
    ) -> Result<Reified<'r, A, B, S, T>, ReifyError>
    where
        A: 'r,
        B: Clone + 'r,
        S: Clone + 'r,
        T: 'r,
    {
        reify_with_plan(self, source, plan)
    }
}

impl<Tr, A, B, S, T> TraversalExt<A, B, S, T> for Tr where Tr: Traversal<A, B, S, T> {}
