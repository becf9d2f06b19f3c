use std::marker::PhantomData;

use tracing::trace;

use crate::{
    effect::{traverse_vec, Effect},
    traversal::Traversal,
};

/// A traversal pre-bound to a single effect, for running it repeatedly.
pub struct Fused<'t, Tr: ?Sized, E> {
    traversal: &'t Tr,
    _effect: PhantomData<fn() -> E>,
}

impl<'t, Tr: ?Sized, E> Clone for Fused<'t, Tr, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'t, Tr: ?Sized, E> Copy for Fused<'t, Tr, E> {}

impl<'t, Tr: ?Sized, E> Fused<'t, Tr, E> {
    pub fn new(traversal: &'t Tr) -> Self {
        Self {
            traversal,
            _effect: PhantomData,
        }
    }

    pub fn run<'a, A, B, S, T>(&self, source: S, visit: impl FnMut(A) -> E::Of<B>) -> E::Of<T>
    where
        E: Effect<'a>,
        Tr: Traversal<A, B, S, T> + 'a,
        A: 'a,
        B: 'a,
        S: 'a,
        T: 'a,
    {
        self.traversal.traverse::<E>(source, visit)
    }

    /// Run over every source in order, threading one visitor through all of them.
    pub fn run_batch<'a, A, B, S, T>(
        &self,
        sources: impl IntoIterator<Item = S>,
        mut visit: impl FnMut(A) -> E::Of<B>,
    ) -> E::Of<Vec<T>>
    where
        E: Effect<'a>,
        Tr: Traversal<A, B, S, T> + 'a,
        A: 'a,
        B: 'a,
        S: 'a,
        T: 'a,
    {
        let traversal = self.traversal;
        traverse_vec::<E, S, T>(sources, |source| {
            traversal.traverse::<E>(source, &mut visit)
        })
    }

    /// Bind a visitor too, leaving a runner that only needs a source.
    pub fn with_visitor<V>(self, visit: V) -> Visiting<'t, Tr, E, V> {
        Visiting { fused: self, visit }
    }
}

/// A [`Fused`] traversal with its visitor attached.
pub struct Visiting<'t, Tr: ?Sized, E, V> {
    fused: Fused<'t, Tr, E>,
    visit: V,
}

impl<'t, Tr: ?Sized, E, V> Visiting<'t, Tr, E, V> {
    pub fn run<'a, A, B, S, T>(&mut self, source: S) -> E::Of<T>
    where
        E: Effect<'a>,
        Tr: Traversal<A, B, S, T> + 'a,
        V: FnMut(A) -> E::Of<B>,
        A: 'a,
        B: 'a,
        S: 'a,
        T: 'a,
    {
        self.fused.run::<A, B, S, T>(source, &mut self.visit)
    }
}

/// Run one traversal over many sources, splitting the batch in halves joined
/// with [`Effect::join`].
///
/// With a parallel effect the halves run concurrently; otherwise this is a
/// plain left-to-right fold. Either way results, and the effects that produced
/// them, come back in source order.
pub fn traverse_all<'a, E, Tr, A, B, S, T, V>(
    traversal: &Tr,
    mut sources: Vec<S>,
    visit: &V,
) -> E::Of<Vec<T>>
where
    E: Effect<'a>,
    Tr: Traversal<A, B, S, T> + Sync + ?Sized + 'a,
    V: Fn(A) -> E::Of<B> + Sync + ?Sized,
    A: 'a,
    B: 'a,
    S: Send + 'a,
    T: 'a,
    E::Of<Vec<T>>: Send,
{
    if sources.len() < 2 {
        return traverse_vec::<E, S, T>(sources, |source| traversal.traverse::<E>(source, visit));
    }

    let right = sources.split_off(sources.len() / 2);
    trace!(left = sources.len(), right = right.len(), "splitting traversal batch");

    let joined = E::join(
        || traverse_all::<E, Tr, A, B, S, T, V>(traversal, sources, visit),
        || traverse_all::<E, Tr, A, B, S, T, V>(traversal, right, visit),
    );
    E::map(joined, |(mut left, right): (Vec<T>, Vec<T>)| {
        left.extend(right);
        left
    })
}

/// Run two independent traversals under one effect, joined with [`Effect::join`].
#[allow(clippy::too_many_arguments)]
pub fn both<'a, E, Tr1, Tr2, A1, B1, S1, T1, A2, B2, S2, T2>(
    first: &Tr1,
    first_source: S1,
    first_visit: impl FnMut(A1) -> E::Of<B1> + Send,
    second: &Tr2,
    second_source: S2,
    second_visit: impl FnMut(A2) -> E::Of<B2> + Send,
) -> E::Of<(T1, T2)>
where
    E: Effect<'a>,
    Tr1: Traversal<A1, B1, S1, T1> + Sync + ?Sized + 'a,
    Tr2: Traversal<A2, B2, S2, T2> + Sync + ?Sized + 'a,
    A1: 'a,
    B1: 'a,
    S1: Send + 'a,
    T1: 'a,
    A2: 'a,
    B2: 'a,
    S2: Send + 'a,
    T2: 'a,
    E::Of<T1>: Send,
    E::Of<T2>: Send,
{
    E::join(
        move || first.traverse::<E>(first_source, first_visit),
        move || second.traverse::<E>(second_source, second_visit),
    )
}
