use std::marker::PhantomData;

use crate::{effect::Chain, traversal::Traversal};

/// Run `first` to completion, then feed the structure it produced to `second`.
///
/// Where [`crate::Compose`] nests one traversal inside every focus of another,
/// this sequences them, binding through the effect so it is threaded once
/// rather than stacked. That needs a [`Chain`] effect.
///
/// ```rust
/// use reify::{AndThen, Each, PartiallyApplied};
///
/// let staged = AndThen::new(Each, Each);
/// let out = staged.run::<Option<PartiallyApplied>, _, _, _, _, _>(
///     vec![1, 2],
///     |x: i32| Some(x * 10),
///     |y: i32| y.checked_sub(5),
/// );
/// assert_eq!(out, Some(vec![5, 15]));
/// ```
pub struct AndThen<First, Second, T> {
    first: First,
    second: Second,
    _mid: PhantomData<fn() -> T>,
}

impl<First, Second, T> AndThen<First, Second, T> {
    pub fn new(first: First, second: Second) -> Self {
        Self {
            first,
            second,
            _mid: PhantomData,
        }
    }

    pub fn run<'a, E, A, B, C, S, U>(
        &'a self,
        source: S,
        visit_first: impl FnMut(A) -> E::Of<B>,
        visit_second: impl FnMut(B) -> E::Of<C> + 'a,
    ) -> E::Of<U>
    where
        E: Chain<'a>,
        First: Traversal<A, B, S, T> + 'a,
        Second: Traversal<B, C, T, U> + 'a,
        A: 'a,
        B: 'a,
        C: 'a,
        S: 'a,
        T: 'a,
        U: 'a,
    {
        let produced = self.first.traverse::<E>(source, visit_first);
        let second = &self.second;
        E::bind(produced, move |mid: T| second.traverse::<E>(mid, visit_second))
    }
}
