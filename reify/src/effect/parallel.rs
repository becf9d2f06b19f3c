use std::marker::PhantomData;

use tracing::trace;

use super::{Chain, Effect};

/// `E`, with independent computations joined on the rayon thread pool.
///
/// Carriers are exactly `E`'s. Only [`Effect::join`] changes: both sides are
/// evaluated concurrently, then merged left before right, so the result is
/// indistinguishable from running `E` sequentially.
pub struct Parallel<E>(PhantomData<E>);

impl<'a, E: Effect<'a>> Effect<'a> for Parallel<E> {
    type Of<X: 'a> = E::Of<X>;

    fn lift<X: 'a>(x: X) -> Self::Of<X> {
        E::lift(x)
    }

    fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y> {
        E::map(fx, f)
    }

    fn combine<X: 'a, Y: 'a, F: FnOnce(X) -> Y + 'a>(
        ff: Self::Of<F>,
        fx: Self::Of<X>,
    ) -> Self::Of<Y> {
        E::combine(ff, fx)
    }

    fn join<X: 'a, Y: 'a>(
        left: impl FnOnce() -> Self::Of<X> + Send,
        right: impl FnOnce() -> Self::Of<Y> + Send,
    ) -> Self::Of<(X, Y)>
    where
        Self::Of<X>: Send,
        Self::Of<Y>: Send,
    {
        trace!("joining on the rayon pool");
        let (left, right) = rayon::join(left, right);
        E::combine(E::map(left, |x: X| move |y: Y| (x, y)), right)
    }
}

impl<'a, E: Chain<'a>> Chain<'a> for Parallel<E> {
    fn bind<X: 'a, Y: 'a>(
        fx: Self::Of<X>,
        f: impl FnOnce(X) -> Self::Of<Y> + 'a,
    ) -> Self::Of<Y> {
        E::bind(fx, f)
    }
}
