use futures::future::{self, FutureExt, LocalBoxFuture};

use super::{Chain, Effect};

/// Asynchronous effect: every carrier is a boxed future, resolved when awaited.
///
/// Combined futures are polled together, but their values are still merged in
/// call order.
#[derive(Clone, Copy, Debug)]
pub enum Deferred {}

impl<'a> Effect<'a> for Deferred {
    type Of<X: 'a> = LocalBoxFuture<'a, X>;

    fn lift<X: 'a>(x: X) -> Self::Of<X> {
        future::ready(x).boxed_local()
    }

    fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y> {
        fx.map(f).boxed_local()
    }

    fn combine<X: 'a, Y: 'a, F: FnOnce(X) -> Y + 'a>(
        ff: Self::Of<F>,
        fx: Self::Of<X>,
    ) -> Self::Of<Y> {
        future::join(ff, fx).map(|(f, x)| f(x)).boxed_local()
    }
}

impl<'a> Chain<'a> for Deferred {
    fn bind<X: 'a, Y: 'a>(
        fx: Self::Of<X>,
        f: impl FnOnce(X) -> Self::Of<Y> + 'a,
    ) -> Self::Of<Y> {
        fx.then(f).boxed_local()
    }
}
