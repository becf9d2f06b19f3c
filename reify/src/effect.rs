use std::marker::PhantomData;

#[cfg(feature = "async")]
mod deferred;
#[cfg(feature = "parallel")]
mod parallel;

#[cfg(feature = "async")]
pub use deferred::Deferred;
#[cfg(feature = "parallel")]
pub use parallel::Parallel;

/// A computational effect that a [`crate::Traversal`] can be run against.
///
/// # Motivation
///
/// A traversal is written once, generically over *every* effect, and only ever
/// touches its effect through `lift`, `map` and `combine`. Because it cannot
/// inspect which effect it was given, the foci it visits (and their order) depend
/// only on its source value. The reification machinery leans on exactly that:
/// it runs the same traversal once against a collecting effect and later against
/// a supplying effect, and expects both runs to line up slot for slot.
///
/// # Implementing this trait
///
/// Rust can't implement a trait for a partially applied type like `Option`, so
/// effects are implemented for a *token* type instead, usually by filling the
/// value slot with the uninhabited [`PartiallyApplied`] enum. The carrier is then
/// recovered through the generic associated type `Of`.
///
/// The lifetime `'a` bounds every value the carrier may hold, which lets lazy or
/// asynchronous carriers box the continuations they are handed.
///
/// ```rust
/// use reify::{Effect, PartiallyApplied};
///
/// #[derive(Debug, PartialEq)]
/// struct Counted<X>(usize, X);
///
/// impl<'a> Effect<'a> for Counted<PartiallyApplied> {
///     type Of<X: 'a> = Counted<X>;
///
///     fn lift<X: 'a>(x: X) -> Self::Of<X> {
///         Counted(0, x)
///     }
///
///     fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y> {
///         Counted(fx.0, f(fx.1))
///     }
///
///     fn combine<X: 'a, Y: 'a, F: FnOnce(X) -> Y + 'a>(
///         ff: Self::Of<F>,
///         fx: Self::Of<X>,
///     ) -> Self::Of<Y> {
///         Counted(ff.0 + fx.0, (ff.1)(fx.1))
///     }
/// }
///
/// let tallied = <Counted<PartiallyApplied>>::combine(Counted(1, |x: i32| x + 1), Counted(2, 40));
/// assert_eq!(tallied, Counted(3, 41));
/// ```
///
/// # Laws
///
/// Nothing here checks them, but every conforming effect must satisfy:
///
/// - `map(lift(a), f) == lift(f(a))`
/// - `combine(lift(f), lift(a)) == lift(f(a))`
/// - sequencing via `combine` is associative, and left effects happen before right ones
///
/// An effect that breaks them produces wrong results, not errors.
pub trait Effect<'a> {
    /// the carrier, `Of<X>` holds an effectful `X`
    type Of<X: 'a>: 'a;

    /// Wrap a pure value.
    fn lift<X: 'a>(x: X) -> Self::Of<X>;

    /// Transform the carried value, preserving the effect.
    fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y>;

    /// Merge two independent computations, applying the function carried by
    /// the first to the value carried by the second.
    fn combine<X: 'a, Y: 'a, F: FnOnce(X) -> Y + 'a>(
        ff: Self::Of<F>,
        fx: Self::Of<X>,
    ) -> Self::Of<Y>;

    /// Run two independent computations and pair their results.
    ///
    /// Evaluates `left` then `right`. Effects with a parallel-combine capability
    /// override this to evaluate both sides concurrently, but must still merge
    /// them left before right.
    fn join<X: 'a, Y: 'a>(
        left: impl FnOnce() -> Self::Of<X> + Send,
        right: impl FnOnce() -> Self::Of<Y> + Send,
    ) -> Self::Of<(X, Y)>
    where
        Self::Of<X>: Send,
        Self::Of<Y>: Send,
    {
        let left = left();
        let right = right();
        Self::combine(Self::map(left, |x: X| move |y: Y| (x, y)), right)
    }
}

/// Effects whose next computation may depend on the value produced by the last.
pub trait Chain<'a>: Effect<'a> {
    fn bind<X: 'a, Y: 'a>(
        fx: Self::Of<X>,
        f: impl FnOnce(X) -> Self::Of<Y> + 'a,
    ) -> Self::Of<Y>;
}

/// An uninhabited type used to define [`Effect`] instances for partially-applied types.
///
/// For example: the `Effect` instance for `Option<X>` cannot be written over the
/// partially-applied type `Option`, so instead we write it over `Option<PartiallyApplied>`
#[derive(Clone, Debug)]
pub enum PartiallyApplied {}

/// The identity effect: no wrapping at all.
#[derive(Clone, Copy, Debug)]
pub enum Identity {}

impl<'a> Effect<'a> for Identity {
    type Of<X: 'a> = X;

    #[inline(always)]
    fn lift<X: 'a>(x: X) -> Self::Of<X> {
        x
    }

    #[inline(always)]
    fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y> {
        f(fx)
    }

    #[inline(always)]
    fn combine<X: 'a, Y: 'a, F: FnOnce(X) -> Y + 'a>(
        ff: Self::Of<F>,
        fx: Self::Of<X>,
    ) -> Self::Of<Y> {
        ff(fx)
    }
}

impl<'a> Chain<'a> for Identity {
    #[inline(always)]
    fn bind<X: 'a, Y: 'a>(
        fx: Self::Of<X>,
        f: impl FnOnce(X) -> Self::Of<Y> + 'a,
    ) -> Self::Of<Y> {
        f(fx)
    }
}

// short-circuits on the first `None`
impl<'a> Effect<'a> for Option<PartiallyApplied> {
    type Of<X: 'a> = Option<X>;

    fn lift<X: 'a>(x: X) -> Self::Of<X> {
        Some(x)
    }

    fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y> {
        fx.map(f)
    }

    fn combine<X: 'a, Y: 'a, F: FnOnce(X) -> Y + 'a>(
        ff: Self::Of<F>,
        fx: Self::Of<X>,
    ) -> Self::Of<Y> {
        ff.zip(fx).map(|(f, x)| f(x))
    }
}

impl<'a> Chain<'a> for Option<PartiallyApplied> {
    fn bind<X: 'a, Y: 'a>(
        fx: Self::Of<X>,
        f: impl FnOnce(X) -> Self::Of<Y> + 'a,
    ) -> Self::Of<Y> {
        fx.and_then(f)
    }
}

// the leftmost error wins
impl<'a, E: 'a> Effect<'a> for Result<PartiallyApplied, E> {
    type Of<X: 'a> = Result<X, E>;

    fn lift<X: 'a>(x: X) -> Self::Of<X> {
        Ok(x)
    }

    fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y> {
        fx.map(f)
    }

    fn combine<X: 'a, Y: 'a, F: FnOnce(X) -> Y + 'a>(
        ff: Self::Of<F>,
        fx: Self::Of<X>,
    ) -> Self::Of<Y> {
        let f = ff?;
        let x = fx?;
        Ok(f(x))
    }
}

impl<'a, E: 'a> Chain<'a> for Result<PartiallyApplied, E> {
    fn bind<X: 'a, Y: 'a>(
        fx: Self::Of<X>,
        f: impl FnOnce(X) -> Self::Of<Y> + 'a,
    ) -> Self::Of<Y> {
        fx.and_then(f)
    }
}

/// An associative append with a neutral element, used as the log of the writer effect.
pub trait Monoid {
    fn empty() -> Self;

    fn append(self, other: Self) -> Self;
}

impl<T> Monoid for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }

    fn append(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl Monoid for String {
    fn empty() -> Self {
        String::new()
    }

    fn append(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

// writer effect: accumulates a log alongside the value
impl<'a, W: Monoid + 'a> Effect<'a> for (W, PartiallyApplied) {
    type Of<X: 'a> = (W, X);

    fn lift<X: 'a>(x: X) -> Self::Of<X> {
        (W::empty(), x)
    }

    fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y> {
        (fx.0, f(fx.1))
    }

    fn combine<X: 'a, Y: 'a, F: FnOnce(X) -> Y + 'a>(
        ff: Self::Of<F>,
        fx: Self::Of<X>,
    ) -> Self::Of<Y> {
        let (log_f, f) = ff;
        let (log_x, x) = fx;
        (log_f.append(log_x), f(x))
    }
}

impl<'a, W: Monoid + 'a> Chain<'a> for (W, PartiallyApplied) {
    fn bind<X: 'a, Y: 'a>(
        fx: Self::Of<X>,
        f: impl FnOnce(X) -> Self::Of<Y> + 'a,
    ) -> Self::Of<Y> {
        let (log_x, x) = fx;
        let (log_y, y) = f(x);
        (log_x.append(log_y), y)
    }
}

/// The composition of two effects, `F1::Of<F2::Of<X>>`, is itself an effect.
pub struct Compose<F1, F2>(PhantomData<F1>, PhantomData<F2>);

impl<'a, F1: Effect<'a>, F2: Effect<'a>> Effect<'a> for Compose<F1, F2> {
    type Of<X: 'a> = F1::Of<F2::Of<X>>;

    fn lift<X: 'a>(x: X) -> Self::Of<X> {
        F1::lift(F2::lift(x))
    }

    fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y> {
        F1::map(fx, move |inner: F2::Of<X>| F2::map(inner, f))
    }

    fn combine<X: 'a, Y: 'a, F: FnOnce(X) -> Y + 'a>(
        ff: Self::Of<F>,
        fx: Self::Of<X>,
    ) -> Self::Of<Y> {
        let ff = F1::map(ff, |gf: F2::Of<F>| move |gx: F2::Of<X>| F2::combine(gf, gx));
        F1::combine(ff, fx)
    }
}

/// Visit every item in order, gathering the results into one effectful `Vec`.
///
/// Every item is visited first, then results are merged pairwise, level by
/// level, always left before right. Carriers that nest (futures, deferred
/// steps) therefore end up logarithmically deep in the item count, not linearly.
pub fn traverse_vec<'a, E, A, B>(
    items: impl IntoIterator<Item = A>,
    mut visit: impl FnMut(A) -> E::Of<B>,
) -> E::Of<Vec<B>>
where
    E: Effect<'a>,
    B: 'a,
{
    let mut layer: Vec<E::Of<Vec<B>>> = items
        .into_iter()
        .map(|item| E::map(visit(item), |b: B| vec![b]))
        .collect();

    while layer.len() > 1 {
        let mut merged = Vec::with_capacity(layer.len().div_ceil(2));
        let mut pending = layer.into_iter();
        while let Some(left) = pending.next() {
            merged.push(match pending.next() {
                Some(right) => append::<E, B>(left, right),
                None => left,
            });
        }
        layer = merged;
    }

    layer.pop().unwrap_or_else(|| E::lift(Vec::new()))
}

fn append<'a, E, B>(left: E::Of<Vec<B>>, right: E::Of<Vec<B>>) -> E::Of<Vec<B>>
where
    E: Effect<'a>,
    B: 'a,
{
    let left = E::map(left, |mut done: Vec<B>| {
        move |rest: Vec<B>| {
            done.extend(rest);
            done
        }
    });
    E::combine(left, right)
}
