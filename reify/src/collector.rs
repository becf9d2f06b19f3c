use std::{fmt, marker::PhantomData};

use crate::effect::{Effect, PartiallyApplied};

/// The effect token for focus collection.
pub type Collector<F> = Collected<F, PartiallyApplied>;

/// A computation that records the foci it visits and nothing else.
///
/// The value slot `X` is phantom: running a traversal under this effect never
/// builds its output, it only concatenates what the visitor recorded, in call order.
///
/// ```rust
/// use reify::{Collected, Collector, Each, Traversal};
///
/// let recorded = Each.traverse::<Collector<char>>(vec!['a', 'b', 'c'], Collected::<_, char>::focus);
/// assert_eq!(recorded.into_foci(), vec!['a', 'b', 'c']);
/// ```
pub struct Collected<F, X> {
    foci: Vec<F>,
    _value: PhantomData<fn() -> X>,
}

impl<F, X> Collected<F, X> {
    /// Record a single focus.
    pub fn focus(focus: F) -> Self {
        Self::from_foci(vec![focus])
    }

    pub fn foci(&self) -> &[F] {
        &self.foci
    }

    pub fn into_foci(self) -> Vec<F> {
        self.foci
    }

    fn from_foci(foci: Vec<F>) -> Self {
        Self {
            foci,
            _value: PhantomData,
        }
    }
}

impl<'a, F: 'a> Effect<'a> for Collected<F, PartiallyApplied> {
    type Of<X: 'a> = Collected<F, X>;

    // pure values are not foci
    fn lift<X: 'a>(_x: X) -> Self::Of<X> {
        Collected::from_foci(Vec::new())
    }

    fn map<X: 'a, Y: 'a>(fx: Self::Of<X>, _f: impl FnOnce(X) -> Y + 'a) -> Self::Of<Y> {
        Collected::from_foci(fx.foci)
    }

    fn combine<X: 'a, Y: 'a, G: FnOnce(X) -> Y + 'a>(
        ff: Self::Of<G>,
        fx: Self::Of<X>,
    ) -> Self::Of<Y> {
        let mut foci = ff.foci;
        foci.extend(fx.foci);
        Collected::from_foci(foci)
    }
}

impl<F: Clone, X> Clone for Collected<F, X> {
    fn clone(&self) -> Self {
        Self::from_foci(self.foci.clone())
    }
}

impl<F: PartialEq, X> PartialEq for Collected<F, X> {
    fn eq(&self, other: &Self) -> bool {
        self.foci == other.foci
    }
}

impl<F: Eq, X> Eq for Collected<F, X> {}

impl<F: fmt::Debug, X> fmt::Debug for Collected<F, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Collected").field(&self.foci).finish()
    }
}
