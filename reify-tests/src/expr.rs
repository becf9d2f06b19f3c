pub mod eval;
pub mod naive;

use reify::{Effect, Traversal};

use crate::expr::naive::Expr;

/// Every literal of an expression, left to right.
#[derive(Clone, Copy, Debug, Default)]
pub struct Literals;

impl<A, B> Traversal<A, B, Expr<A>, Expr<B>> for Literals {
    fn traverse<'a, E>(&self, source: Expr<A>, mut visit: impl FnMut(A) -> E::Of<B>) -> E::Of<Expr<B>>
    where
        E: Effect<'a>,
        Self: 'a,
        A: 'a,
        B: 'a,
        Expr<A>: 'a,
        Expr<B>: 'a,
    {
        traverse_literals::<E, A, B, _>(source, &mut visit)
    }
}

fn traverse_literals<'a, E, A, B, V>(expr: Expr<A>, visit: &mut V) -> E::Of<Expr<B>>
where
    E: Effect<'a>,
    A: 'a,
    B: 'a,
    V: FnMut(A) -> E::Of<B>,
{
    match expr {
        Expr::Add(a, b) => binary::<E, A, B, V>(*a, *b, visit, Expr::add),
        Expr::Sub(a, b) => binary::<E, A, B, V>(*a, *b, visit, Expr::sub),
        Expr::Mul(a, b) => binary::<E, A, B, V>(*a, *b, visit, Expr::mul),
        Expr::Literal(x) => E::map(visit(x), Expr::Literal),
    }
}

#[inline(always)]
fn binary<'a, E, A, B, V>(
    a: Expr<A>,
    b: Expr<A>,
    visit: &mut V,
    build: fn(Expr<B>, Expr<B>) -> Expr<B>,
) -> E::Of<Expr<B>>
where
    E: Effect<'a>,
    A: 'a,
    B: 'a,
    V: FnMut(A) -> E::Of<B>,
{
    let left = traverse_literals::<E, A, B, V>(a, visit);
    let left = E::map(left, move |l: Expr<B>| move |r: Expr<B>| build(l, r));
    E::combine(left, traverse_literals::<E, A, B, V>(b, visit))
}
