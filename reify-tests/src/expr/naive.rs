use proptest::prelude::*;

/// simple naive representation of a recursive expression AST, generic over its literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr<L = i64> {
    Add(Box<Expr<L>>, Box<Expr<L>>),
    Sub(Box<Expr<L>>, Box<Expr<L>>),
    Mul(Box<Expr<L>>, Box<Expr<L>>),
    Literal(L),
}

impl<L> Expr<L> {
    pub fn add(a: Expr<L>, b: Expr<L>) -> Expr<L> {
        Expr::Add(Box::new(a), Box::new(b))
    }

    pub fn sub(a: Expr<L>, b: Expr<L>) -> Expr<L> {
        Expr::Sub(Box::new(a), Box::new(b))
    }

    pub fn mul(a: Expr<L>, b: Expr<L>) -> Expr<L> {
        Expr::Mul(Box::new(a), Box::new(b))
    }

    /// Number of literals, counted by hand.
    pub fn literal_count(&self) -> usize {
        match self {
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) => {
                a.literal_count() + b.literal_count()
            }
            Expr::Literal(_) => 1,
        }
    }
}

/// A full binary tree of additions, `depth` levels deep, with literals `0..2^depth`.
pub fn balanced(depth: u32) -> Expr {
    fn go(depth: u32, next: &mut i64) -> Expr {
        if depth == 0 {
            *next += 1;
            Expr::Literal(*next - 1)
        } else {
            let a = go(depth - 1, next);
            let b = go(depth - 1, next);
            Expr::add(a, b)
        }
    }
    go(depth, &mut 0)
}

pub fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![any::<i8>().prop_map(|x| Expr::Literal(x as i64)),];
    leaf.prop_recursive(
        8,   // 8 levels deep
        256, // Shoot for maximum size of 256 nodes
        10,  // We put up to 10 items per collection
        |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::add(a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::sub(a, b)),
                (inner.clone(), inner).prop_map(|(a, b)| Expr::mul(a, b)),
            ]
        },
    )
}
