use std::fmt::Display;

use crate::expr::naive::Expr;
#[cfg(test)]
use crate::expr::{naive::arb_expr, Literals};
#[cfg(test)]
use proptest::proptest;

pub fn naive_eval(expr: &Expr) -> i64 {
    match expr {
        Expr::Add(a, b) => naive_eval(a).wrapping_add(naive_eval(b)),
        Expr::Sub(a, b) => naive_eval(a).wrapping_sub(naive_eval(b)),
        Expr::Mul(a, b) => naive_eval(a).wrapping_mul(naive_eval(b)),
        Expr::Literal(x) => *x,
    }
}

/// Fully parenthesized infix rendering.
pub fn render<L: Display>(expr: &Expr<L>) -> String {
    match expr {
        Expr::Add(a, b) => format!("({} + {})", render(a), render(b)),
        Expr::Sub(a, b) => format!("({} - {})", render(a), render(b)),
        Expr::Mul(a, b) => format!("({} * {})", render(a), render(b)),
        Expr::Literal(x) => x.to_string(),
    }
}

// generate a bunch of expression trees, reify them, and rebuild them in various ways
#[cfg(test)]
proptest! {
    #[test]
    fn rebuild_agrees_with_direct_evaluation(expr in arb_expr()) {
        use reify::{reify, TraversalExt};

        let bump = |x: i64| x * 2 + 1;

        let direct = naive_eval(&Literals.over(expr.clone(), bump));

        let reified = reify(&Literals, expr.clone());
        assert_eq!(reified.holes().len(), expr.literal_count());
        let replacements = reified.holes().iter().copied().map(bump).collect();
        let rebuilt = naive_eval(&reified.rebuild(replacements).unwrap());

        assert_eq!(direct, rebuilt);
    }

    #[test]
    fn rebuild_changes_literal_type(expr in arb_expr()) {
        use reify::{Reified, TraversalExt};

        let mut counter = 0;
        let direct = Literals.over(expr.clone(), |_: i64| {
            counter += 1;
            format!("x{}", counter - 1)
        });

        let reified: Reified<'_, i64, String, _, _> = Literals.reify(expr.clone());
        let names = (0..reified.holes().len()).map(|i| format!("x{}", i)).collect();
        let rebuilt = reified.rebuild(names).unwrap();

        assert_eq!(render(&rebuilt), render(&direct));
        assert_eq!(rebuilt, direct);
    }

    #[test]
    fn checked_visitors_short_circuit(expr in arb_expr()) {
        use reify::{reify, PartiallyApplied, Traversal};

        let checked = |x: i64| if x < 0 { None } else { Some(x) };
        let holes = reify::<_, i64, i64, _, _>(&Literals, expr.clone()).into_holes();
        let expected = if holes.iter().any(|x| *x < 0) {
            None
        } else {
            Some(expr.clone())
        };

        assert_eq!(
            Literals.traverse::<Option<PartiallyApplied>>(expr.clone(), checked),
            expected
        );
        let lowered = reify(&Literals, expr.clone()).lower();
        assert_eq!(
            lowered.traverse::<Option<PartiallyApplied>>(expr, checked),
            expected.map(Ok)
        );
    }
}
