use std::cell::Cell;

use futures::FutureExt;
use proptest::prelude::*;
use reify::{
    effect::{traverse_vec, Deferred, Parallel},
    laws, reify, traverse_all, Each, Effect, Identity, PartiallyApplied, ReifyError, Reified,
    Traversal, TraversalExt, Whole,
};

use crate::{
    expr::{
        eval::naive_eval,
        naive::{arb_expr, Expr},
        Literals,
    },
    rose::{arb_rose, Labels},
};

type Log = (Vec<i64>, PartiallyApplied);
type Checked = Result<PartiallyApplied, String>;

fn tell(x: i64) -> (Vec<i64>, i64) {
    (vec![x], x.wrapping_mul(7))
}

fn non_negative(x: i64) -> Result<i64, String> {
    if x < 0 {
        Err(format!("negative literal {}", x))
    } else {
        Ok(x)
    }
}

proptest! {
    #[test]
    fn round_trip_holds_for_every_effect(expr in arb_expr()) {
        laws::round_trip::<Identity, _, _, _, _, _>(&Literals, expr.clone(), |x| x + 1).unwrap();
        laws::round_trip::<Log, _, _, _, _, _>(&Literals, expr.clone(), tell).unwrap();
        laws::round_trip::<Checked, _, _, _, _, _>(&Literals, expr.clone(), non_negative).unwrap();
        laws::round_trip::<Option<PartiallyApplied>, _, _, _, _, _>(&Literals, expr, |x: i64| {
            x.checked_mul(1 << 60)
        })
        .unwrap();
    }

    #[test]
    fn rebuild_identity_and_arity(expr in arb_expr(), extra in 1usize..4) {
        laws::rebuild_identity(&Literals, expr.clone()).unwrap();

        let n = expr.literal_count();
        laws::arity_enforced(&Literals, expr.clone(), vec![0i64; n]).unwrap();
        laws::arity_enforced(&Literals, expr.clone(), vec![0i64; n + extra]).unwrap();
        laws::arity_enforced(&Literals, expr, vec![0i64; n - 1]).unwrap();
    }

    #[test]
    fn composition_is_associative(exprs in prop::collection::vec(prop::collection::vec(arb_expr(), 0..4), 0..4)) {
        laws::associativity::<Log, _, _, _, _, _, _, _, _, _, _, _>(
            &Each,
            &Each,
            &Literals,
            exprs.clone(),
            tell,
        )
        .unwrap();
        laws::associativity::<Identity, _, _, _, _, _, _, _, _, _, _, _>(
            &Whole,
            &Each,
            &Each,
            vec![exprs.concat()],
            |e: Expr| naive_eval(&e),
        )
        .unwrap();
    }

    #[test]
    fn whole_is_a_unit(expr in arb_expr(), tree in arb_rose()) {
        laws::identity_unit::<Log, _, _, _, _, _>(&Literals, expr, tell).unwrap();
        laws::identity_unit::<Option<PartiallyApplied>, _, _, _, _, _>(&Labels, tree, |x: i16| {
            x.checked_add(1)
        })
        .unwrap();
    }

    #[test]
    fn rose_trees_obey_the_reification_laws(tree in arb_rose()) {
        laws::round_trip::<(Vec<i16>, PartiallyApplied), _, _, _, _, _>(&Labels, tree.clone(), |x: i16| {
            (vec![x], x / 2)
        })
        .unwrap();
        laws::rebuild_identity(&Labels, tree.clone()).unwrap();
        laws::arity_enforced(&Labels, tree, Vec::<u8>::new()).unwrap();
    }

    #[test]
    fn parallel_batches_match_sequential(exprs in prop::collection::vec(arb_expr(), 0..16)) {
        laws::fusion_coherence::<Log, _, _, _, _, _, _>(&Literals, exprs.clone(), &tell).unwrap();
        laws::fusion_coherence::<Parallel<Log>, _, _, _, _, _, _>(&Literals, exprs.clone(), &tell).unwrap();
        laws::fusion_coherence::<Parallel<Checked>, _, _, _, _, _, _>(&Literals, exprs.clone(), &non_negative)
            .unwrap();

        let sequential = traverse_all::<Log, _, _, _, _, _, _>(&Literals, exprs.clone(), &tell);
        let parallel = traverse_all::<Parallel<Log>, _, _, _, _, _, _>(&Literals, exprs, &tell);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn deferred_effects_agree_with_synchronous_ones(expr in arb_expr()) {
        let rt = tokio::runtime::Runtime::new().unwrap();

        let expected = Literals.over(expr.clone(), |x: i64| x.wrapping_sub(3));
        let lowered = reify(&Literals, expr.clone()).lower();

        let (direct, replayed) = rt.block_on(async {
            let direct = Literals
                .traverse::<Deferred>(expr.clone(), |x: i64| async move { x.wrapping_sub(3) }.boxed_local())
                .await;
            let replayed = lowered
                .traverse::<Deferred>(expr, |x: i64| async move { x.wrapping_sub(3) }.boxed_local())
                .await;
            (direct, replayed)
        });

        assert_eq!(direct, expected);
        assert_eq!(replayed, Ok(expected));
    }
}

#[tokio::test]
async fn deferred_visitors_can_await() {
    let (tx, rx) = futures::channel::oneshot::channel::<i64>();
    let expr = Expr::add(Expr::Literal(1), Expr::Literal(2));

    let mut rx = Some(rx);
    let pending = Literals.traverse::<Deferred>(expr, move |x: i64| {
        if x == 2 {
            if let Some(rx) = rx.take() {
                return rx.map(|res| res.unwrap_or_default()).boxed_local();
            }
        }
        <Deferred as Effect>::lift(x * 10)
    });
    tx.send(5).unwrap();

    assert_eq!(pending.await, Expr::add(Expr::Literal(10), Expr::Literal(5)));
}

/// Visits one fewer leading literal each time it runs.
struct Shrinking {
    runs: Cell<usize>,
}

impl Traversal<i64, i64, Vec<i64>, Vec<i64>> for Shrinking {
    fn traverse<'a, E>(&self, source: Vec<i64>, visit: impl FnMut(i64) -> E::Of<i64>) -> E::Of<Vec<i64>>
    where
        E: Effect<'a>,
        Self: 'a,
    {
        let runs = self.runs.get();
        self.runs.set(runs + 1);

        let split = source.len().saturating_sub(runs);
        let rest = source[split..].to_vec();
        let visited = traverse_vec::<E, i64, i64>(source[..split].to_vec(), visit);
        E::map(visited, move |mut head: Vec<i64>| {
            head.extend(rest);
            head
        })
    }
}

#[test]
fn replay_divergence_is_reported_not_hidden() {
    let shrinking = Shrinking { runs: Cell::new(0) };
    let reified = reify(&shrinking, vec![1, 2, 3]);
    assert_eq!(reified.holes(), &[1, 2, 3]);

    assert_eq!(
        reified.rebuild(vec![10, 20, 30]),
        Err(ReifyError::ReplayUnderrun {
            planned: 3,
            visited: 2
        })
    );
}

#[test]
fn staged_composition_through_an_intermediate() {
    let expr = Expr::mul(Expr::Literal(2), Expr::sub(Expr::Literal(5), Expr::Literal(1)));

    let inner = reify(&Literals, expr.clone());
    let doubled: Vec<i64> = inner.holes().iter().map(|x| x * 2).collect();
    let intermediate = Literals.over(expr, |x: i64| x * 2);

    let outer: Reified<'_, i64, String, _, _> = reify(&Literals, intermediate);
    let staged = inner.pipe(doubled.clone(), outer).unwrap();
    assert_eq!(staged.holes(), &[2, 5, 1]);
    assert_eq!(
        staged.rebuild(vec!["a".into(), "b".into(), "c".into()]),
        Ok(Expr::mul(
            Expr::Literal("a".to_string()),
            Expr::sub(Expr::Literal("b".to_string()), Expr::Literal("c".to_string()))
        ))
    );

    let inner = reify(&Literals, Expr::Literal(1));
    let outer: Reified<'_, i64, i64, _, _> = reify(&Literals, Expr::Literal(2));
    assert_eq!(
        inner.pipe(vec![3], outer).err(),
        Some(ReifyError::StaleIntermediate)
    );
}
