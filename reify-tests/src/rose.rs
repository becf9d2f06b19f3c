use proptest::prelude::*;
use reify::{effect::traverse_vec, Effect, Traversal};

/// A labelled tree with any number of children per node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rose<A> {
    pub label: A,
    pub children: Vec<Rose<A>>,
}

impl<A> Rose<A> {
    pub fn leaf(label: A) -> Self {
        Rose {
            label,
            children: Vec::new(),
        }
    }

    pub fn node(label: A, children: Vec<Rose<A>>) -> Self {
        Rose { label, children }
    }

    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Rose::size).sum::<usize>()
    }
}

/// Every label, in pre-order: a node before its children, children left to right.
#[derive(Clone, Copy, Debug, Default)]
pub struct Labels;

impl<A, B> Traversal<A, B, Rose<A>, Rose<B>> for Labels {
    fn traverse<'a, E>(&self, source: Rose<A>, mut visit: impl FnMut(A) -> E::Of<B>) -> E::Of<Rose<B>>
    where
        E: Effect<'a>,
        Self: 'a,
        A: 'a,
        B: 'a,
        Rose<A>: 'a,
        Rose<B>: 'a,
    {
        traverse_rose::<E, A, B, _>(source, &mut visit)
    }
}

fn traverse_rose<'a, E, A, B, V>(tree: Rose<A>, visit: &mut V) -> E::Of<Rose<B>>
where
    E: Effect<'a>,
    A: 'a,
    B: 'a,
    V: FnMut(A) -> E::Of<B>,
{
    let label = visit(tree.label);
    let children = traverse_vec::<E, Rose<A>, Rose<B>>(tree.children, |child| {
        traverse_rose::<E, A, B, V>(child, visit)
    });
    let label = E::map(label, |label: B| move |children: Vec<Rose<B>>| Rose::node(label, children));
    E::combine(label, children)
}

pub fn arb_rose() -> impl Strategy<Value = Rose<i16>> {
    let leaf = any::<i16>().prop_map(Rose::leaf);
    leaf.prop_recursive(
        6,   // levels deep
        128, // total nodes
        4,   // children per node
        |inner| {
            (any::<i16>(), prop::collection::vec(inner, 0..4))
                .prop_map(|(label, children)| Rose::node(label, children))
        },
    )
}
