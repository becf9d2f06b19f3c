//! Effect-polymorphic traversals, and their reification into a list of holes
//! plus a replayable rebuild.
//!
//! A [`Traversal`] is written once against any [`Effect`]. Running it under the
//! [`Collector`] effect yields the foci it visits; running it under the
//! [`Supplier`] effect replays it, filling each slot from a sequence of
//! replacement values. [`reify`] packages the two as a [`Reified`] value.
//!
//! ```rust
//! use reify::{Both, Each, Identity, Traversal, TraversalExt};
//!
//! let pairs = Each.compose::<i32, i32, _>(Both);
//! let reified = pairs.reify(vec![(1, 2), (3, 4)]);
//!
//! assert_eq!(reified.holes(), &[1, 2, 3, 4]);
//! assert_eq!(reified.rebuild(vec![4, 3, 2, 1]), Ok(vec![(4, 3), (2, 1)]));
//! assert_eq!(pairs.traverse::<Identity>(vec![(1, 2)], |x| x * 10), vec![(10, 20)]);
//! ```

mod collector;
pub mod effect;
mod error;
pub mod fusion;
pub mod laws;
mod monadic;
mod reified;
mod supplier;
mod traversal;

pub use collector::{Collected, Collector};
pub use effect::{Chain, Effect, Identity, Monoid, PartiallyApplied};
pub use error::ReifyError;
pub use fusion::{traverse_all, Fused};
pub use monadic::AndThen;
pub use reified::{reify, reify_with_plan, Lowered, Reified};
pub use supplier::{Cursor, Supplier};
pub use traversal::{identity, Both, Compose, Each, Ignored, Traversal, TraversalExt, Whole};
