use crate::{effect::PartiallyApplied, error::ReifyError};

/// The effect replay runs under: plain values, stopping at the first replay
/// error. Values come from a [`Cursor`] that the visitor reads from.
///
/// Everything is evaluated as the traversal runs, so replay uses no more stack
/// than the traversal itself does.
pub type Supplier = Result<PartiallyApplied, ReifyError>;

/// Replay position for a single rebuild: the replacement values, the slot
/// plan, and how many slots have been handed out so far.
///
/// A cursor belongs to one rebuild call and is passed to its visitor, so
/// concurrent or repeated rebuilds never share a position.
///
/// ```rust
/// use reify::{effect::traverse_vec, Cursor, Supplier};
///
/// let replacements = ['x', 'y', 'z'];
/// let plan = [2, 0, 0];
/// let mut cursor = Cursor::new(&replacements, &plan);
///
/// let out = traverse_vec::<Supplier, _, _>(0..3, |_| cursor.supply());
/// assert_eq!(out, Ok(vec!['z', 'x', 'x']));
/// assert_eq!(cursor.finish(), Ok(()));
/// ```
#[derive(Debug)]
pub struct Cursor<'c, B> {
    replacements: &'c [B],
    plan: &'c [usize],
    position: usize,
}

impl<'c, B> Cursor<'c, B> {
    pub fn new(replacements: &'c [B], plan: &'c [usize]) -> Self {
        Self {
            replacements,
            plan,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Succeeds only if every planned slot was handed out.
    pub fn finish(self) -> Result<(), ReifyError> {
        if self.position == self.plan.len() {
            Ok(())
        } else {
            Err(ReifyError::ReplayUnderrun {
                planned: self.plan.len(),
                visited: self.position,
            })
        }
    }
}

impl<'c, B: Clone> Cursor<'c, B> {
    /// The replay visitor: the value planned for the current slot. Advances
    /// only on success.
    pub fn supply(&mut self) -> Result<B, ReifyError> {
        let index = *self
            .plan
            .get(self.position)
            .ok_or(ReifyError::ReplayOverrun {
                planned: self.plan.len(),
            })?;
        let value = self.replacements.get(index).cloned().ok_or(
            ReifyError::PlanIndexOutOfRange {
                slot: self.position,
                index,
                len: self.replacements.len(),
            },
        )?;

        self.position += 1;
        Ok(value)
    }
}
