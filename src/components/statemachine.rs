//! Transition tables for actor state machines.
//!
//! A kind's behaviour is split in two: per-state rules that pick the next
//! state, and a static table that says what happens when moving from one
//! state to another. The table is a flat array of [`Transition`] rows; a row
//! with `from: None` applies to every source state, `to: None` to every
//! target. All matching rows run, in table order, before the state label
//! changes.
//!
//! A `(from, to)` pair with no matching row is legal and simply has no side
//! effects.

use std::fmt::Debug;

/// A discrete state label.
pub trait StateLabel: Copy + Eq + Debug + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;
}

#[derive(Debug, Clone, Copy)]
pub struct Transition<S: 'static, E: 'static> {
    pub from: Option<S>,
    pub to: Option<S>,
    pub effects: &'static [E],
}

impl<S, E> Transition<S, E> {
    pub const fn new(from: S, to: S, effects: &'static [E]) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            effects,
        }
    }

    /// Row applied whenever `from` is left, whatever the target.
    pub const fn leaving(from: S, effects: &'static [E]) -> Self {
        Self {
            from: Some(from),
            to: None,
            effects,
        }
    }

    /// Row applied whenever `to` is entered, whatever the source.
    pub const fn entering(to: S, effects: &'static [E]) -> Self {
        Self {
            from: None,
            to: Some(to),
            effects,
        }
    }
}

impl<S: PartialEq + Copy, E> Transition<S, E> {
    pub fn matches(&self, from: S, to: S) -> bool {
        self.from.is_none_or(|f| f == from) && self.to.is_none_or(|t| t == to)
    }
}

/// Every effect for `from -> to`, in table order.
pub fn effects_for<S, E>(
    table: &'static [Transition<S, E>],
    from: S,
    to: S,
) -> impl Iterator<Item = &'static E>
where
    S: PartialEq + Copy,
{
    table
        .iter()
        .filter(move |row| row.matches(from, to))
        .flat_map(|row| row.effects.iter())
}

/// Whether any row names exactly this pair (wildcards excluded).
pub fn has_explicit_row<S, E>(table: &'static [Transition<S, E>], from: S, to: S) -> bool
where
    S: PartialEq + Copy,
{
    table
        .iter()
        .any(|row| row.from == Some(from) && row.to == Some(to))
}
