//! Append-only output sinks.

use std::collections::VecDeque;

/// An append-only consumer of captured dispatches.
///
/// The engine invokes `accept` once per emitted element, in non-decreasing
/// stamp order per stream. Growable sequences implement it trivially.
pub trait Sink<D> {
    /// Accepts one captured element.
    fn accept(&mut self, dispatch: D);
}

impl<D> Sink<D> for Vec<D> {
    #[inline]
    fn accept(&mut self, dispatch: D) {
        self.push(dispatch);
    }
}

impl<D> Sink<D> for VecDeque<D> {
    #[inline]
    fn accept(&mut self, dispatch: D) {
        self.push_back(dispatch);
    }
}

/// A sink that drops everything.
///
/// Useful for optional streams (`AnyBefore` followers) whose data only gates
/// retention, and in dry-run style harnesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl<D> Sink<D> for Discard {
    #[inline]
    fn accept(&mut self, _dispatch: D) {}
}

/// A sink that keeps only the most recent element.
#[derive(Debug, Clone, Default)]
pub struct Latest<D>(pub Option<D>);

impl<D> Sink<D> for Latest<D> {
    #[inline]
    fn accept(&mut self, dispatch: D) {
        self.0 = Some(dispatch);
    }
}
