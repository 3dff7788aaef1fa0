//! Collections with an enforced ascending `year_start` order.

use serde::Serialize;

use crate::TemporalSpan;

/// Entities sorted ascending by `year_start`, entities without a start year
/// last.
///
/// The only way to build one is [`SortedByStart::new`], which sorts, so
/// scans over it may stop at the first entity that starts after the query
/// year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SortedByStart<T> {
    items: Vec<T>,
}

impl<T: TemporalSpan> SortedByStart<T> {
    /// Sorts `items` by start year. The sort is stable so rows with the
    /// same start keep their load order.
    #[must_use]
    pub fn new(mut items: Vec<T>) -> Self {
        items.sort_by_key(|item| (item.year_start().is_none(), item.year_start()));
        Self { items }
    }

    /// Iterates over the entities that may be active at `year`, stopping at
    /// the first one that starts later.
    pub fn started_by(&self, year: i32) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .take_while(move |item| item.year_start().is_some_and(|start| start <= year))
    }
}

impl<T> SortedByStart<T> {
    /// Returns an empty collection.
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the sorted entities.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for SortedByStart<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Validity;

    struct Span(Option<i32>);

    impl TemporalSpan for Span {
        fn validity(&self) -> Validity {
            self.0.map_or(Validity::Unknown, |start| Validity::Open { start })
        }
    }

    #[test]
    fn sorts_missing_starts_last() {
        let sorted = SortedByStart::new(vec![Span(Some(5)), Span(None), Span(Some(-2))]);
        let starts: Vec<_> = sorted.as_slice().iter().map(|s| s.0).collect();
        assert_eq!(starts, vec![Some(-2), Some(5), None]);
    }

    #[test]
    fn started_by_stops_at_later_starts() {
        let sorted = SortedByStart::new(vec![Span(Some(10)), Span(Some(1)), Span(Some(5))]);
        assert_eq!(sorted.started_by(5).count(), 2);
        assert_eq!(sorted.started_by(0).count(), 0);
        assert_eq!(sorted.started_by(100).count(), 3);
    }
}
