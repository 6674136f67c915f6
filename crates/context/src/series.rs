//! Per-entity circular time series
//!
//! A [`SeriesBuffer`] holds one fixed-depth ring per entity ID. Pushing to a
//! full ring evicts its oldest value. Rings are allocated once in
//! [`SeriesBuffer::resize`] and never grow afterwards.

use std::collections::VecDeque;

use hermes_core::{Balance, Bar, Depth, Id, Static};

use crate::error::SeriesError;

/// A value that belongs to exactly one entity's series
pub trait SeriesItem {
    fn entity_id(&self) -> Id;
}

impl SeriesItem for Static {
    fn entity_id(&self) -> Id {
        self.instrument_id
    }
}

impl SeriesItem for Bar {
    fn entity_id(&self) -> Id {
        self.instrument_id
    }
}

impl SeriesItem for Depth {
    fn entity_id(&self) -> Id {
        self.instrument_id
    }
}

impl SeriesItem for Balance {
    fn entity_id(&self) -> Id {
        self.account_id
    }
}

/// Fixed-depth history for every entity of one ID space
#[derive(Debug, Clone)]
pub struct SeriesBuffer<T, const DEPTH: usize> {
    rings: Vec<VecDeque<T>>,
}

impl<T: SeriesItem, const DEPTH: usize> SeriesBuffer<T, DEPTH> {
    /// Create an unsized buffer; call [`resize`](Self::resize) before pushing
    pub fn new() -> Self {
        const { assert!(DEPTH > 0, "series depth must be positive") };
        Self { rings: Vec::new() }
    }

    /// Allocate one ring per entity, discarding any stored history
    pub fn resize(&mut self, entity_count: usize) {
        self.rings.clear();
        self.rings
            .resize_with(entity_count, || VecDeque::with_capacity(DEPTH));
    }

    /// Append `value` to its entity's ring, evicting the oldest when full
    pub fn push(&mut self, value: T) -> Result<(), SeriesError> {
        let id = value.entity_id();
        let count = self.rings.len();
        let ring = self
            .rings
            .get_mut(id as usize)
            .ok_or(SeriesError::OutOfRange { id, count })?;
        if ring.len() == DEPTH {
            ring.pop_front();
        }
        ring.push_back(value);
        Ok(())
    }

    pub fn has_value(&self, id: Id) -> bool {
        self.size(id) > 0
    }

    /// True once at least two values are stored
    pub fn has_prev(&self, id: Id) -> bool {
        self.size(id) > 1
    }

    /// Most recent value
    pub fn back(&self, id: Id) -> Result<&T, SeriesError> {
        self.ring(id)?.back().ok_or(SeriesError::Empty(id))
    }

    /// Value before the most recent one
    pub fn prev(&self, id: Id) -> Result<&T, SeriesError> {
        self.reverse_nth(id, 1)
    }

    /// `n`-th stored value counting from the oldest (0 = oldest)
    pub fn nth(&self, id: Id, n: usize) -> Result<&T, SeriesError> {
        let ring = self.ring(id)?;
        ring.get(n).ok_or_else(|| Self::missing(id, n + 1, ring.len()))
    }

    /// `n`-th stored value counting from the newest (0 = newest)
    pub fn reverse_nth(&self, id: Id, n: usize) -> Result<&T, SeriesError> {
        let ring = self.ring(id)?;
        let available = ring.len();
        if n >= available {
            return Err(Self::missing(id, n + 1, available));
        }
        ring.get(available - 1 - n)
            .ok_or_else(|| Self::missing(id, n + 1, available))
    }

    /// Number of values stored for `id` (0 if out of range)
    pub fn size(&self, id: Id) -> usize {
        self.rings.get(id as usize).map_or(0, VecDeque::len)
    }

    /// Maximum values kept per entity
    pub const fn capacity(&self) -> usize {
        DEPTH
    }

    /// Number of entity rings
    pub fn count(&self) -> usize {
        self.rings.len()
    }

    /// Stored values for `id`, oldest first (empty if out of range)
    pub fn iter(&self, id: Id) -> impl Iterator<Item = &T> {
        self.rings.get(id as usize).into_iter().flatten()
    }

    fn ring(&self, id: Id) -> Result<&VecDeque<T>, SeriesError> {
        self.rings.get(id as usize).ok_or(SeriesError::OutOfRange {
            id,
            count: self.rings.len(),
        })
    }

    fn missing(id: Id, needed: usize, available: usize) -> SeriesError {
        if available == 0 {
            SeriesError::Empty(id)
        } else {
            SeriesError::InsufficientHistory {
                id,
                needed,
                available,
            }
        }
    }
}

impl<T: SeriesItem, const DEPTH: usize> Default for SeriesBuffer<T, DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(id: Id, close: f64) -> Bar {
        Bar {
            instrument_id: id,
            close,
            ..Default::default()
        }
    }

    #[test]
    fn test_eviction_keeps_depth_values() {
        let mut series = SeriesBuffer::<Bar, 3>::new();
        series.resize(2);

        for close in 1..=4 {
            series.push(bar(0, close as f64)).unwrap();
        }

        assert_eq!(series.size(0), 3);
        assert_eq!(series.back(0).unwrap().close, 4.0);
        assert_eq!(series.nth(0, 0).unwrap().close, 2.0);
        let closes: Vec<f64> = series.iter(0).map(|b| b.close).collect();
        assert_eq!(closes, vec![2.0, 3.0, 4.0]);
        assert_eq!(series.size(1), 0);
    }

    #[test]
    fn test_prev_and_reverse_nth() {
        let mut series = SeriesBuffer::<Bar, 4>::new();
        series.resize(1);

        series.push(bar(0, 10.0)).unwrap();
        assert!(series.has_value(0));
        assert!(!series.has_prev(0));
        assert_eq!(
            series.prev(0).unwrap_err(),
            SeriesError::InsufficientHistory {
                id: 0,
                needed: 2,
                available: 1
            }
        );

        series.push(bar(0, 11.0)).unwrap();
        series.push(bar(0, 12.0)).unwrap();
        assert!(series.has_prev(0));
        assert_eq!(series.prev(0).unwrap().close, 11.0);
        assert_eq!(series.reverse_nth(0, 0).unwrap().close, 12.0);
        assert_eq!(series.reverse_nth(0, 2).unwrap().close, 10.0);
        assert!(series.reverse_nth(0, 3).is_err());
    }

    #[test]
    fn test_empty_series() {
        let mut series = SeriesBuffer::<Balance, 2>::new();
        series.resize(1);

        assert!(!series.has_value(0));
        assert_eq!(series.back(0).unwrap_err(), SeriesError::Empty(0));
        assert_eq!(series.prev(0).unwrap_err(), SeriesError::Empty(0));
        assert_eq!(series.nth(0, 0).unwrap_err(), SeriesError::Empty(0));
    }

    #[test]
    fn test_out_of_range() {
        let mut series = SeriesBuffer::<Bar, 2>::new();
        series.resize(1);

        assert_eq!(
            series.push(bar(1, 1.0)).unwrap_err(),
            SeriesError::OutOfRange { id: 1, count: 1 }
        );
        assert!(!series.has_value(7));
        assert_eq!(series.size(7), 0);
        assert_eq!(series.iter(7).count(), 0);
        assert!(matches!(
            series.back(7),
            Err(SeriesError::OutOfRange { id: 7, count: 1 })
        ));
    }

    #[test]
    fn test_single_depth_keeps_latest() {
        let mut series = SeriesBuffer::<Static, 1>::new();
        series.resize(1);

        for limit in [100.0, 101.0] {
            series
                .push(Static {
                    upper_limit: limit,
                    ..Default::default()
                })
                .unwrap();
        }
        assert_eq!(series.size(0), 1);
        assert_eq!(series.back(0).unwrap().upper_limit, 101.0);
        assert!(!series.has_prev(0));
        assert_eq!(series.capacity(), 1);
    }

    #[test]
    fn test_resize_clears_history() {
        let mut series = SeriesBuffer::<Bar, 2>::new();
        series.resize(1);
        series.push(bar(0, 1.0)).unwrap();

        series.resize(3);
        assert_eq!(series.count(), 3);
        assert!(!series.has_value(0));
    }
}
