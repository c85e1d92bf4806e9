use std::collections::VecDeque;

use super::vector::Point;

/// The snake's segments, head at index 0
///
/// Never empty: the head always exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Body<P> {
    segments: VecDeque<P>,
}

impl<P: Point> Body<P> {
    /// Create a one-segment body
    pub fn new(head: P) -> Self {
        let mut segments = VecDeque::new();
        segments.push_back(head);
        Self { segments }
    }

    /// Create a body from segments ordered head first; `None` if empty
    pub fn from_segments<I: IntoIterator<Item = P>>(segments: I) -> Option<Self> {
        let segments: VecDeque<P> = segments.into_iter().collect();
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Insert a new head segment
    pub fn prepend(&mut self, position: P) {
        self.segments.push_front(position);
    }

    /// Remove the last segment; the head is never removed
    pub fn truncate_tail(&mut self) {
        if self.segments.len() > 1 {
            self.segments.pop_back();
        }
    }

    /// Get the head position
    pub fn head(&self) -> P {
        self.segments[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> P {
        self.segments[self.segments.len() - 1]
    }

    /// Whether any segment other than the head overlaps `position`
    pub fn contains_excluding_head(&self, position: P, radius: f32) -> bool {
        self.contains_from(position, radius, 1)
    }

    /// Whether any segment at index `start` or later overlaps `position`
    pub fn contains_from(&self, position: P, radius: f32, start: usize) -> bool {
        self.segments
            .iter()
            .skip(start)
            .any(|segment| segment.overlaps(position, radius))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept alongside `len`
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments from head to tail
    pub fn iter(&self) -> impl Iterator<Item = &P> + '_ {
        self.segments.iter()
    }
}
