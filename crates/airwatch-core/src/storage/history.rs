//! Fixed-capacity sample history
//!
//! A circular queue of 16-bit samples backed by an inline array. Nothing here
//! allocates: the capacity is chosen at construction (up to the `MAX` const
//! parameter) and a full buffer drops its oldest sample on every enqueue.

/// Hard upper bound on history capacity
pub const MAX_CAPACITY: usize = 128;

/// Circular queue of samples for one tracked metric
///
/// Holds the oldest sample at `head`, writes the next one at `tail`, and
/// keeps `0 <= count <= capacity` at all times.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<const MAX: usize = MAX_CAPACITY> {
    buf: [i16; MAX],
    capacity: usize,
    head: usize,
    tail: usize,
    count: usize,
}

impl<const MAX: usize> HistoryBuffer<MAX> {
    const NON_EMPTY: () = assert!(MAX > 0, "history buffer needs room for one sample");

    /// Create an empty buffer
    ///
    /// `capacity` is clamped to `1..=MAX`.
    pub fn new(capacity: usize) -> Self {
        let () = Self::NON_EMPTY;

        Self {
            buf: [0; MAX],
            capacity: capacity.clamp(1, MAX),
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Append a sample, evicting the oldest one if the buffer is full
    pub fn enqueue(&mut self, value: i16) {
        if self.count == self.capacity {
            self.head = (self.head + 1) % self.capacity;
            self.count -= 1;
        }

        self.buf[self.tail] = value;
        self.tail = (self.tail + 1) % self.capacity;
        self.count += 1;
    }

    /// Remove and return the oldest sample
    pub fn dequeue(&mut self) -> Option<i16> {
        if self.count == 0 {
            return None;
        }

        let value = self.buf[self.head];
        self.head = (self.head + 1) % self.capacity;
        self.count -= 1;
        Some(value)
    }

    /// All samples oldest-first as one slice
    ///
    /// Rotates the backing array in place so the oldest sample sits at index
    /// 0 (three reversals, no scratch storage). Afterwards `head` is 0 and
    /// `tail` is `count % capacity`, so queue operations keep working on the
    /// new layout.
    pub fn contiguous(&mut self) -> &[i16] {
        if self.head != 0 {
            let window = &mut self.buf[..self.capacity];
            window[..self.head].reverse();
            window[self.head..].reverse();
            window.reverse();

            self.head = 0;
            self.tail = self.count % self.capacity;
        }

        &self.buf[..self.count]
    }

    /// Visit every sample oldest-first without reordering storage
    pub fn peek_all<F: FnMut(i16)>(&self, mut visit: F) {
        let mut idx = self.head;
        for _ in 0..self.count {
            visit(self.buf[idx]);
            idx = (idx + 1) % self.capacity;
        }
    }

    /// Iterate samples oldest-first without reordering storage
    pub fn iter(&self) -> impl Iterator<Item = i16> + '_ {
        (0..self.count).map(move |i| self.buf[(self.head + i) % self.capacity])
    }

    /// Most recently enqueued sample
    pub fn latest(&self) -> Option<i16> {
        if self.count == 0 {
            return None;
        }
        Some(self.buf[(self.tail + self.capacity - 1) % self.capacity])
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    /// Usable capacity (not `MAX`)
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<const MAX: usize> Default for HistoryBuffer<MAX> {
    fn default() -> Self {
        Self::new(MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_eviction_then_dequeue_and_refill() {
        let mut history: HistoryBuffer = HistoryBuffer::new(5);
        for v in 1..=7 {
            history.enqueue(v);
        }

        assert_eq!(history.len(), 5);
        assert_eq!(history.contiguous(), &[3, 4, 5, 6, 7]);

        assert_eq!(history.dequeue(), Some(3));
        history.enqueue(8);
        assert_eq!(history.contiguous(), &[4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_contiguous_is_idempotent() {
        let mut history: HistoryBuffer<8> = HistoryBuffer::new(4);
        for v in 10..16 {
            history.enqueue(v);
        }

        let first: Vec<i16> = history.contiguous().to_vec();
        let second: Vec<i16> = history.contiguous().to_vec();
        assert_eq!(first, [12, 13, 14, 15]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_contiguous_resets_indices() {
        let mut history: HistoryBuffer<8> = HistoryBuffer::new(4);
        for v in 0..6 {
            history.enqueue(v);
        }
        history.contiguous();

        assert_eq!(history.head, 0);
        assert_eq!(history.tail, 0);

        history.enqueue(6);
        assert_eq!(history.contiguous(), &[3, 4, 5, 6]);
        assert_eq!(history.dequeue(), Some(3));
    }

    #[test]
    fn test_contiguous_after_dequeue_without_wrap() {
        let mut history: HistoryBuffer<8> = HistoryBuffer::new(6);
        for v in 1..=4 {
            history.enqueue(v);
        }
        history.dequeue();
        history.dequeue();

        assert_eq!(history.contiguous(), &[3, 4]);
        assert_eq!(history.tail, 2);
    }

    #[test]
    fn test_dequeue_empty() {
        let mut history: HistoryBuffer<4> = HistoryBuffer::default();
        assert_eq!(history.dequeue(), None);
        assert!(history.contiguous().is_empty());
        assert_eq!(history.latest(), None);
    }

    #[test]
    fn test_capacity_is_clamped() {
        assert_eq!(HistoryBuffer::<16>::new(0).capacity(), 1);
        assert_eq!(HistoryBuffer::<16>::new(500).capacity(), 16);

        let mut single = HistoryBuffer::<16>::new(0);
        single.enqueue(1);
        single.enqueue(2);
        assert!(single.is_full());
        assert_eq!(single.contiguous(), &[2]);
    }

    #[test]
    fn test_peek_all_matches_iter_without_rotating() {
        let mut history: HistoryBuffer<8> = HistoryBuffer::new(3);
        for v in [5, -2, 9, 4] {
            history.enqueue(v);
        }

        let mut seen = Vec::new();
        history.peek_all(|v| seen.push(v));

        assert_eq!(seen, [-2, 9, 4]);
        assert_eq!(history.iter().collect::<Vec<_>>(), seen);
        assert_eq!(history.head, 1);
        assert_eq!(history.latest(), Some(4));
    }

    #[test]
    fn test_clear() {
        let mut history: HistoryBuffer<8> = HistoryBuffer::new(3);
        history.enqueue(1);
        history.enqueue(2);
        history.clear();

        assert!(history.is_empty());
        history.enqueue(3);
        assert_eq!(history.contiguous(), &[3]);
    }
}
