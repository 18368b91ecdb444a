//! A single-owner FIFO ring buffer with geometric growth.
//!
//! Mirrors the pool's queue: `head` points at the first occupied slot,
//! `tail` points one slot past the last occupied one; `head == tail` means
//! empty, and one slot is always kept unused so that "empty" and "full" can
//! be told apart without a separate length field. `push` doubles capacity
//! when the buffer would otherwise wrap into `head`; growth always
//! reindexes so the buffer starts at slot 0 again.
//!
//! The buffer itself has no notion of a capacity ceiling — that's
//! `Pool`'s job, checked before `push` is ever called (see invariant P3 in
//! the pool).

const DEFAULT_INITIAL_CAPACITY: usize = 8;

pub struct RingBuffer<T> {
    data: Vec<Option<T>>,
    head: usize,
    tail: usize,
}

impl<T> RingBuffer<T> {
    /// Create a buffer that can hold `initial_capacity.max(2) - 1` elements
    /// before its first growth.
    pub fn new(initial_capacity: usize) -> Self {
        let capacity = initial_capacity.max(2);
        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, || None);
        Self { data, head: 0, tail: 0 }
    }

    #[inline]
    fn dcapacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn next(&self, idx: usize) -> usize {
        (idx + 1) % self.dcapacity()
    }

    /// Number of elements one more push can hold before growth is required.
    pub fn capacity(&self) -> usize {
        self.dcapacity() - 1
    }

    /// Number of elements currently queued.
    pub fn size(&self) -> usize {
        if self.head <= self.tail {
            self.tail - self.head
        } else {
            self.dcapacity() - self.head + self.tail
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    fn grow(&mut self, new_capacity: usize) {
        let mut new_data = Vec::with_capacity(new_capacity);
        new_data.resize_with(new_capacity, || None);

        if self.head <= self.tail {
            for (i, slot) in self.data[self.head..self.tail].iter_mut().enumerate() {
                new_data[i] = slot.take();
            }
            self.tail -= self.head;
        } else {
            let first = self.dcapacity() - self.head;
            for (i, slot) in self.data[self.head..].iter_mut().enumerate() {
                new_data[i] = slot.take();
            }
            for (i, slot) in self.data[..self.tail].iter_mut().enumerate() {
                new_data[first + i] = slot.take();
            }
            self.tail = first + self.tail;
        }
        self.head = 0;
        self.data = new_data;
    }

    /// Push a value, growing (doubling) if the buffer is full.
    pub fn push(&mut self, val: T) {
        if self.next(self.tail) == self.head {
            self.grow(self.dcapacity() * 2);
        }
        self.data[self.tail] = Some(val);
        self.tail = self.next(self.tail);
    }

    /// Pop the oldest value. Caller must have checked `size() > 0`.
    pub fn pop(&mut self) -> T {
        let val = self.data[self.head].take().expect("pop on empty ring buffer");
        self.head = self.next(self.head);
        val
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let q: RingBuffer<i32> = RingBuffer::default();
        assert_eq!(q.size(), 0);
        assert!(q.is_empty());
    }

    #[test]
    fn test_push_pop_fifo_order() {
        let mut q = RingBuffer::default();
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.size(), 3);
        assert_eq!(q.pop(), 1);
        assert_eq!(q.pop(), 2);
        assert_eq!(q.pop(), 3);
        assert!(q.is_empty());
    }

    #[test]
    fn test_growth_preserves_order() {
        let mut q = RingBuffer::new(2);
        for i in 0..50 {
            q.push(i);
        }
        assert_eq!(q.size(), 50);
        for i in 0..50 {
            assert_eq!(q.pop(), i);
        }
    }

    #[test]
    fn test_interleaved_push_pop_across_growth() {
        let mut q = RingBuffer::new(4);
        for i in 0..3 {
            q.push(i);
        }
        assert_eq!(q.pop(), 0);
        assert_eq!(q.pop(), 1);
        for i in 3..20 {
            q.push(i);
        }
        let mut expected: Vec<i32> = vec![2];
        expected.extend(3..20);
        for e in expected {
            assert_eq!(q.pop(), e);
        }
        assert!(q.is_empty());
    }

    #[test]
    fn test_wraparound_without_growth() {
        let mut q = RingBuffer::new(4);
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.pop(), 1);
        q.push(4); // tail wraps back to slot 0
        assert_eq!(q.pop(), 2);
        assert_eq!(q.pop(), 3);
        assert_eq!(q.pop(), 4);
        assert!(q.is_empty());
    }
}
