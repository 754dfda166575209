use core::ops::Range;
use std::time::Instant;

use crate::codec::{self, LEFT_MARGIN_INDEX, MAX_HEADER_SIZE, MINIMUM_HEADER_SIZE};
use crate::error::BytesQueueError;
use crate::growth::{self, GrowthEvent, GrowthObserver};
use crate::iter::{BytesQueueEntries, BytesQueueIter};

/// A growable FIFO queue of byte entries stored in one circular buffer.
///
/// Every `push` returns the offset of the stored entry, which `get` accepts
/// later for random access. The queue is not thread safe; share it behind
/// a lock.
#[derive(Debug)]
pub struct BytesQueue {
    pub(crate) buffer: Vec<u8>,
    max_capacity: usize,
    pub(crate) head: usize,
    tail: usize,
    pub(crate) right_margin: usize,
    count: usize,
    full: bool,
    verbose: bool,
    observer: Option<GrowthObserver>,
}

impl BytesQueue {
    /// Creates a new queue with a buffer of `capacity` bytes.
    ///
    /// The buffer grows on demand up to `max_capacity` bytes; `0` means no
    /// limit. When `verbose` is set, every reallocation is logged at `info`
    /// level with its duration and the new capacity.
    ///
    /// # Errors
    ///
    /// Returns `BytesQueueError::InvalidConfiguration` if:
    /// - `capacity` is 0
    /// - `max_capacity` is set and smaller than `capacity`
    pub fn new(capacity: usize, max_capacity: usize, verbose: bool) -> Result<Self, BytesQueueError> {
        if capacity == 0 {
            return Err(BytesQueueError::InvalidConfiguration {
                parameter: "capacity",
                value: capacity,
            });
        }

        if max_capacity > 0 && max_capacity < capacity {
            return Err(BytesQueueError::InvalidConfiguration {
                parameter: "max_capacity",
                value: max_capacity,
            });
        }

        Ok(Self {
            buffer: vec![0; capacity],
            max_capacity,
            head: LEFT_MARGIN_INDEX,
            tail: LEFT_MARGIN_INDEX,
            right_margin: LEFT_MARGIN_INDEX,
            count: 0,
            full: false,
            verbose,
            observer: None,
        })
    }

    /// Creates an unbounded, non-verbose queue.
    ///
    /// # Errors
    ///
    /// Returns `BytesQueueError::InvalidConfiguration` if `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> Result<Self, BytesQueueError> {
        Self::new(capacity, 0, false)
    }

    /// Registers a callback invoked after every reallocation of the buffer.
    pub fn set_growth_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&GrowthEvent) + Send + 'static,
    {
        self.observer = Some(GrowthObserver::new(observer));
    }

    pub fn clear_growth_observer(&mut self) {
        self.observer = None;
    }

    /// Number of bytes allocated for the buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Number of entries kept in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The buffer has no free byte left without growing.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Removes all entries. The buffer is kept and not cleared.
    pub fn reset(&mut self) {
        self.tail = LEFT_MARGIN_INDEX;
        self.head = LEFT_MARGIN_INDEX;
        self.right_margin = LEFT_MARGIN_INDEX;
        self.count = 0;
        self.full = false;
    }

    /// Copies `data` to the end of the queue, growing the buffer if needed.
    ///
    /// Returns the offset of the stored entry, always at least 1.
    ///
    /// # Errors
    ///
    /// Returns `BytesQueueError::FullQueue` if the entry fits nowhere and
    /// growing the buffer for it would reach `max_capacity`.
    pub fn push(&mut self, data: &[u8]) -> Result<usize, BytesQueueError> {
        let need = codec::needed_size(data.len());

        if !self.can_insert_after_tail(need) {
            if self.can_insert_before_head(need) {
                self.tail = LEFT_MARGIN_INDEX;
            } else if self.max_capacity > 0
                && self.capacity().saturating_add(need) >= self.max_capacity
            {
                return Err(BytesQueueError::FullQueue {
                    requested: need,
                    capacity: self.capacity(),
                    max_capacity: self.max_capacity,
                });
            } else {
                self.allocate_additional_memory(need);
            }
        }

        let index = self.tail;
        self.write_entry(Some(data), need);
        self.debug_check_invariants();

        Ok(index)
    }

    /// Removes and returns the oldest entry.
    ///
    /// # Errors
    ///
    /// Returns `BytesQueueError::EmptyQueue` if there are no entries.
    #[allow(clippy::indexing_slicing)]
    pub fn pop(&mut self) -> Result<&[u8], BytesQueueError> {
        let (payload, block_size) = self.peek_at(self.head)?;

        self.head += block_size;
        self.count -= 1;

        if self.head == self.right_margin {
            self.head = LEFT_MARGIN_INDEX;
            if self.tail == self.right_margin {
                self.tail = LEFT_MARGIN_INDEX;
            }
            self.right_margin = self.tail;
        }

        self.full = false;
        self.debug_check_invariants();

        Ok(&self.buffer[payload])
    }

    /// Returns the oldest entry without removing it.
    ///
    /// # Errors
    ///
    /// Returns `BytesQueueError::EmptyQueue` if there are no entries.
    #[allow(clippy::indexing_slicing)]
    pub fn peek(&self) -> Result<&[u8], BytesQueueError> {
        let (payload, _) = self.peek_at(self.head)?;
        Ok(&self.buffer[payload])
    }

    /// Returns the entry stored at `index`, an offset returned by `push`.
    ///
    /// Only the bounds of `index` are checked. An offset whose entry was
    /// popped and overwritten, or moved by a relinearizing growth, reads
    /// whatever is stored there now.
    ///
    /// # Errors
    ///
    /// - `BytesQueueError::EmptyQueue` if there are no entries
    /// - `BytesQueueError::InvalidIndex` if `index` is 0
    /// - `BytesQueueError::IndexOutOfBounds` if `index` is beyond the buffer
    /// - `BytesQueueError::MalformedEntry` if the bytes at `index` do not
    ///   describe an entry inside the buffer
    #[allow(clippy::indexing_slicing)]
    pub fn get(&self, index: usize) -> Result<&[u8], BytesQueueError> {
        let (payload, _) = self.peek_at(index)?;
        Ok(&self.buffer[payload])
    }

    /// Checks whether `get(index)` passes the bounds checks, without
    /// decoding the entry.
    ///
    /// # Errors
    ///
    /// Same as `get`, except `MalformedEntry` is never returned.
    pub fn check_get(&self, index: usize) -> Result<(), BytesQueueError> {
        if self.count == 0 {
            return Err(BytesQueueError::EmptyQueue);
        }

        if index == 0 {
            return Err(BytesQueueError::InvalidIndex);
        }

        if index >= self.buffer.len() {
            return Err(BytesQueueError::IndexOutOfBounds {
                index,
                capacity: self.buffer.len(),
            });
        }

        Ok(())
    }

    /// Returns an iterator over the entries in the order `pop` would return
    /// them.
    #[must_use]
    pub fn iter(&self) -> BytesQueueIter<'_> {
        self.into_iter()
    }

    /// Returns an iterator over `(offset, entry)` pairs in the order `pop`
    /// would return them.
    #[must_use]
    pub fn entries(&self) -> BytesQueueEntries<'_> {
        BytesQueueEntries::new(self)
    }

    fn peek_at(&self, index: usize) -> Result<(Range<usize>, usize), BytesQueueError> {
        self.check_get(index)?;
        codec::decode_entry(&self.buffer, index).ok_or(BytesQueueError::MalformedEntry { index })
    }

    /// Writes an entry of `block_size` bytes at the tail. `None` writes a
    /// zero-filled entry that only covers a gap.
    #[allow(clippy::indexing_slicing)] // Placement checked by the caller
    fn write_entry(&mut self, data: Option<&[u8]>, block_size: usize) {
        let mut header = [0u8; MAX_HEADER_SIZE];
        let header_size = codec::encode_header(block_size, &mut header);

        let start = self.tail;
        let payload_start = start + header_size;
        let end = start + block_size;

        self.buffer[start..payload_start].copy_from_slice(&header[..header_size]);
        let payload = &mut self.buffer[payload_start..end];
        match data {
            Some(data) => payload.copy_from_slice(data),
            None => payload.fill(0),
        }
        self.tail = end;

        if self.tail > self.head {
            self.right_margin = self.tail;
        }
        if self.tail == self.head {
            self.full = true;
        }

        self.count += 1;
    }

    /// Grows the buffer so that at least `minimum` contiguous bytes are free
    /// after the tail.
    ///
    /// A wrapped layout is relinearized: the gap between tail and head is
    /// covered by a filler entry, head moves to the left margin and tail to
    /// the old right margin. Readers then see the wrapped (newer) entries
    /// first, then the filler, then the older ones. Offsets are unchanged.
    #[allow(clippy::indexing_slicing)]
    fn allocate_additional_memory(&mut self, minimum: usize) {
        let start = Instant::now();
        let previous_capacity = self.capacity();

        let mut capacity = previous_capacity.max(minimum).saturating_mul(2);
        if self.max_capacity > 0 && capacity > self.max_capacity {
            capacity = self.max_capacity;
        }

        let mut buffer = vec![0; capacity];
        let mut wrapped = false;

        if self.right_margin != LEFT_MARGIN_INDEX {
            buffer[..self.right_margin].copy_from_slice(&self.buffer[..self.right_margin]);
            self.buffer = buffer;

            if self.tail <= self.head {
                wrapped = true;
                if self.tail != self.head {
                    let gap = self.head - self.tail;
                    debug_assert!(gap >= MINIMUM_HEADER_SIZE);
                    self.write_entry(None, gap);
                }

                self.head = LEFT_MARGIN_INDEX;
                self.tail = self.right_margin;
            }
        } else {
            self.buffer = buffer;
        }

        self.full = false;

        let event = GrowthEvent {
            previous_capacity,
            capacity,
            elapsed: start.elapsed(),
            wrapped,
        };
        growth::log_growth(&event, self.verbose);
        if let Some(observer) = self.observer.as_mut() {
            observer.notify(&event);
        }
    }

    fn can_insert_after_tail(&self, need: usize) -> bool {
        if self.full {
            return false;
        }
        if self.tail >= self.head {
            return self.capacity() - self.tail >= need;
        }
        // Either the gap is consumed exactly, or enough of it stays free to
        // hold an empty entry when the buffer is relinearized.
        let gap = self.head - self.tail;
        gap == need || gap >= need + MINIMUM_HEADER_SIZE
    }

    fn can_insert_before_head(&self, need: usize) -> bool {
        if self.full {
            return false;
        }
        let gap = if self.tail >= self.head {
            self.head - LEFT_MARGIN_INDEX
        } else {
            self.head - self.tail
        };
        gap == need || gap >= need + MINIMUM_HEADER_SIZE
    }

    #[cfg(debug_assertions)]
    fn debug_check_invariants(&self) {
        let capacity = self.capacity();
        debug_assert!((LEFT_MARGIN_INDEX..=capacity).contains(&self.head));
        debug_assert!((LEFT_MARGIN_INDEX..=capacity).contains(&self.tail));
        debug_assert!(self.right_margin <= capacity);
        debug_assert_eq!(self.count == 0, self.head == self.tail && !self.full);
        if self.tail >= self.head && !self.full {
            debug_assert!(self.right_margin >= self.tail);
        }
    }

    #[cfg(not(debug_assertions))]
    fn debug_check_invariants(&self) {}
}
