use crate::codec::{self, LEFT_MARGIN_INDEX};
use crate::core::BytesQueue;

/// Walks the live entries of a `BytesQueue` from the head, yielding
/// `(offset, entry)`. Shared by both public iterators.
#[derive(Clone)]
struct EntryCursor<'a> {
    buffer: &'a [u8],
    right_margin: usize,
    position: usize,
    remaining: usize,
}

impl<'a> EntryCursor<'a> {
    fn new(queue: &'a BytesQueue) -> Self {
        Self {
            buffer: &queue.buffer,
            right_margin: queue.right_margin,
            position: queue.head,
            remaining: queue.len(),
        }
    }

    #[allow(clippy::indexing_slicing)]
    fn next(&mut self) -> Option<(usize, &'a [u8])> {
        if self.remaining == 0 {
            return None;
        }
        if self.position == self.right_margin {
            self.position = LEFT_MARGIN_INDEX;
        }

        let index = self.position;
        let Some((payload, block_size)) = codec::decode_entry(self.buffer, index) else {
            self.remaining = 0;
            return None;
        };
        self.position += block_size;
        self.remaining -= 1;

        Some((index, &self.buffer[payload]))
    }
}

/// Iterator over entries in a `BytesQueue`, oldest first
///
/// This iterator implements `Clone`.
#[derive(Clone)]
pub struct BytesQueueIter<'a> {
    cursor: EntryCursor<'a>,
}

impl<'a> Iterator for BytesQueueIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next().map(|(_, entry)| entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl ExactSizeIterator for BytesQueueIter<'_> {}

impl<'a> IntoIterator for &'a BytesQueue {
    type Item = &'a [u8];
    type IntoIter = BytesQueueIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        BytesQueueIter {
            cursor: EntryCursor::new(self),
        }
    }
}

/// Iterator over `(offset, entry)` pairs in a `BytesQueue`, oldest first
///
/// The offsets are the ones `push` returned and `get` accepts.
#[derive(Clone)]
pub struct BytesQueueEntries<'a> {
    cursor: EntryCursor<'a>,
}

impl<'a> BytesQueueEntries<'a> {
    pub(crate) fn new(queue: &'a BytesQueue) -> Self {
        Self {
            cursor: EntryCursor::new(queue),
        }
    }
}

impl<'a> Iterator for BytesQueueEntries<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl ExactSizeIterator for BytesQueueEntries<'_> {}
