//! `BytesQueue`: a growable FIFO queue of byte entries in a single circular buffer.
//!
//! Each `push` copies the entry into the buffer and returns its offset. The
//! offset can later be handed to `get` for random access, while `pop` and
//! `peek` consume the queue in FIFO order. The queue is a storage primitive
//! for caches and logs: it does no hashing, no eviction policy and no
//! locking. A cache on top of it maps its keys to offsets.
//!
//! Buffer layout: `[reserved byte][entry][entry]...`
//! Each entry is `[header][payload]`, where the header is an LEB128 varint of
//! the entry size including the header itself. Offset 0 is never used, so
//! callers can store 0 as "no entry".
//!
//! # Growth
//!
//! When an entry fits neither after the tail nor before the head, the buffer
//! is reallocated to at least twice its size, capped by the optional maximum
//! capacity. Growth keeps every offset in place. If the old layout was
//! wrapped, the free gap between tail and head is covered by a zero-filled
//! filler entry and the layout is relinearized, so after such a growth
//! `pop` returns the entries that had wrapped around first, then the filler,
//! then the older ones.
//!
//! ```
//! # use bytesqueue::BytesQueue;
//! let mut queue = BytesQueue::with_capacity(16).unwrap();
//!
//! let first = queue.push(b"hello").unwrap();
//! let second = queue.push(b"a somewhat longer entry").unwrap();
//! assert!(queue.capacity() >= 32);
//!
//! assert_eq!(queue.get(second).unwrap(), b"a somewhat longer entry");
//! assert_eq!(queue.get(first).unwrap(), b"hello");
//! ```
//!
//! # FIFO Interface
//!
//! ```
//! # use bytesqueue::BytesQueue;
//! let mut queue = BytesQueue::new(64, 0, false).unwrap();
//!
//! queue.push(b"first").unwrap();
//! queue.push(b"second").unwrap();
//!
//! assert_eq!(queue.peek().unwrap(), b"first");
//! assert_eq!(queue.pop().unwrap(), b"first");
//! assert_eq!(queue.pop().unwrap(), b"second");
//!
//! assert!(queue.is_empty());
//! assert!(queue.pop().is_err());
//! ```
//!
//! # Capacity Limit
//!
//! ```
//! # use bytesqueue::{BytesQueue, BytesQueueError};
//! let mut queue = BytesQueue::new(10, 20, false).unwrap();
//!
//! queue.push(b"12345").unwrap();
//! queue.push(b"12345").unwrap();
//! queue.push(b"12345").unwrap();
//! assert_eq!(queue.capacity(), 20);
//!
//! assert!(matches!(
//!     queue.push(b"12345"),
//!     Err(BytesQueueError::FullQueue { .. })
//! ));
//! ```
//!
//! # Iterator Support
//!
//! ```
//! # use bytesqueue::BytesQueue;
//! let mut queue = BytesQueue::with_capacity(64).unwrap();
//!
//! let hello = queue.push(b"hello").unwrap();
//! queue.push(b"world").unwrap();
//!
//! let collected: Vec<_> = queue.iter().collect();
//! assert_eq!(collected, vec![&b"hello"[..], &b"world"[..]]);
//!
//! let (offset, entry) = queue.entries().next().unwrap();
//! assert_eq!((offset, entry), (hello, &b"hello"[..]));
//! ```
//!
//! # Thread Safety
//!
//! No operation synchronizes. Entries returned by `pop`, `peek` and `get`
//! borrow the queue, so they cannot outlive the next `push` or `reset`.
//! Wrap the queue in a `Mutex` and hold the lock for every call, including
//! iterations that span several calls.

mod codec;
mod core;
mod error;
mod growth;
mod iter;

pub use crate::codec::{needed_size, LEFT_MARGIN_INDEX, MINIMUM_HEADER_SIZE};
pub use crate::core::BytesQueue;
pub use crate::error::BytesQueueError;
pub use crate::growth::GrowthEvent;
pub use crate::iter::{BytesQueueEntries, BytesQueueIter};
