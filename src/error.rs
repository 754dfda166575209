use thiserror::Error;

/// Error types for `BytesQueue` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum BytesQueueError {
    /// A read was attempted on a queue with no live entries
    #[error("Empty queue")]
    EmptyQueue,
    /// Offset 0 is reserved and never refers to an entry
    #[error("Index must be greater than zero. Invalid index.")]
    InvalidIndex,
    /// Offset is beyond the allocated buffer
    #[error("Index out of range: index {index} is beyond capacity {capacity}")]
    IndexOutOfBounds {
        /// Offset that was accessed
        index: usize,
        /// Allocated size of the buffer
        capacity: usize,
    },
    /// Growing the buffer to fit the entry would exceed the configured ceiling
    #[error("Full queue. Maximum size limit reached: requested {requested} bytes with capacity {capacity} of {max_capacity}")]
    FullQueue {
        /// Number of bytes the encoded entry needs
        requested: usize,
        /// Allocated size of the buffer
        capacity: usize,
        /// Configured maximum size of the buffer
        max_capacity: usize,
    },
    /// The bytes at an offset do not decode to an entry that fits in the buffer
    #[error("Malformed entry at index {index}")]
    MalformedEntry {
        /// Offset that was decoded
        index: usize,
    },
    /// Invalid parameters provided to `BytesQueue::new`
    #[error("Invalid BytesQueue configuration: {parameter} = {value}")]
    InvalidConfiguration {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value
        value: usize,
    },
}
