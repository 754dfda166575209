//! Property-based tests for `BytesQueue`.
//!
//! - Bounded queues (no growth) behave as a FIFO of byte strings
//! - Every live entry stays readable at the offset `push` returned,
//!   across any number of reallocations
//! - `get(push(p)) == p`

use std::collections::{BTreeMap, VecDeque};

use bytesqueue::{BytesQueue, BytesQueueError, LEFT_MARGIN_INDEX};
use proptest::collection::vec;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(Vec<u8>),
    Pop,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => vec(any::<u8>(), 0..48).prop_map(Op::Push),
        4 => Just(Op::Pop),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn bounded_queue_is_fifo(
        capacity in 8usize..160,
        ops in vec(op_strategy(), 0..300),
    ) {
        // max_capacity == capacity: the buffer never grows
        let mut queue = BytesQueue::new(capacity, capacity, false).unwrap();
        let mut model: VecDeque<(usize, Vec<u8>)> = VecDeque::new();

        for op in ops {
            match op {
                Op::Push(data) => match queue.push(&data) {
                    Ok(offset) => {
                        prop_assert!(offset >= LEFT_MARGIN_INDEX);
                        model.push_back((offset, data));
                    }
                    Err(err) => {
                        let is_full = matches!(err, BytesQueueError::FullQueue { .. });
                        prop_assert!(is_full);
                    }
                },
                Op::Pop => match model.pop_front() {
                    Some((_, expected)) => prop_assert_eq!(queue.pop().unwrap(), &expected[..]),
                    None => prop_assert_eq!(queue.pop(), Err(BytesQueueError::EmptyQueue)),
                },
                Op::Reset => {
                    queue.reset();
                    model.clear();
                }
            }

            prop_assert_eq!(queue.capacity(), capacity);
            prop_assert_eq!(queue.len(), model.len());
            for (offset, data) in &model {
                prop_assert_eq!(queue.get(*offset).unwrap(), &data[..]);
            }
            let live: Vec<&[u8]> = queue.iter().collect();
            let expected: Vec<&[u8]> = model.iter().map(|(_, data)| data.as_slice()).collect();
            prop_assert_eq!(live, expected);
        }
    }

    #[test]
    fn growing_queue_keeps_offsets(
        capacity in 1usize..64,
        ops in vec(op_strategy(), 0..300),
    ) {
        let mut queue = BytesQueue::with_capacity(capacity).unwrap();
        // Live entries by offset; filler entries written by growth are not tracked.
        let mut model: BTreeMap<usize, Vec<u8>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Push(data) => {
                    let offset = queue.push(&data).unwrap();
                    prop_assert!(model.insert(offset, data).is_none());
                }
                Op::Pop => {
                    let head = queue.entries().next().map(|(offset, _)| offset);
                    match head {
                        Some(offset) => {
                            let popped = queue.pop().unwrap().to_vec();
                            if let Some(expected) = model.remove(&offset) {
                                prop_assert_eq!(popped, expected);
                            }
                        }
                        None => {
                            prop_assert!(model.is_empty());
                            prop_assert!(queue.pop().is_err());
                        }
                    }
                }
                Op::Reset => {
                    queue.reset();
                    model.clear();
                }
            }

            prop_assert!(queue.len() >= model.len());
            for (offset, data) in &model {
                prop_assert_eq!(queue.get(*offset).unwrap(), &data[..]);
            }
        }
    }

    #[test]
    fn get_returns_pushed_bytes(
        capacity in 1usize..256,
        data in vec(any::<u8>(), 0..4096),
    ) {
        let mut queue = BytesQueue::with_capacity(capacity).unwrap();
        let offset = queue.push(&data).unwrap();
        prop_assert_eq!(queue.get(offset).unwrap(), &data[..]);
        prop_assert_eq!(queue.peek().unwrap(), &data[..]);
    }
}
