//! Property tests for the history buffer and sparkline conditioner

use std::collections::VecDeque;

use airwatch_core::graph::Sparkline;
use airwatch_core::storage::{HistoryBuffer, MAX_CAPACITY};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Enqueue(i16),
    Dequeue,
    Contiguous,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i16>().prop_map(Op::Enqueue),
        1 => Just(Op::Dequeue),
        1 => Just(Op::Contiguous),
    ]
}

proptest! {
    #[test]
    fn keeps_last_capacity_values_oldest_first(
        capacity in 1usize..=MAX_CAPACITY,
        values in prop::collection::vec(any::<i16>(), 0..400),
    ) {
        let mut history: HistoryBuffer = HistoryBuffer::new(capacity);
        for &v in &values {
            history.enqueue(v);
        }

        let kept = values.len().min(capacity);
        prop_assert_eq!(history.len(), kept);
        prop_assert_eq!(history.is_full(), values.len() >= capacity);
        prop_assert_eq!(history.contiguous(), &values[values.len() - kept..]);
    }

    #[test]
    fn contiguous_is_idempotent(
        capacity in 1usize..=32,
        values in prop::collection::vec(any::<i16>(), 0..100),
    ) {
        let mut history: HistoryBuffer<32> = HistoryBuffer::new(capacity);
        for &v in &values {
            history.enqueue(v);
        }

        let first = history.contiguous().to_vec();
        let second = history.contiguous().to_vec();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn matches_a_bounded_deque(
        capacity in 1usize..=16,
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let mut history: HistoryBuffer<16> = HistoryBuffer::new(capacity);
        let mut model: VecDeque<i16> = VecDeque::new();

        for op in ops {
            match op {
                Op::Enqueue(v) => {
                    if model.len() == capacity {
                        model.pop_front();
                    }
                    model.push_back(v);
                    history.enqueue(v);
                }
                Op::Dequeue => {
                    prop_assert_eq!(history.dequeue(), model.pop_front());
                }
                Op::Contiguous => {
                    let expected: Vec<i16> = model.iter().copied().collect();
                    prop_assert_eq!(history.contiguous(), expected.as_slice());
                }
            }

            prop_assert_eq!(history.len(), model.len());
            prop_assert_eq!(history.latest(), model.back().copied());
            prop_assert_eq!(history.iter().collect::<Vec<_>>(), model.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn sparkline_output_fits_the_panel(
        width in 1usize..200,
        height in 1i16..64,
        samples in prop::collection::vec(any::<i16>(), 0..300),
    ) {
        let out = Sparkline::new(width, height).process(&samples);

        prop_assert_eq!(out.len(), width);
        prop_assert!(out.iter().all(|&v| (0..height).contains(&v)));
    }

    #[test]
    fn flat_input_maps_to_midpoint(
        width in 1usize..200,
        height in 1i16..64,
        value in any::<i16>(),
        len in 1usize..300,
    ) {
        let sparkline = Sparkline::new(width, height);
        let out = sparkline.process(&vec![value; len]);

        prop_assert!(out.iter().all(|&v| v == (height - 1) / 2));
        prop_assert_eq!(out.len(), width);
    }
}
