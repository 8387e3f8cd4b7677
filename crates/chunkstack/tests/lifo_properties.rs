use chunkstack::{RawStack, Stack};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Push(u64),
    Pop,
    Discard,
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => any::<u64>().prop_map(Op::Push),
        3 => Just(Op::Pop),
        1 => Just(Op::Discard),
        1 => Just(Op::Clear),
    ]
}

/// Expand a seed into an `elem_size`-byte record.
fn record(seed: u64, elem_size: usize) -> Vec<u8> {
    (0..elem_size)
        .map(|i| (seed.rotate_left(i as u32 * 7) as u8) ^ i as u8)
        .collect()
}

proptest! {
    #[test]
    fn raw_stack_matches_vec_model(
        elem_size in 1usize..24,
        chunk_capacity in 1usize..9,
        ops in proptest::collection::vec(op(), 0..200),
    ) {
        let mut stack = RawStack::new(elem_size, chunk_capacity).unwrap();
        let mut model: Vec<Vec<u8>> = Vec::new();
        let mut out = vec![0u8; elem_size];

        for op in ops {
            match op {
                Op::Push(seed) => {
                    let rec = record(seed, elem_size);
                    stack.push(&rec);
                    model.push(rec);
                }
                Op::Pop => {
                    if let Some(expected) = model.pop() {
                        stack.pop(&mut out);
                        prop_assert_eq!(&out, &expected);
                    }
                }
                Op::Discard => {
                    if model.pop().is_some() {
                        stack.discard();
                    }
                }
                Op::Clear => {
                    model.clear();
                    stack.clear();
                }
            }
            prop_assert_eq!(stack.len(), model.len());
            prop_assert_eq!(stack.is_empty(), model.is_empty());
            if let Some(top) = model.last() {
                prop_assert_eq!(stack.peek(), top.as_slice());
            }
            let needed = model.len().div_ceil(chunk_capacity);
            prop_assert_eq!(stack.active_chunk_count(), needed);
            prop_assert_eq!(
                stack.active_chunk_count() + stack.free_chunk_count(),
                stack.chunk_count()
            );
        }
    }

    #[test]
    fn len_is_pushes_minus_pops(
        pushes in 0usize..300,
        pops_frac in 0.0f64..=1.0,
        chunk_capacity in 1usize..17,
    ) {
        let pops = (pushes as f64 * pops_frac) as usize;
        let mut stack: Stack<u32> = Stack::with_chunk_capacity(chunk_capacity).unwrap();
        stack.extend(0..pushes as u32);
        for _ in 0..pops {
            prop_assert!(stack.pop().is_some());
        }
        prop_assert_eq!(stack.len(), pushes - pops);
        prop_assert_eq!(stack.is_empty(), pushes == pops);
    }

    #[test]
    fn refill_to_same_depth_allocates_no_new_chunks(
        depths in proptest::collection::vec(1usize..100, 1..10),
        chunk_capacity in 1usize..16,
    ) {
        let peak = *depths.iter().max().unwrap();
        let mut stack: Stack<u16> = Stack::with_chunk_capacity(chunk_capacity).unwrap();
        stack.extend(std::iter::repeat(0).take(peak));
        stack.clear();
        let reserved = stack.chunk_count();
        prop_assert_eq!(reserved, peak.div_ceil(chunk_capacity));

        for depth in depths {
            stack.extend((0..depth).map(|d| d as u16));
            prop_assert_eq!(stack.peek(), Some(depth as u16 - 1));
            if depth % 2 == 0 {
                stack.clear();
            } else {
                while stack.discard() {}
            }
            prop_assert_eq!(stack.chunk_count(), reserved);
        }
    }
}

#[test]
fn push_one_past_capacity_then_discard_all() {
    let mut stack = RawStack::new(8, 16).unwrap();
    for v in 0..17u64 {
        stack.push(&v.to_le_bytes());
    }
    assert_eq!(stack.active_chunk_count(), 2);
    for _ in 0..17 {
        stack.discard();
    }
    assert_eq!(stack.len(), 0);
    assert_eq!(stack.chunk_count(), 2);
    assert_eq!(stack.free_chunk_count(), 2);
}

#[test]
fn element_regions_never_move_while_live() {
    let mut stack = RawStack::new(4, 2).unwrap();
    stack.push(&1u32.to_le_bytes());
    let bottom = stack.peek().as_ptr();
    for v in 2..64u32 {
        stack.push(&v.to_le_bytes());
    }
    for _ in 2..64 {
        stack.discard();
    }
    assert_eq!(stack.peek().as_ptr(), bottom);
    assert_eq!(stack.peek(), &1u32.to_le_bytes());
}
