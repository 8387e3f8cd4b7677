//! Count connected regions of a random maze with a chunked work list.
//!
//! Run with `cargo run -p chunkstack-bench --example flood_fill`.

use chunkstack::Stack;
use chunkstack_bench::{count_regions, Grid};

fn main() {
    let grid = Grid::random(256, 256, 40, 7);
    println!(
        "grid {}x{}, {} open cells",
        grid.width(),
        grid.height(),
        grid.open_cells()
    );

    let mut work: Stack<(u32, u32)> = Stack::with_chunk_capacity(256).unwrap();
    let regions = count_regions(&grid, &mut work);
    println!("{regions} regions");
    println!(
        "work list: {} chunks reserved ({} bytes), {} in use",
        work.chunk_count(),
        work.memory_bytes(),
        work.active_chunk_count()
    );

    // A second pass reuses the chunks from the first.
    let before = work.chunk_count();
    let again = count_regions(&grid, &mut work);
    assert_eq!(again, regions);
    println!("second pass: {} new chunks", work.chunk_count() - before);
}
