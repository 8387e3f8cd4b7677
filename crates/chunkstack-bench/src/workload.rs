//! Deterministic stack workloads.

use chunkstack::Stack;

/// 64-bit LCG step (Knuth MMIX constants).
fn lcg(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

/// Minimal LIFO surface shared by [`Stack`] and `Vec`, so the same workload
/// can drive both.
pub trait WorkList<T> {
    /// Push `value` on top.
    fn push_item(&mut self, value: T);
    /// Remove and return the top value.
    fn pop_item(&mut self) -> Option<T>;
}

impl<T: Copy> WorkList<T> for Stack<T> {
    fn push_item(&mut self, value: T) {
        self.push(value);
    }

    fn pop_item(&mut self) -> Option<T> {
        self.pop()
    }
}

impl<T> WorkList<T> for Vec<T> {
    fn push_item(&mut self, value: T) {
        self.push(value);
    }

    fn pop_item(&mut self) -> Option<T> {
        self.pop()
    }
}

/// One step of a churn workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Push the carried value.
    Push(u64),
    /// Pop one value. Never emitted on an empty stack.
    Pop,
}

/// Generate `cycles` fill-and-drain cycles.
///
/// Each cycle pushes between `peak / 2` and `peak` values, then pops every
/// one of them, with short pop/push flurries mixed in on the way up. The
/// stack is empty after every cycle.
pub fn sawtooth(cycles: usize, peak: usize, seed: u64) -> Vec<Op> {
    let mut state = seed;
    let mut ops = Vec::with_capacity(cycles * peak * 2);
    for _ in 0..cycles {
        let span = peak - peak / 2;
        let depth = peak / 2 + (lcg(&mut state) as usize) % (span + 1);
        let mut live = 0usize;
        while live < depth {
            let value = lcg(&mut state);
            ops.push(Op::Push(value));
            live += 1;
            // Occasional dip so the top crosses chunk boundaries both ways.
            if value % 8 == 0 && live > 1 {
                ops.push(Op::Pop);
                live -= 1;
            }
        }
        ops.extend(std::iter::repeat(Op::Pop).take(live));
    }
    ops
}

/// Replay `ops` against `list`, returning the XOR of every popped value.
///
/// # Panics
///
/// Panics if `ops` pops more than it pushed.
pub fn run_ops<W: WorkList<u64>>(ops: &[Op], list: &mut W) -> u64 {
    let mut checksum = 0u64;
    for op in ops {
        match *op {
            Op::Push(v) => list.push_item(v),
            Op::Pop => {
                checksum ^= list.pop_item().expect("workload popped an empty list");
            }
        }
    }
    checksum
}

/// Row-major grid of open (`true`) and wall (`false`) cells.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    open: Vec<bool>,
}

impl Grid {
    /// Build a grid from rows of `.` (open) and `#` (wall).
    ///
    /// # Panics
    ///
    /// Panics if rows differ in length.
    pub fn parse(rows: &[&str]) -> Self {
        let width = rows.first().map_or(0, |r| r.len());
        let mut open = Vec::with_capacity(width * rows.len());
        for row in rows {
            assert_eq!(row.len(), width, "ragged grid row {row:?}");
            open.extend(row.bytes().map(|b| b != b'#'));
        }
        Self {
            width: width as u32,
            height: rows.len() as u32,
            open,
        }
    }

    /// Random grid where roughly `wall_percent` of cells are walls.
    pub fn random(width: u32, height: u32, wall_percent: u8, seed: u64) -> Self {
        let mut state = seed;
        let open = (0..width as usize * height as usize)
            .map(|_| lcg(&mut state) % 100 >= u64::from(wall_percent))
            .collect();
        Self {
            width,
            height,
            open,
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of open cells.
    pub fn open_cells(&self) -> usize {
        self.open.iter().filter(|&&o| o).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Count 4-connected regions of open cells.
///
/// `work` is the flood-fill work list. It is drained after every region and
/// handed back empty, so one list can be reused across calls.
pub fn count_regions<W: WorkList<(u32, u32)>>(grid: &Grid, work: &mut W) -> usize {
    let mut seen = vec![false; grid.open.len()];
    let mut regions = 0;
    for y in 0..grid.height {
        for x in 0..grid.width {
            let idx = grid.index(x, y);
            if !grid.open[idx] || seen[idx] {
                continue;
            }
            regions += 1;
            seen[idx] = true;
            work.push_item((x, y));
            while let Some((cx, cy)) = work.pop_item() {
                let neighbours = [
                    (cx.wrapping_sub(1), cy),
                    (cx + 1, cy),
                    (cx, cy.wrapping_sub(1)),
                    (cx, cy + 1),
                ];
                for (nx, ny) in neighbours {
                    if nx >= grid.width || ny >= grid.height {
                        continue;
                    }
                    let n = grid.index(nx, ny);
                    if grid.open[n] && !seen[n] {
                        seen[n] = true;
                        work.push_item((nx, ny));
                    }
                }
            }
        }
    }
    regions
}
