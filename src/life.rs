// src/life.rs
//
// Double-buffered cell grid. All reads during a generation step see the
// committed grid; all writes land in the staging buffer until `commit`.

/// Fixed-size Conway grid with a staging buffer for the next generation.
///
/// Coordinates are signed so callers can pass raw cursor-derived values;
/// anything outside `[0, width) x [0, height)` reads as dead and ignores
/// writes.
pub struct LifeGrid {
    width: i32,
    height: i32,
    cells: Vec<bool>,
    staging: Vec<bool>,
}

impl LifeGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width: width as i32,
            height: height as i32,
            cells: vec![false; n],
            staging: vec![false; n],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Whether the cell at (x, y) is alive. Out-of-bounds cells read as
    /// dead, so the grid behaves as if surrounded by an eternally dead
    /// border rather than wrapping.
    #[inline]
    pub fn query(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells[self.index(x, y)]
    }

    /// Writes `alive` into the staging buffer at (x, y). Returns whether
    /// the write happened; out-of-bounds is a silent no-op.
    pub fn paint(&mut self, alive: bool, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let i = self.index(x, y);
        self.staging[i] = alive;
        true
    }

    /// Paints the square `[cx-r, cx+r) x [cy-r, cy+r)`, each cell clipped
    /// individually through `paint`.
    pub fn apply_brush(&mut self, alive: bool, cx: i32, cy: i32, radius: i32) {
        let r = radius.max(0);
        for dy in -r..r {
            for dx in -r..r {
                self.paint(alive, cx + dx, cy + dy);
            }
        }
    }

    /// Advances the automaton by one generation: reads the committed grid,
    /// writes every cell of the staging buffer. Survive on 2 or 3 live
    /// neighbors, birth on exactly 3, dead otherwise.
    pub fn step_generation(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let mut live_neighbors = 0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        if self.query(x + dx, y + dy) {
                            live_neighbors += 1;
                        }
                    }
                }
                let alive = self.cells[self.index(x, y)];
                let next = if alive {
                    live_neighbors == 2 || live_neighbors == 3
                } else {
                    live_neighbors == 3
                };
                let i = self.index(x, y);
                self.staging[i] = next;
            }
        }
    }

    /// Kills every cell in both buffers.
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.staging.fill(false);
    }

    /// Seeds the staging buffer with a copy of the committed grid. Called
    /// once at the start of each frame, before any paints or steps.
    pub fn begin_frame(&mut self) {
        self.staging.copy_from_slice(&self.cells);
    }

    /// Promotes the staging buffer to the committed grid. Renderers never
    /// observe a partially written generation.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.staging);
    }
}
