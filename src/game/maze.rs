//! Maze Generation
//!
//! Depth-first "recursive backtracker" carving on a grid where cells two
//! steps apart are rooms and the cell between them is the wall that gets
//! knocked out. Carving starts at (1, 1) and never touches the border, so the
//! maze is always enclosed.
//!
//! The walk uses an explicit stack. Each frame keeps its own shuffled
//! direction list and resumes where it left off after a dead end, which
//! visits cells in the same order as the recursive formulation.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Default maze size used by the scene.
pub const MAZE_ROWS: usize = 10;
pub const MAZE_COLS: usize = 25;

/// North, south, east, west in (dx, dy) grid steps.
const STEPS: [(i64, i64); 4] = [(0, -2), (0, 2), (2, 0), (-2, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Passage,
    Start,
    End,
}

impl Cell {
    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }

    fn glyph(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Passage => '.',
            Cell::Start => 'X',
            Cell::End => 'e',
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze must be at least 3x3, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize },
    #[error("a {rows}x{cols} maze has fewer than two passage cells")]
    NotEnoughPassages { rows: usize, cols: usize },
}

/// A carved maze, read-only after generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    rows: usize,
    cols: usize,
    /// Row-major, `rows * cols`
    cells: Vec<Cell>,
    start: (usize, usize),
    end: (usize, usize),
}

/// One level of the carving walk.
struct Frame {
    x: i64,
    y: i64,
    steps: [(i64, i64); 4],
    next: usize,
}

impl Frame {
    fn new<R: Rng + ?Sized>(x: i64, y: i64, rng: &mut R) -> Self {
        let mut steps = STEPS;
        steps.shuffle(rng);
        Self { x, y, steps, next: 0 }
    }
}

impl MazeGrid {
    /// Carve a new maze and place distinct start and end cells.
    pub fn generate<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Self, MazeError> {
        if rows < 3 || cols < 3 {
            return Err(MazeError::TooSmall { rows, cols });
        }

        let mut grid = Self {
            rows,
            cols,
            cells: vec![Cell::Wall; rows * cols],
            start: (1, 1),
            end: (1, 1),
        };
        grid.carve(rng);

        if grid.passage_count() < 2 {
            return Err(MazeError::NotEnoughPassages { rows, cols });
        }

        grid.start = grid.random_passage(rng);
        let end = loop {
            let candidate = grid.random_passage(rng);
            if candidate != grid.start {
                break candidate;
            }
        };
        grid.end = end;

        let (sx, sy) = grid.start;
        let (ex, ey) = grid.end;
        grid.set(sx, sy, Cell::Start);
        grid.set(ex, ey, Cell::End);
        Ok(grid)
    }

    fn carve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.set(1, 1, Cell::Passage);
        let mut stack = vec![Frame::new(1, 1, rng)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.steps.len() {
                stack.pop();
                continue;
            }
            let (dx, dy) = frame.steps[frame.next];
            frame.next += 1;

            let (x, y) = (frame.x, frame.y);
            let (nx, ny) = (x + dx, y + dy);
            let inside = nx > 0 && nx < self.cols as i64 - 1 && ny > 0 && ny < self.rows as i64 - 1;
            if inside && self.cell(nx as usize, ny as usize).is_wall() {
                self.set(nx as usize, ny as usize, Cell::Passage);
                self.set((x + dx / 2) as usize, (y + dy / 2) as usize, Cell::Passage);
                stack.push(Frame::new(nx, ny, rng));
            }
        }
    }

    /// Uniform over interior cells, rejecting walls.
    fn random_passage<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        loop {
            let x = rng.gen_range(1..=self.cols - 2);
            let y = rng.gen_range(1..=self.rows - 2);
            if !self.cell(x, y).is_wall() {
                return (x, y);
            }
        }
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.cols + x]
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y * self.cols + x] = cell;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at column `x`, row `y`; coordinates are clamped into the grid.
    pub fn get(&self, x: i64, y: i64) -> Cell {
        let x = x.clamp(0, self.cols as i64 - 1) as usize;
        let y = y.clamp(0, self.rows as i64 - 1) as usize;
        self.cell(x, y)
    }

    /// (column, row) of the start cell.
    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    /// (column, row) of the end cell.
    pub fn end(&self) -> (usize, usize) {
        self.end
    }

    /// Every non-wall cell.
    pub fn passage_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_wall()).count()
    }

    /// (column, row) of every wall cell, row by row.
    pub fn wall_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_wall())
            .map(|(i, _)| (i % self.cols, i / self.cols))
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
