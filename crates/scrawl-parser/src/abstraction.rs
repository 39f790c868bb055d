//! The three-times-resolution rendering of boundary cells.
//!
//! Each boundary cell is stamped as a 3x3 [`Brush`] that only lights the
//! pixels its glyph actually connects through. At this resolution two boxes
//! that merely touch at a corner no longer share a lit pixel, so a plain
//! 4-connected flood fill tells them apart.

use log::trace;

use scrawl_core::cell::Cell;

use crate::{cellset::CellSet, grid::TextGrid};

/// Scale factor between grid cells and abstraction pixels.
pub const SCALE: i32 = 3;

const LIT: char = '*';

/// A 3x3 pixel stamp, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush([bool; 9]);

impl Brush {
    /// Builds a brush from three rows written as hex digits `0x0` or `0x1`
    /// per pixel, so `0x011` lights the middle and right pixels.
    const fn paint(top: u16, middle: u16, bottom: u16) -> Self {
        let rows = [top, middle, bottom];
        let mut pixels = [false; 9];
        let mut i = 0;
        while i < 9 {
            let row = rows[i / 3];
            let mask: u16 = 0x100 >> (4 * (i % 3) as u32);
            pixels[i] = row & mask != 0;
            i += 1;
        }
        Self(pixels)
    }

    /// Whether pixel `(dx, dy)` of the stamp is lit.
    pub fn is_lit(self, dx: usize, dy: usize) -> bool {
        dx < 3 && dy < 3 && self.0[dy * 3 + dx]
    }

    pub const HORIZONTAL_LINE: Self = Self::paint(0x000, 0x111, 0x000);
    pub const VERTICAL_LINE: Self = Self::paint(0x010, 0x010, 0x010);
    pub const CORNER_1: Self = Self::paint(0x000, 0x011, 0x010);
    pub const CORNER_2: Self = Self::paint(0x000, 0x110, 0x010);
    pub const CORNER_3: Self = Self::paint(0x010, 0x110, 0x000);
    pub const CORNER_4: Self = Self::paint(0x010, 0x011, 0x000);
    pub const T: Self = Self::paint(0x000, 0x111, 0x010);
    pub const INVERSE_T: Self = Self::paint(0x010, 0x111, 0x000);
    pub const K: Self = Self::paint(0x010, 0x011, 0x010);
    pub const INVERSE_K: Self = Self::paint(0x010, 0x110, 0x010);
    pub const CROSS: Self = Self::paint(0x010, 0x111, 0x010);
    pub const STAR: Self = Self::paint(0x111, 0x111, 0x111);
}

type CellCheck = fn(&TextGrid, Cell) -> bool;

/// Brush selection, first match wins.
const BRUSH_TABLE: [(CellCheck, Brush); 13] = [
    (TextGrid::is_cross, Brush::CROSS),
    (TextGrid::is_t, Brush::T),
    (TextGrid::is_k, Brush::K),
    (TextGrid::is_inverse_t, Brush::INVERSE_T),
    (TextGrid::is_inverse_k, Brush::INVERSE_K),
    (TextGrid::is_corner_1, Brush::CORNER_1),
    (TextGrid::is_corner_2, Brush::CORNER_2),
    (TextGrid::is_corner_3, Brush::CORNER_3),
    (TextGrid::is_corner_4, Brush::CORNER_4),
    (TextGrid::is_horizontal_line, Brush::HORIZONTAL_LINE),
    (TextGrid::is_vertical_line, Brush::VERTICAL_LINE),
    (TextGrid::is_cross_on_line, Brush::CROSS),
    (TextGrid::is_star_on_line, Brush::STAR),
];

/// The brush a cell is stamped with, if any.
pub fn brush_for(grid: &TextGrid, cell: Cell) -> Option<Brush> {
    BRUSH_TABLE
        .iter()
        .find(|(check, _)| check(grid, cell))
        .map(|&(_, brush)| brush)
}

/// Boundary cells drawn at three times the grid resolution.
#[derive(Debug, Clone)]
pub struct AbstractionGrid {
    pixels: TextGrid,
}

impl AbstractionGrid {
    /// Stamps every non-blank cell of `cells`, classified against `grid`.
    /// Cells that match no brush leave their pixels dark.
    pub fn new(grid: &TextGrid, cells: &CellSet) -> Self {
        let mut pixels = TextGrid::new(3 * grid.width(), 3 * grid.height());
        for cell in cells.iter() {
            if grid.is_blank_or_outside(cell) {
                continue;
            }
            let Some(brush) = brush_for(grid, cell) else {
                continue;
            };
            for dy in 0..3 {
                for dx in 0..3 {
                    if brush.is_lit(dx, dy) {
                        let pixel = Cell::new(SCALE * cell.x() + dx as i32, SCALE * cell.y() + dy as i32);
                        pixels.set(pixel, LIT);
                    }
                }
            }
        }
        Self { pixels }
    }

    /// The pixel grid; lit pixels hold `*`.
    pub fn pixels(&self) -> &TextGrid {
        &self.pixels
    }

    pub fn into_text_grid(self) -> TextGrid {
        self.pixels
    }

    /// Width in grid cells.
    pub fn width(&self) -> usize {
        self.pixels.width() / 3
    }

    /// Height in grid cells.
    pub fn height(&self) -> usize {
        self.pixels.height() / 3
    }

    /// A grid-resolution copy where a cell is `*` when any of its pixels
    /// is lit.
    pub fn to_cell_grid(&self) -> TextGrid {
        let mut cells = TextGrid::new(self.width(), self.height());
        cells.fill_cells(&scaled_down(&self.pixels.non_blank_cells()), LIT);
        cells
    }

    /// Splits the lit pixels into 4-connected components, each mapped
    /// back to grid cells.
    pub fn distinct_shapes(&self) -> Vec<CellSet> {
        let shapes: Vec<CellSet> = self
            .pixels
            .non_blank_cells()
            .connected_components()
            .iter()
            .map(scaled_down)
            .collect();
        trace!(shapes = shapes.len(); "Split abstraction grid into distinct shapes");
        shapes
    }
}

/// Maps pixels to the cells they belong to.
pub fn scaled_down(pixels: &CellSet) -> CellSet {
    pixels
        .iter()
        .map(|pixel| Cell::new(pixel.x().div_euclid(SCALE), pixel.y().div_euclid(SCALE)))
        .collect()
}
