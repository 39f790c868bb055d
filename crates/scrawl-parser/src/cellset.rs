//! Ordered sets of grid cells and their boundary topology.
//!
//! A [`CellSet`] is the unit the reconstructor works in: every candidate
//! boundary, every flood-filled region and every piece split off a mixed
//! boundary is one. Sets iterate in row-major order, so "the first cell"
//! of a set is always the top-most, left-most one.
//!
//! # Topology
//!
//! [`CellSet::topology`] decides whether a boundary is an open polyline, a
//! closed ring, or a mix of both. Two methods are tried in turn:
//!
//! 1. **Trace.** Walk the set's cells in isolation from a line end (or any
//!    cell if there is none). Running out of continuations means
//!    [`Topology::Open`]; returning to the start means [`Topology::Closed`].
//!    A fork is inconclusive.
//! 2. **Fill.** Render the set into a scratch abstraction grid with a blank
//!    margin and flood the outside. Any blank pixel the flood cannot reach
//!    is an enclosed area, which makes the set [`Topology::Mixed`];
//!    otherwise it is [`Topology::Open`].
//!
//! The result is memoised against a revision counter that every mutation
//! bumps, so a cached answer never outlives the contents it describes.

use std::{
    cell::Cell as MemoSlot,
    collections::{BTreeSet, btree_set},
    fmt,
};

use log::trace;

use scrawl_core::cell::Cell;

use crate::{abstraction::AbstractionGrid, error::GeometryError, grid::TextGrid};

/// Shape of a boundary once traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// A polyline with ends.
    Open,
    /// A ring enclosing an area.
    Closed,
    /// Rings with polylines attached.
    Mixed,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

/// Inclusive cell bounds of a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellBounds {
    min: Cell,
    max: Cell,
}

impl CellBounds {
    pub fn min(self) -> Cell {
        self.min
    }

    pub fn max(self) -> Cell {
        self.max
    }

    /// Number of columns covered.
    pub fn width(self) -> usize {
        usize::try_from(self.max.x() - self.min.x() + 1).unwrap_or(0)
    }

    /// Number of rows covered.
    pub fn height(self) -> usize {
        usize::try_from(self.max.y() - self.min.y() + 1).unwrap_or(0)
    }
}

/// An ordered set of cells with a memoised topology.
///
/// Equality and cloning consider the cells only.
///
/// # Examples
///
/// ```
/// use scrawl_core::cell::Cell;
/// use scrawl_parser::cellset::CellSet;
///
/// let mut set: CellSet = [Cell::new(3, 1), Cell::new(1, 2)].into_iter().collect();
/// set.add(Cell::new(0, 1));
/// assert_eq!(set.first(), Some(Cell::new(0, 1)));
/// assert_eq!(set.len(), 3);
/// ```
#[derive(Default)]
pub struct CellSet {
    cells: BTreeSet<Cell>,
    revision: u64,
    topology: MemoSlot<Option<(u64, Topology)>>,
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Iterates in row-major order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// The top-most, left-most cell.
    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Inserts a cell; returns whether it was new.
    pub fn add(&mut self, cell: Cell) -> bool {
        self.touch();
        self.cells.insert(cell)
    }

    /// Removes a cell; returns whether it was present.
    pub fn remove(&mut self, cell: Cell) -> bool {
        self.touch();
        self.cells.remove(&cell)
    }

    /// Adds every cell of `other`.
    pub fn add_all(&mut self, other: &CellSet) {
        self.extend(other.iter());
    }

    /// Removes every cell of `other`.
    pub fn subtract(&mut self, other: &CellSet) {
        self.touch();
        for cell in other.iter() {
            self.cells.remove(&cell);
        }
    }

    /// Whether the sets share at least one cell.
    pub fn has_common_cells(&self, other: &CellSet) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().any(|cell| large.contains(cell))
    }

    /// Returns a copy shifted by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> CellSet {
        self.iter().map(|cell| cell.offset(dx, dy)).collect()
    }

    /// Inclusive bounds, or `None` for an empty set.
    pub fn bounds(&self) -> Option<CellBounds> {
        let first = self.first()?;
        let seed = CellBounds {
            min: first,
            max: first,
        };
        Some(self.iter().fold(seed, |bounds, cell| CellBounds {
            min: Cell::new(bounds.min.x().min(cell.x()), bounds.min.y().min(cell.y())),
            max: Cell::new(bounds.max.x().max(cell.x()), bounds.max.y().max(cell.y())),
        }))
    }

    /// Classifies the set as a boundary drawn on `grid`.
    ///
    /// Sets of zero or one cell are open. The answer is cached until the
    /// set next changes.
    ///
    /// # Errors
    ///
    /// Returns an error when a cell cannot be traced or the scratch grid
    /// has nothing to flood.
    pub fn topology(&self, grid: &TextGrid) -> Result<Topology, GeometryError> {
        if let Some((revision, topology)) = self.topology.get() {
            if revision == self.revision {
                return Ok(topology);
            }
        }

        let topology = match self.first() {
            None => Topology::Open,
            Some(_) if self.len() == 1 => Topology::Open,
            Some(_) => match self.trace_topology(grid)? {
                Some(topology) => topology,
                None => self.fill_topology(grid)?,
            },
        };
        self.topology.set(Some((self.revision, topology)));
        Ok(topology)
    }

    /// Walks the set in isolation. `None` means the walk forked.
    fn trace_topology(&self, grid: &TextGrid) -> Result<Option<Topology>, GeometryError> {
        let work = grid.isolate(self);
        let Some(start) = self
            .iter()
            .find(|&cell| work.is_lines_end(cell))
            .or_else(|| self.first())
        else {
            return Ok(Some(Topology::Open));
        };

        let mut previous = start;
        let mut next = work.follow_cell(start, None)?;
        let Some(mut cell) = next.first() else {
            return Ok(Some(Topology::Open));
        };

        for _ in 0..=self.len() {
            next = work.follow_cell(cell, Some(previous))?;
            match next.len() {
                0 => return Ok(Some(Topology::Open)),
                1 => {
                    previous = cell;
                    cell = next.first().unwrap_or(start);
                    if cell == start {
                        return Ok(Some(Topology::Closed));
                    }
                }
                _ => return Ok(None),
            }
        }
        Ok(None)
    }

    /// Floods the outside of the set drawn at three times resolution.
    fn fill_topology(&self, grid: &TextGrid) -> Result<Topology, GeometryError> {
        let Some(bounds) = self.bounds() else {
            return Ok(Topology::Open);
        };
        let origin = bounds.min().offset(-1, -1);
        let sub = grid.sub_grid(origin, bounds.width() + 2, bounds.height() + 2);
        let local = self.translated(-origin.x(), -origin.y());

        let mut pixels = AbstractionGrid::new(&sub, &local).into_text_grid();
        let seed = pixels
            .cells()
            .find(|&pixel| pixels.is_blank(pixel))
            .ok_or(GeometryError::NoFillableCell { cell: bounds.min() })?;
        pixels.flood_fill(seed, '*');

        trace!(cell:% = bounds.min(); "Flooded boundary for topology:\n{pixels}");
        if pixels.has_blank_cells() {
            Ok(Topology::Mixed)
        } else {
            Ok(Topology::Open)
        }
    }

    /// Splits the set into its 4-connected components.
    pub fn connected_components(&self) -> Vec<CellSet> {
        let Some(bounds) = self.bounds() else {
            return Vec::new();
        };
        let width = usize::try_from(bounds.max().x() + 2).unwrap_or(0);
        let height = usize::try_from(bounds.max().y() + 2).unwrap_or(0);
        let mut grid = TextGrid::new(width, height);
        grid.fill_cells(self, '*');

        let mut components = Vec::new();
        for cell in self.iter() {
            if !grid.is_blank(cell) {
                components.push(grid.flood_fill(cell, ' '));
            }
        }
        components
    }

    /// The set together with the area it encloses.
    ///
    /// Open sets are returned as they are. For other sets the enclosed area
    /// is flooded from the first cell found whose east and west neighbours
    /// are both blank, starting at its east neighbour. When no such cell
    /// exists the set is returned unchanged.
    ///
    /// # Errors
    ///
    /// Propagates topology errors.
    pub fn filled_equivalent(&self, grid: &TextGrid) -> Result<CellSet, GeometryError> {
        if self.topology(grid)? == Topology::Open {
            return Ok(self.clone());
        }
        let Some(bounds) = self.bounds() else {
            return Ok(self.clone());
        };
        let width = usize::try_from(bounds.max().x() + 2).unwrap_or(0);
        let height = usize::try_from(bounds.max().y() + 2).unwrap_or(0);
        let mut scratch = TextGrid::new(width, height);
        scratch.fill_cells(self, '*');

        let inside = scratch.cells().find(|&cell| {
            !scratch.is_blank(cell) && scratch.is_blank(cell.east()) && scratch.is_blank(cell.west())
        });
        let Some(inside) = inside else {
            return Ok(self.clone());
        };
        scratch.flood_fill(inside.east(), '*');
        Ok(scratch.non_blank_cells())
    }
}

impl Clone for CellSet {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            revision: self.revision,
            topology: MemoSlot::new(self.topology.get()),
        }
    }
}

impl PartialEq for CellSet {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for CellSet {}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.cells.iter()).finish()
    }
}

/// Draws the set as `*` on a blank grid just large enough to hold it.
impl fmt::Display for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(bounds) = self.bounds() else {
            return writeln!(f, "(empty)");
        };
        for y in bounds.min().y()..=bounds.max().y() {
            let row: String = (bounds.min().x()..=bounds.max().x())
                .map(|x| if self.contains(Cell::new(x, y)) { '*' } else { ' ' })
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Extend<Cell> for CellSet {
    fn extend<I: IntoIterator<Item = Cell>>(&mut self, iter: I) {
        self.touch();
        self.cells.extend(iter);
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = &'a Cell;
    type IntoIter = btree_set::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Removes later sets equal to an earlier one, keeping first occurrences.
pub fn remove_duplicate_sets(sets: Vec<CellSet>) -> Vec<CellSet> {
    let mut unique: Vec<CellSet> = Vec::with_capacity(sets.len());
    for set in sets {
        if !unique.contains(&set) {
            unique.push(set);
        }
    }
    unique
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn cell_set_strategy() -> impl Strategy<Value = CellSet> {
        prop::collection::vec((0i32..6, 0i32..6), 0..6)
            .prop_map(|cells| cells.into_iter().map(|(x, y)| Cell::new(x, y)).collect())
    }

    /// Deduplicating twice changes nothing more than deduplicating once.
    fn check_dedup_is_idempotent(sets: Vec<CellSet>) -> Result<(), TestCaseError> {
        let once = remove_duplicate_sets(sets);
        let twice = remove_duplicate_sets(once.clone());
        prop_assert_eq!(once, twice);
        Ok(())
    }

    /// Every input set survives deduplication as some equal set.
    fn check_dedup_keeps_every_set(sets: Vec<CellSet>) -> Result<(), TestCaseError> {
        let unique = remove_duplicate_sets(sets.clone());
        for set in &sets {
            prop_assert!(unique.contains(set));
        }
        for (i, a) in unique.iter().enumerate() {
            for b in &unique[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
        Ok(())
    }

    /// Components partition the set.
    fn check_components_partition(set: CellSet) -> Result<(), TestCaseError> {
        let components = set.connected_components();
        let mut union = CellSet::new();
        let mut total = 0;
        for component in &components {
            total += component.len();
            union.add_all(component);
        }
        prop_assert_eq!(total, set.len());
        prop_assert_eq!(union, set);
        Ok(())
    }

    proptest! {
        #[test]
        fn dedup_is_idempotent(sets in prop::collection::vec(cell_set_strategy(), 0..8)) {
            check_dedup_is_idempotent(sets)?;
        }

        #[test]
        fn dedup_keeps_every_set(sets in prop::collection::vec(cell_set_strategy(), 0..8)) {
            check_dedup_keeps_every_set(sets)?;
        }

        #[test]
        fn components_partition(set in cell_set_strategy()) {
            check_components_partition(set)?;
        }
    }
}
