//! Boundary reconstruction: from boundary cells to open and closed sets.
//!
//! [`find_boundaries`] runs the first half of the pipeline over a work grid
//! whose type-on-line glyphs and point markers have already been replaced:
//!
//! 1. Split all boundary cells into coarse groups with the abstraction grid.
//! 2. Flood every unclaimed pixel region of each group and collect the lit
//!    pixels it runs into. Each region's wall, scaled back to cells, is one
//!    candidate boundary. A fill buffer per group records claimed pixels.
//! 3. Drop duplicate candidates.
//! 4. Classify what is left as open, closed or mixed.
//! 5. Resolve mixed sets, either by subtracting the closed sets or, when
//!    there are none, by tracing away the lines that hang off them.
//! 6. Drop closed sets whose filled area is exactly covered by others.
//!
//! A set whose classification fails does not stop the run; it is reported
//! as a [`MalformedShape`].

use std::collections::BTreeSet;

use log::{debug, trace, warn};

use scrawl_core::cell::Cell;

use crate::{
    abstraction::{AbstractionGrid, scaled_down},
    cellset::{CellSet, Topology, remove_duplicate_sets},
    error::{GeometryError, MalformedShape},
    grid::TextGrid,
};

const LIT: char = '*';
const CLAIMED_REGION: char = '*';
const CLAIMED_WALL: char = '-';
const VISITED: char = '.';

/// Boundary sets ready to become shapes.
#[derive(Debug, Default)]
pub struct Boundaries {
    pub open: Vec<CellSet>,
    pub closed: Vec<CellSet>,
    pub malformed: Vec<MalformedShape>,
}

/// Finds every open and closed boundary drawn on `work`.
pub fn find_boundaries(work: &TextGrid) -> Boundaries {
    let all = work.boundary_cells();
    let groups = AbstractionGrid::new(work, &all).distinct_shapes();
    debug!(cells = all.len(), groups = groups.len(); "Split boundary cells into coarse groups");

    let mut candidates = Vec::new();
    for group in &groups {
        candidates.extend(walls_of_group(work, group));
    }
    let candidates = remove_duplicate_sets(candidates);
    debug!(candidates = candidates.len(); "Collected candidate boundaries");

    let mut malformed = Vec::new();
    let mut sets = categorize(candidates, work, &mut malformed);

    let has_mixed = sets.iter().any(|(_, topology)| *topology == Topology::Mixed);
    if has_mixed {
        let has_closed = sets.iter().any(|(_, topology)| *topology == Topology::Closed);
        let resolved = if has_closed {
            subtract_closed_from_mixed(sets, work)
        } else {
            break_mixed_sets(sets, work, &mut malformed)
        };
        // Inside and outside views of one ring leave the same residue.
        sets = categorize(remove_duplicate_sets(resolved), work, &mut malformed);
    }

    let mut boundaries = Boundaries::default();
    for (set, topology) in sets {
        match topology {
            Topology::Open => boundaries.open.push(set),
            Topology::Closed => boundaries.closed.push(set),
            Topology::Mixed => {
                let cell = set.first().unwrap_or_default();
                warn!(cell:% = cell; "Dropping boundary that mixes open and closed parts");
                boundaries
                    .malformed
                    .push(MalformedShape::new(GeometryError::UnresolvedMixed { cell }));
            }
        }
    }
    boundaries.closed = remove_obsolete_shapes(work, boundaries.closed);
    malformed.append(&mut boundaries.malformed);
    boundaries.malformed = malformed;

    debug!(
        open = boundaries.open.len(),
        closed = boundaries.closed.len(),
        malformed = boundaries.malformed.len();
        "Boundary processing complete"
    );
    boundaries
}

/// Every wall a flood fill of `group` runs into, scaled to cells.
fn walls_of_group(work: &TextGrid, group: &CellSet) -> Vec<CellSet> {
    let pristine = AbstractionGrid::new(work, group).into_text_grid();
    let mut fill_buffer = TextGrid::new(pristine.width(), pristine.height());
    let mut walls = Vec::new();

    let seeds: Vec<Cell> = pristine.cells().collect();
    for seed in seeds {
        if !fill_buffer.is_blank(seed) || !pristine.is_blank(seed) {
            continue;
        }
        let mut scratch = pristine.clone();
        let (region, wall) = expand_from(&mut scratch, seed);
        fill_buffer.fill_cells(&region, CLAIMED_REGION);
        if wall.is_empty() {
            continue;
        }
        fill_buffer.fill_cells(&wall, CLAIMED_WALL);
        let cells = scaled_down(&wall);
        trace!(seed:% = seed; "Boundary found by flooding:\n{cells}");
        walls.push(cells);
    }
    walls
}

/// Floods the blank region around `seed`, returning the region and the
/// lit pixels bordering it.
fn expand_from(pixels: &mut TextGrid, seed: Cell) -> (CellSet, CellSet) {
    let mut region = CellSet::new();
    let mut wall = CellSet::new();
    let mut stack = vec![seed];
    while let Some(pixel) = stack.pop() {
        if !pixels.is_blank(pixel) {
            continue;
        }
        pixels.set(pixel, VISITED);
        region.add(pixel);
        for neighbour in pixel.neighbours() {
            match pixels.get(neighbour) {
                Some(' ') => stack.push(neighbour),
                Some(LIT) => {
                    wall.add(neighbour);
                }
                _ => {}
            }
        }
    }
    (region, wall)
}

/// Pairs every set with its topology. Sets that cannot be classified are
/// reported and dropped.
pub fn categorize(
    sets: Vec<CellSet>,
    work: &TextGrid,
    malformed: &mut Vec<MalformedShape>,
) -> Vec<(CellSet, Topology)> {
    let mut categorized = Vec::with_capacity(sets.len());
    for set in sets {
        match set.topology(work) {
            Ok(topology) => {
                trace!(topology:% = topology; "Categorized boundary:\n{set}");
                categorized.push((set, topology));
            }
            Err(err) => {
                warn!(cell:% = err.cell(), err:% = err; "Dropping boundary that cannot be classified");
                malformed.push(MalformedShape::new(err));
            }
        }
    }
    categorized
}

/// Removes every closed set's cells from each mixed set. A mixed set left
/// open is replaced by its distinct pieces; any other keeps its remainder.
fn subtract_closed_from_mixed(sets: Vec<(CellSet, Topology)>, work: &TextGrid) -> Vec<CellSet> {
    let closed: Vec<CellSet> = sets
        .iter()
        .filter(|(_, topology)| *topology == Topology::Closed)
        .map(|(set, _)| set.clone())
        .collect();

    let mut kept = Vec::with_capacity(sets.len());
    let mut pieces = Vec::new();
    for (mut set, topology) in sets {
        if topology != Topology::Mixed {
            kept.push(set);
            continue;
        }
        for closed_set in &closed {
            set.subtract(closed_set);
        }
        if set.topology(work) == Ok(Topology::Open) {
            pieces.extend(
                AbstractionGrid::new(work, &set)
                    .distinct_shapes()
                    .into_iter()
                    .filter(|piece| !piece.is_empty()),
            );
        } else {
            kept.push(set);
        }
    }
    kept.extend(pieces);
    kept
}

fn break_mixed_sets(
    sets: Vec<(CellSet, Topology)>,
    work: &TextGrid,
    malformed: &mut Vec<MalformedShape>,
) -> Vec<CellSet> {
    let mut kept = Vec::with_capacity(sets.len());
    let mut pieces = Vec::new();
    for (set, topology) in sets {
        if topology != Topology::Mixed {
            kept.push(set);
            continue;
        }
        match break_truly_mixed(&set, work) {
            Ok(broken) => pieces.extend(broken),
            Err(err) => {
                warn!(cell:% = err.cell(), err:% = err; "Dropping mixed boundary that cannot be traced");
                malformed.push(MalformedShape::new(err));
            }
        }
    }
    kept.extend(pieces);
    kept
}

/// Splits a mixed set into the lines hanging off it and what remains.
///
/// A trace starts at every line end not already reached by an earlier
/// trace and stops at the next line end (included), at a dead end
/// (included) or in front of a junction (excluded). Each trace is one
/// piece; the cells no trace covered form the last piece.
///
/// # Errors
///
/// Returns an error when a cell on a trace has no continuation rule.
pub fn break_truly_mixed(set: &CellSet, work: &TextGrid) -> Result<Vec<CellSet>, GeometryError> {
    let isolated = work.isolate(set);
    let mut visited_ends = CellSet::new();
    let mut pieces = Vec::new();

    for start in set.iter() {
        if !isolated.is_lines_end(start) || visited_ends.contains(start) {
            continue;
        }
        let mut path: CellSet = [start].into_iter().collect();
        let mut previous = start;
        let Some(mut cell) = isolated.follow_cell(start, None)?.first() else {
            pieces.push(path);
            continue;
        };

        for _ in 0..set.len() {
            if isolated.is_lines_end(cell) {
                path.add(cell);
                visited_ends.add(cell);
                break;
            }
            let next = isolated.follow_cell(cell, Some(previous))?;
            if next.len() > 1 {
                break;
            }
            path.add(cell);
            let Some(following) = next.first() else {
                break;
            };
            previous = cell;
            cell = following;
        }
        pieces.push(path);
    }

    let mut residual = set.clone();
    for piece in &pieces {
        residual.subtract(piece);
    }
    if !residual.is_empty() {
        pieces.push(residual);
    }
    Ok(pieces)
}

/// Drops closed sets whose filled area is exactly the union of the filled
/// areas of the sets overlapping them.
///
/// Only clusters of three or more overlapping sets are considered.
pub fn remove_obsolete_shapes(work: &TextGrid, sets: Vec<CellSet>) -> Vec<CellSet> {
    let mut filled = Vec::with_capacity(sets.len());
    for set in &sets {
        match set.filled_equivalent(work) {
            Ok(area) => filled.push(area),
            Err(err) => {
                warn!(cell:% = err.cell(), err:% = err; "Skipping obsolete shape removal");
                return sets;
            }
        }
    }

    let mut obsolete = BTreeSet::new();
    for (index, area) in filled.iter().enumerate() {
        let cluster: Vec<usize> = std::iter::once(index)
            .chain(
                filled
                    .iter()
                    .enumerate()
                    .filter(|(other, other_area)| *other != index && area.has_common_cells(other_area))
                    .map(|(other, _)| other),
            )
            .collect();
        if cluster.len() <= 2 {
            continue;
        }

        let largest = cluster
            .iter()
            .copied()
            .fold(index, |largest, other| {
                if filled[other].len() > filled[largest].len() {
                    other
                } else {
                    largest
                }
            });
        let Some(bounds) = filled[largest].bounds() else {
            continue;
        };
        let width = usize::try_from(bounds.max().x() + 2).unwrap_or(0);
        let height = usize::try_from(bounds.max().y() + 2).unwrap_or(0);

        let mut smalls = TextGrid::new(width, height);
        for &other in cluster.iter().filter(|&&other| other != largest) {
            smalls.fill_cells(&filled[other], LIT);
        }
        let mut whole = TextGrid::new(width, height);
        whole.fill_cells(&filled[largest], LIT);

        if smalls == whole {
            obsolete.insert(largest);
        }
    }

    if !obsolete.is_empty() {
        debug!(removed = obsolete.len(); "Removed obsolete closed boundaries");
    }
    sets.into_iter()
        .enumerate()
        .filter(|(index, _)| !obsolete.contains(index))
        .map(|(_, set)| set)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work_grid(source: &str) -> TextGrid {
        let mut grid = TextGrid::load(source, 8);
        grid.replace_type_on_line();
        grid.replace_point_markers_on_line();
        grid
    }

    fn ring(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> CellSet {
        let mut set = CellSet::new();
        for x in min_x..=max_x {
            set.add(Cell::new(x, min_y));
            set.add(Cell::new(x, max_y));
        }
        for y in min_y..=max_y {
            set.add(Cell::new(min_x, y));
            set.add(Cell::new(max_x, y));
        }
        set
    }

    fn row(x0: i32, x1: i32, y: i32) -> CellSet {
        (x0..=x1).map(|x| Cell::new(x, y)).collect()
    }

    #[test]
    fn test_empty_grid_has_no_boundaries() {
        let boundaries = find_boundaries(&work_grid(""));
        assert!(boundaries.open.is_empty());
        assert!(boundaries.closed.is_empty());
        assert!(boundaries.malformed.is_empty());
    }

    #[test]
    fn test_single_box() {
        let boundaries = find_boundaries(&work_grid("+---+\n|   |\n+---+"));
        assert_eq!(boundaries.closed, vec![ring(2, 2, 6, 4)]);
        assert!(boundaries.open.is_empty());
    }

    #[test]
    fn test_two_boxes_sharing_a_wall() {
        let boundaries = find_boundaries(&work_grid("+---+---+\n|   |   |\n+---+---+"));
        assert_eq!(boundaries.closed, vec![ring(2, 2, 6, 4), ring(6, 2, 10, 4)]);
        assert!(boundaries.open.is_empty());
    }

    #[test]
    fn test_line_is_open() {
        let boundaries = find_boundaries(&work_grid("A---->B"));
        assert_eq!(boundaries.open, vec![row(3, 6, 2)]);
        assert!(boundaries.closed.is_empty());
    }

    #[test]
    fn test_box_with_tail_is_split() {
        let boundaries = find_boundaries(&work_grid("+---+\n|   +----\n+---+"));
        assert_eq!(boundaries.closed, vec![ring(2, 2, 6, 4)]);
        assert_eq!(boundaries.open, vec![row(7, 10, 3)]);
        assert!(boundaries.malformed.is_empty());
    }

    #[test]
    fn test_ring_left_by_two_mixed_sets_is_kept_once() {
        let source = "\
+-----+
|  A  |C                 B
+  ---+-------------------
|     |
+-----+";
        let boundaries = find_boundaries(&work_grid(source));

        assert_eq!(boundaries.closed, vec![ring(2, 2, 8, 6)]);
        assert!(boundaries.malformed.is_empty());
    }

    #[test]
    fn test_break_truly_mixed() {
        let work = work_grid("+---+\n|   +----\n+---+");
        let mut set = ring(2, 2, 6, 4);
        set.add_all(&row(7, 10, 3));

        let pieces = break_truly_mixed(&set, &work).unwrap();
        assert_eq!(pieces, vec![row(7, 10, 3), ring(2, 2, 6, 4)]);
    }

    #[test]
    fn test_remove_obsolete_shapes() {
        let work = work_grid("+---+---+\n|   |   |\n+---+---+");
        let left = ring(2, 2, 6, 4);
        let right = ring(6, 2, 10, 4);
        let outer = ring(2, 2, 10, 4);

        let kept = remove_obsolete_shapes(&work, vec![left.clone(), right.clone(), outer]);
        assert_eq!(kept, vec![left, right]);
    }

    #[test]
    fn test_remove_obsolete_shapes_keeps_pairs() {
        let work = work_grid("+---+---+\n|   |   |\n+---+---+");
        let sets = vec![ring(2, 2, 6, 4), ring(6, 2, 10, 4)];
        assert_eq!(remove_obsolete_shapes(&work, sets.clone()), sets);
    }

    #[test]
    fn test_expand_from_collects_wall() {
        let mut pixels = TextGrid::from_rows(&["     ", " *** ", " * * ", " *** ", "     "]);
        let (region, wall) = expand_from(&mut pixels, Cell::new(2, 2));
        assert_eq!(region.len(), 1);
        assert_eq!(wall.len(), 4);
        assert!(!wall.contains(Cell::new(1, 1)));
    }
}
