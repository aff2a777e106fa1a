//! Uniform grid used to prune garden pairs beyond flight range.
//!
//! Cells are one search extent wide on each axis, so every garden within range
//! of a point lies in the 3×3 block of cells around it.

use std::collections::HashMap;

use crate::garden::Garden;

// Widens cells by a hair so points exactly one extent apart never land two
// cells apart after floating-point division.
const CELL_PADDING: f64 = 1.0 + 1e-9;

const NEIGHBOURHOOD: [(i64, i64); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

type Cell = (i64, i64);

#[derive(Debug)]
pub(super) struct GridIndex {
    cells: Vec<Cell>,
    buckets: HashMap<Cell, Vec<usize>>,
}

impl GridIndex {
    /// Buckets `gardens` into cells of `(lat_extent, lng_extent)` degrees.
    pub(super) fn new(gardens: &[Garden], (lat_extent, lng_extent): (f64, f64)) -> Self {
        let lat_cell = lat_extent * CELL_PADDING;
        let lng_cell = lng_extent * CELL_PADDING;
        let mut buckets: HashMap<Cell, Vec<usize>> = HashMap::new();
        let cells = gardens
            .iter()
            .enumerate()
            .map(|(index, garden)| {
                let point = garden.coordinates();
                let cell = (
                    (point.latitude() / lat_cell).floor() as i64,
                    (point.longitude() / lng_cell).floor() as i64,
                );
                buckets.entry(cell).or_default().push(index);
                cell
            })
            .collect();
        Self { cells, buckets }
    }

    /// Yields every garden index greater than `index` that shares the 3×3
    /// neighbourhood of `index`'s cell.
    pub(super) fn candidates(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let (row, col) = self.cells[index];
        NEIGHBOURHOOD
            .iter()
            .filter_map(move |(dr, dc)| {
                self.buckets
                    .get(&(row.saturating_add(*dr), col.saturating_add(*dc)))
            })
            .flatten()
            .copied()
            .filter(move |&other| other > index)
    }

    pub(super) fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garden(id: &str, latitude: f64, longitude: f64) -> Garden {
        Garden::new(id, latitude, longitude, 0.0, "").expect("valid test garden")
    }

    #[test]
    fn candidates_cover_adjacent_cells_only() {
        let gardens = vec![
            garden("a", 40.000, -111.000),
            garden("b", 40.009, -111.000),
            garden("c", 40.030, -111.000),
            garden("d", 39.995, -111.005),
        ];
        let index = GridIndex::new(&gardens, (0.01, 0.01));
        let mut from_a: Vec<_> = index.candidates(0).collect();
        from_a.sort_unstable();
        assert_eq!(from_a, vec![1, 3]);
        assert_eq!(index.candidates(3).count(), 0);
    }

    #[test]
    fn identical_points_share_a_bucket() {
        let gardens = vec![garden("a", 10.0, 10.0), garden("b", 10.0, 10.0)];
        let index = GridIndex::new(&gardens, (0.5, 0.5));
        assert_eq!(index.occupied_cells(), 1);
        assert_eq!(index.candidates(0).collect::<Vec<_>>(), vec![1]);
    }
}
