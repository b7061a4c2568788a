use ndarray::Array2;

use crate::*;

/// Number of mines among the (up to 8) neighbors of `coords`.
pub fn count_adjacent_mines(truth: &Array2<Truth>, coords: Coord2) -> u8 {
    truth
        .iter_neighbors(coords)
        .filter(|&pos| truth[pos.to_nd_index()].is_mine())
        .count() as u8
}

/// Computes the count of every non-mine cell, once the mines are in place.
pub(crate) fn fill_counts(truth: &mut Array2<Truth>) {
    let (width, height) = truth.grid_size();
    for y in 0..height {
        for x in 0..width {
            let coords = (x, y);
            if truth[coords.to_nd_index()].is_mine() {
                continue;
            }
            let count = count_adjacent_mines(truth, coords);
            truth[coords.to_nd_index()] = Truth::SafeCount(count);
        }
    }
}
