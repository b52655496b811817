//! Property tests for the compressed layout of a multi-grid.

use std::collections::HashMap;

use multi_grid::grid::{GridShape, MultiGrid};
use multi_grid::grid_error::MultiGridError;
use proptest::prelude::*;

const EXTENTS: [usize; 3] = [3, 4, 2];

fn entries() -> impl Strategy<Value = Vec<([usize; 3], u32)>> {
    prop::collection::vec(
        ((0..EXTENTS[0], 0..EXTENTS[1], 0..EXTENTS[2]), any::<u32>())
            .prop_map(|((x, y, z), v)| ([x, y, z], v)),
        0..200,
    )
}

fn filled(entries: &[([usize; 3], u32)]) -> MultiGrid<3, u32> {
    let mut g = MultiGrid::new(EXTENTS, entries.len() / 2).unwrap();
    for &(cell, v) in entries {
        g.add(cell, v).unwrap();
    }
    g
}

fn expected_buckets(entries: &[([usize; 3], u32)]) -> HashMap<[usize; 3], Vec<u32>> {
    let mut m: HashMap<_, Vec<u32>> = HashMap::new();
    for &(cell, v) in entries {
        m.entry(cell).or_default().push(v);
    }
    for bucket in m.values_mut() {
        bucket.sort_unstable();
    }
    m
}

proptest! {
    #[test]
    fn counts_and_starts_form_prefix_sum(entries in entries()) {
        let mut g = filled(&entries);
        g.compress();
        let layout = g.layout().unwrap();
        let counts = layout.counts();
        let starts = layout.starts();
        prop_assert_eq!(counts.iter().sum::<usize>(), entries.len());
        let mut acc = 0;
        for c in 0..layout.num_cells() {
            prop_assert_eq!(starts[c], acc);
            acc += counts[c];
        }
        let last = layout.num_cells() - 1;
        prop_assert_eq!(starts[last] + counts[last], layout.data().len());
    }

    #[test]
    fn compressed_data_is_permutation_of_raw(entries in entries()) {
        let mut g = filled(&entries);
        g.compress();
        let mut data = g.compressed_data().unwrap().to_vec();
        let mut raw: Vec<u32> = entries.iter().map(|&(_, v)| v).collect();
        data.sort_unstable();
        raw.sort_unstable();
        prop_assert_eq!(data, raw);
    }

    #[test]
    fn every_cell_holds_exactly_its_items(entries in entries()) {
        let mut g = filled(&entries);
        g.compress();
        let expected = expected_buckets(&entries);
        for cell in g.shape().cells() {
            let mut got = g.enumerate(&cell).unwrap().to_vec();
            got.sort_unstable();
            let want = expected.get(&cell).cloned().unwrap_or_default();
            prop_assert_eq!(g.cell_len(&cell).unwrap(), want.len());
            prop_assert_eq!(got, want);
        }
    }

    #[test]
    fn compress_twice_is_same_as_once(entries in entries()) {
        let mut g = filled(&entries);
        g.compress();
        let data = g.compressed_data().unwrap().to_vec();
        let starts = g.layout().unwrap().starts().to_vec();
        g.compress();
        prop_assert_eq!(g.compressed_data().unwrap(), data.as_slice());
        prop_assert_eq!(g.layout().unwrap().starts(), starts.as_slice());
    }

    #[test]
    fn clear_then_compress_is_empty(entries in entries()) {
        let mut g = filled(&entries);
        g.compress();
        g.clear();
        g.compress();
        for cell in g.shape().cells() {
            prop_assert!(g.enumerate(&cell).unwrap().is_empty());
        }
    }

    #[test]
    fn mutation_after_compress_blocks_queries(entries in entries(), v in any::<u32>()) {
        let mut g = filled(&entries);
        prop_assert_eq!(g.enumerate(&[0, 0, 0]).unwrap_err(), MultiGridError::NotCompressed);
        g.compress();
        prop_assert!(g.enumerate(&[0, 0, 0]).is_ok());
        g.add([2, 3, 1], v).unwrap();
        prop_assert_eq!(g.enumerate(&[0, 0, 0]).unwrap_err(), MultiGridError::NotCompressed);
        g.compress();
        g.clear();
        prop_assert_eq!(g.enumerate(&[0, 0, 0]).unwrap_err(), MultiGridError::NotCompressed);
    }

    #[test]
    fn linearize_is_bijective(nx in 1usize..6, ny in 1usize..6, nz in 1usize..6) {
        let shape = GridShape::new([nx, ny, nz]).unwrap();
        let mut seen = vec![false; shape.num_cells()];
        for cell in shape.cells() {
            let id = shape.try_linearize(&cell).unwrap();
            prop_assert!(id < shape.num_cells());
            prop_assert!(!seen[id]);
            seen[id] = true;
            prop_assert_eq!(shape.delinearize(id).unwrap(), cell);
        }
        prop_assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn neighborhood_matches_brute_force(
        entries in entries(),
        cx in 0..EXTENTS[0], cy in 0..EXTENTS[1], cz in 0..EXTENTS[2],
        radius in 0usize..3,
    ) {
        let mut g = filled(&entries);
        g.compress();
        let center = [cx, cy, cz];
        let mut got: Vec<u32> = g.neighborhood(&center, radius).unwrap().copied().collect();
        let mut want: Vec<u32> = entries
            .iter()
            .filter(|(cell, _)| cell.iter().zip(&center).all(|(&a, &b)| a.abs_diff(b) <= radius))
            .map(|&(_, v)| v)
            .collect();
        got.sort_unstable();
        want.sort_unstable();
        prop_assert_eq!(got, want);
    }
}
