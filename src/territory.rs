//! Claimed territory with viewport queries.
//!
//! Accumulates the cells captured by one player and keeps an R-tree of
//! their centers so a map layer can fetch just the visible cells.

use std::collections::HashSet;

use rstar::{RTree, RTreeObject, AABB};

use crate::{Bounds, CellId, Grid, LoopResult};

/// A claimed cell center for R-tree indexing.
#[derive(Debug, Clone)]
pub struct ClaimedCell {
    pub cell_id: CellId,
    pub lat: f64,
    pub lng: f64,
}

impl RTreeObject for ClaimedCell {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lng, self.lat])
    }
}

/// Set of claimed cells plus a spatial index over them.
#[derive(Debug)]
pub struct Territory {
    grid: Grid,
    cells: HashSet<CellId>,
    tree: RTree<ClaimedCell>,
}

impl Territory {
    /// Create an empty territory on a grid of `grid_size` degrees.
    pub fn new(grid_size: f64) -> Self {
        Self {
            grid: Grid::new(grid_size),
            cells: HashSet::new(),
            tree: RTree::new(),
        }
    }

    /// Add the cells of a capture. Returns the cells that were not owned yet.
    pub fn claim(&mut self, result: &LoopResult) -> Vec<CellId> {
        let mut fresh = Vec::new();
        for id in &result.enclosed_cell_ids {
            if self.cells.contains(id) {
                continue;
            }
            // Identifiers from a different grid cannot be placed; keep them
            // in the set but out of the index.
            if let Some(index) = self.grid.parse_cell_id(id.as_str()) {
                let center = self.grid.center(index);
                self.tree.insert(ClaimedCell {
                    cell_id: id.clone(),
                    lat: center.latitude,
                    lng: center.longitude,
                });
            }
            self.cells.insert(id.clone());
            fresh.push(id.clone());
        }
        fresh
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.cells.contains(id)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &HashSet<CellId> {
        &self.cells
    }

    /// Claimed cells whose center lies within a viewport.
    pub fn cells_in_viewport(&self, bounds: &Bounds) -> Vec<CellId> {
        let search_bounds = AABB::from_corners(
            [bounds.min_lng, bounds.min_lat],
            [bounds.max_lng, bounds.max_lat],
        );

        self.tree
            .locate_in_envelope(&search_bounds)
            .map(|c| c.cell_id.clone())
            .collect()
    }

    /// Forget every claimed cell.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.tree = RTree::new();
    }
}
