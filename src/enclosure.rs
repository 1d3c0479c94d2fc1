//! Polygon-to-grid enclosure.
//!
//! A cell is enclosed when its center lies inside the polygon under the
//! even-odd rule. [`enclosed_cells`] computes this with one horizontal
//! scanline per grid row; [`enclosed_cells_by_containment`] tests every cell
//! center in the bounding box and exists to cross-check the scanline.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use geo::Contains;
use log::warn;

use crate::simplify::simplify;
use crate::{Bounds, CellId, GpsPoint, Grid, GridIndex, Polygon, TerritoryConfig};

/// A ring ready for scanning, with the inclusive grid ranges covering it.
struct Scan {
    ring: Vec<GpsPoint>,
    rows: RangeInclusive<i64>,
    cols: RangeInclusive<i64>,
}

/// Re-simplify the ring and compute the grid ranges it covers.
///
/// Returns `None` when the ring is degenerate or spans more than
/// `config.max_scan_rows` grid rows.
fn prepare(polygon: &Polygon, grid: &Grid, config: &TerritoryConfig) -> Option<Scan> {
    if polygon.len() < 3 {
        return None;
    }

    let ring = simplify(polygon.points(), config.enclosure_tolerance());
    if ring.len() < 3 {
        return None;
    }

    let bounds = Bounds::from_points(&ring)?;
    let rows = (bounds.min_lat / grid.size()).floor() as i64..=(bounds.max_lat / grid.size()).ceil() as i64;
    let cols = (bounds.min_lng / grid.size()).floor() as i64..=(bounds.max_lng / grid.size()).ceil() as i64;

    let row_count = span_len(&rows);
    if row_count > config.max_scan_rows as u64 {
        warn!(
            "[Enclosure] Polygon spans {} grid rows (cap {}), skipping",
            row_count, config.max_scan_rows
        );
        return None;
    }

    Some(Scan { ring, rows, cols })
}

fn span_len(range: &RangeInclusive<i64>) -> u64 {
    range.end().abs_diff(*range.start()) + 1
}

/// Longitudes where the latitude line `y` crosses the ring, sorted ascending.
///
/// An edge counts when its endpoints lie on opposite sides of `y` with the
/// half-open rule `(a > y) != (b > y)`, so a vertex exactly on the line is
/// counted once.
fn scanline_crossings(ring: &[GpsPoint], y: f64) -> Vec<f64> {
    let mut xs: Vec<f64> = ring
        .windows(2)
        .filter(|e| (e[0].latitude > y) != (e[1].latitude > y))
        .map(|e| {
            let (a, b) = (&e[0], &e[1]);
            a.longitude + (y - a.latitude) * (b.longitude - a.longitude) / (b.latitude - a.latitude)
        })
        .collect();
    xs.sort_by(f64::total_cmp);
    xs
}

/// Grid indices of every cell whose center lies inside the polygon.
pub fn enclosed_indices(polygon: &Polygon, config: &TerritoryConfig) -> HashSet<GridIndex> {
    let grid = Grid::new(config.grid_size);
    let Some(scan) = prepare(polygon, &grid, config) else {
        return HashSet::new();
    };

    let mut cells = HashSet::new();
    for row in scan.rows {
        let y = row as f64 * grid.size();
        let crossings = scanline_crossings(&scan.ring, y);

        for span in crossings.chunks_exact(2) {
            let col_start = (span[0] / grid.size()).ceil() as i64;
            let col_end = (span[1] / grid.size()).floor() as i64;
            for col in col_start..=col_end {
                cells.insert(GridIndex { row, col });
            }
        }
    }
    cells
}

/// Identifiers of every cell whose center lies inside the polygon.
///
/// Returns an empty set for degenerate polygons and for polygons spanning
/// more than `config.max_scan_rows` grid rows; the column span is not capped.
/// Iteration order is unspecified.
pub fn enclosed_cells(polygon: &Polygon, config: &TerritoryConfig) -> HashSet<CellId> {
    let grid = Grid::new(config.grid_size);
    enclosed_indices(polygon, config)
        .into_iter()
        .map(|index| grid.cell_id_for_index(index))
        .collect()
}

/// Brute-force enclosure: test every cell center in the bounding box with a
/// point-in-polygon check.
///
/// Agrees with [`enclosed_cells`] for any simple polygon whose edges do not
/// pass exactly through a cell center, as long as the polygon also spans at
/// most `config.max_scan_rows` grid columns (otherwise this returns empty).
pub fn enclosed_cells_by_containment(
    polygon: &Polygon,
    config: &TerritoryConfig,
) -> HashSet<CellId> {
    let grid = Grid::new(config.grid_size);
    let Some(scan) = prepare(polygon, &grid, config) else {
        return HashSet::new();
    };
    // Every cell of the bounding box is tested, so columns are capped here too.
    let col_count = span_len(&scan.cols);
    if col_count > config.max_scan_rows as u64 {
        warn!(
            "[Enclosure] Containment scan spans {} grid columns (cap {}), skipping",
            col_count, config.max_scan_rows
        );
        return HashSet::new();
    }
    let Some(shape) = Polygon::clean(&scan.ring, config.dedup_epsilon).map(|p| p.to_geo()) else {
        return HashSet::new();
    };

    let mut cells = HashSet::new();
    for row in scan.rows {
        for col in scan.cols.clone() {
            let index = GridIndex { row, col };
            let center = grid.center(index);
            if shape.contains(&geo::Point::new(center.longitude, center.latitude)) {
                cells.insert(grid.cell_id_for_index(index));
            }
        }
    }
    cells
}
