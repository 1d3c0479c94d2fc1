//! Grid quantization.
//!
//! The coordinate plane is tiled with square cells of `grid_size` degrees.
//! A cell is identified by its quantized center, rendered as a string so it
//! can be used directly as a storage key. Identifiers are always formatted
//! from exact integer indices, so every point that rounds to the same index
//! produces byte-identical output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GpsPoint;

/// Minimum number of fractional digits in a cell identifier.
const MIN_DECIMALS: usize = 7;

/// Separator between the latitude and longitude parts of an identifier.
pub const CELL_SEPARATOR: char = '_';

/// Canonical identifier of one grid cell, e.g. `"51.5073600_-0.1278000"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Exact integer position of a cell: `row` along latitude, `col` along longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridIndex {
    pub row: i64,
    pub col: i64,
}

/// A fixed-size grid over (lat, lng) degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    size: f64,
    decimals: usize,
}

impl Grid {
    /// Create a grid with the given cell size in degrees.
    ///
    /// The size must be positive and finite; this is not checked here
    /// (see [`TerritoryConfig::validate`](crate::TerritoryConfig::validate)).
    pub fn new(size: f64) -> Self {
        // Two digits beyond the grid's own resolution keep adjacent centers apart.
        let resolution_digits = (-size.log10()).ceil().max(0.0) as usize + 2;
        Self {
            size,
            decimals: resolution_digits.max(MIN_DECIMALS),
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Fractional digits used when formatting identifiers.
    pub fn decimals(&self) -> usize {
        self.decimals
    }

    /// Nearest grid row for a latitude.
    pub fn row_of(&self, lat: f64) -> i64 {
        (lat / self.size).round() as i64
    }

    /// Nearest grid column for a longitude.
    pub fn col_of(&self, lng: f64) -> i64 {
        (lng / self.size).round() as i64
    }

    /// Grid index containing a coordinate.
    pub fn index(&self, lat: f64, lng: f64) -> GridIndex {
        GridIndex {
            row: self.row_of(lat),
            col: self.col_of(lng),
        }
    }

    /// Center coordinate of a cell.
    pub fn center(&self, index: GridIndex) -> GpsPoint {
        GpsPoint::new(index.row as f64 * self.size, index.col as f64 * self.size)
    }

    /// Snap a point to its cell center, keeping accuracy and timestamp.
    pub fn quantize(&self, point: &GpsPoint) -> GpsPoint {
        let center = self.center(self.index(point.latitude, point.longitude));
        GpsPoint {
            latitude: center.latitude,
            longitude: center.longitude,
            ..*point
        }
    }

    /// Identifier of the cell containing `(lat, lng)`.
    pub fn cell_id(&self, lat: f64, lng: f64) -> CellId {
        self.cell_id_for_index(self.index(lat, lng))
    }

    /// Identifier of a cell from its exact index (no rounding applied).
    pub fn cell_id_for_index(&self, index: GridIndex) -> CellId {
        let lat = index.row as f64 * self.size;
        let lng = index.col as f64 * self.size;
        CellId(format!(
            "{:.prec$}{}{:.prec$}",
            lat,
            CELL_SEPARATOR,
            lng,
            prec = self.decimals
        ))
    }

    /// Parse an identifier back into its grid index.
    ///
    /// Returns `None` for strings that were not produced by this grid.
    pub fn parse_cell_id(&self, id: &str) -> Option<GridIndex> {
        let (lat, lng) = id.split_once(CELL_SEPARATOR)?;
        let lat: f64 = lat.parse().ok()?;
        let lng: f64 = lng.parse().ok()?;
        let index = self.index(lat, lng);
        (self.cell_id_for_index(index).as_str() == id).then_some(index)
    }
}

/// Identifier of the cell containing `(lat, lng)` on a grid of `grid_size` degrees.
pub fn cell_id(lat: f64, lng: f64, grid_size: f64) -> CellId {
    Grid::new(grid_size).cell_id(lat, lng)
}
