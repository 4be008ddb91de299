//! # Grid Index
//!
//! The world is cut into square tiles of `tile_degrees` on a side.
//! Each tile is addressed by a [`Cell`] holding two integer indices.
//!
//! ## Axis Convention
//!
//! `i` indexes **longitude** and `j` indexes **latitude**:
//!
//! ```text
//! i = floor(lng / tile_degrees)
//! j = floor(lat / tile_degrees)
//! ```
//!
//! Saved games and generated content are keyed on this mapping, so it
//! must never be flipped.
//!
//! ## Canonical Cells
//!
//! The index hands out [`CellRef`]s from a registry. Asking twice for the
//! same `(i, j)` returns the same allocation, so callers may compare with
//! `Arc::ptr_eq` or use the cell as a map key.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// A continuous geographic coordinate, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude (north-south).
    pub lat: f64,
    /// Longitude (east-west).
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the point unchanged if both coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns `GridError::NonFinitePoint` for NaN or infinite coordinates.
    pub fn finite(self) -> GridResult<Self> {
        if self.lat.is_finite() && self.lng.is_finite() {
            Ok(self)
        } else {
            Err(GridError::NonFinitePoint {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

/// Canonical address of one grid tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Longitude index.
    pub i: i32,
    /// Latitude index.
    pub j: i32,
}

impl Cell {
    /// Creates a cell address.
    #[inline]
    #[must_use]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Returns the persistence key for this cell (`"{i},{j}"`).
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Returns the cell `di` columns and `dj` rows away.
    ///
    /// # Errors
    ///
    /// Returns `GridError::CellOutOfRange` if the result leaves the i32 range.
    pub fn offset(self, di: i32, dj: i32) -> GridResult<Self> {
        let i = self.i.checked_add(di).ok_or(GridError::CellOutOfRange {
            value: f64::from(self.i) + f64::from(di),
        })?;
        let j = self.j.checked_add(dj).ok_or(GridError::CellOutOfRange {
            value: f64::from(self.j) + f64::from(dj),
        })?;
        Ok(Self { i, j })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

impl FromStr for Cell {
    type Err = GridError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let malformed = || GridError::MalformedCellKey(key.to_owned());
        let (i, j) = key.split_once(',').ok_or_else(malformed)?;
        let i = i.parse::<i32>().map_err(|_| malformed())?;
        let j = j.parse::<i32>().map_err(|_| malformed())?;
        let cell = Self { i, j };
        // Only the exact `Display` form is a key: no spaces, signs or zero padding.
        if cell.key() != key {
            return Err(malformed());
        }
        Ok(cell)
    }
}

/// Largest neighborhood radius, in cells (a 2049 x 2049 square).
pub const MAX_NEIGHBORHOOD_RADIUS: u32 = 1024;

/// Shared handle to a canonical cell.
pub type CellRef = Arc<Cell>;

/// Geographic rectangle covered by one cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellBounds {
    /// Minimum latitude and longitude corner.
    pub south_west: GeoPoint,
    /// Maximum latitude and longitude corner.
    pub north_east: GeoPoint,
}

impl CellBounds {
    /// Returns the midpoint of the rectangle.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south_west.lat + self.north_east.lat) * 0.5,
            (self.south_west.lng + self.north_east.lng) * 0.5,
        )
    }

    /// Returns true if the point lies inside (south-west edges inclusive).
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south_west.lat
            && point.lat < self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng < self.north_east.lng
    }
}

/// Maps coordinates to canonical cells.
///
/// One index per game session. The registry only grows: cells are never
/// evicted for the lifetime of the index.
pub struct GridIndex {
    /// Tile edge length in degrees.
    tile_degrees: f64,
    /// Default neighborhood radius, in cells.
    visibility_radius: u32,
    /// Canonical cell registry.
    known_cells: RwLock<HashMap<Cell, CellRef>>,
}

impl GridIndex {
    /// Creates a new grid index.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidTileSize` unless `tile_degrees` is
    /// positive and finite, or `GridError::RadiusTooLarge` if
    /// `visibility_radius` exceeds [`MAX_NEIGHBORHOOD_RADIUS`].
    pub fn new(tile_degrees: f64, visibility_radius: u32) -> GridResult<Self> {
        if !(tile_degrees.is_finite() && tile_degrees > 0.0) {
            return Err(GridError::InvalidTileSize(tile_degrees));
        }
        checked_radius(visibility_radius)?;
        Ok(Self {
            tile_degrees,
            visibility_radius,
            known_cells: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the tile edge length in degrees.
    #[inline]
    #[must_use]
    pub const fn tile_degrees(&self) -> f64 {
        self.tile_degrees
    }

    /// Returns the default neighborhood radius.
    #[inline]
    #[must_use]
    pub const fn visibility_radius(&self) -> u32 {
        self.visibility_radius
    }

    /// Returns the number of cells registered so far.
    #[must_use]
    pub fn known_cell_count(&self) -> usize {
        self.known_cells.read().len()
    }

    /// Returns the canonical handle for a cell, registering it on first use.
    pub fn canonical(&self, cell: Cell) -> CellRef {
        if let Some(existing) = self.known_cells.read().get(&cell) {
            return Arc::clone(existing);
        }
        let mut cells = self.known_cells.write();
        Arc::clone(cells.entry(cell).or_insert_with(|| {
            tracing::trace!("Registered cell {}", cell);
            Arc::new(cell)
        }))
    }

    /// Returns the canonical cell containing a point.
    ///
    /// # Errors
    ///
    /// Returns `GridError::NonFinitePoint` or `GridError::CellOutOfRange`.
    pub fn cell_for_point(&self, point: GeoPoint) -> GridResult<CellRef> {
        Ok(self.canonical(self.locate(point)?))
    }

    /// Returns the rectangle covered by a cell.
    #[must_use]
    pub fn bounds_for_cell(&self, cell: &Cell) -> CellBounds {
        let tile = self.tile_degrees;
        CellBounds {
            south_west: GeoPoint::new(f64::from(cell.j) * tile, f64::from(cell.i) * tile),
            north_east: GeoPoint::new(
                (f64::from(cell.j) + 1.0) * tile,
                (f64::from(cell.i) + 1.0) * tile,
            ),
        }
    }

    /// Returns the `(2r+1)^2` cells around the cell containing `point`.
    ///
    /// Cells are ordered row-major by `i` offset, then `j` offset, both
    /// running from `-radius` to `+radius`.
    ///
    /// # Errors
    ///
    /// Returns `GridError::NonFinitePoint`, `GridError::CellOutOfRange` if
    /// the square leaves the index range, or `GridError::RadiusTooLarge`.
    pub fn cells_near_point(&self, point: GeoPoint, radius: u32) -> GridResult<Vec<CellRef>> {
        let origin = self.locate(point)?;
        let r = checked_radius(radius)?;

        // Both corners must be addressable before anything is allocated.
        origin.offset(-r, -r)?;
        origin.offset(r, r)?;

        let side = 2 * radius as usize + 1;
        let mut cells = Vec::with_capacity(side * side);
        for di in -r..=r {
            for dj in -r..=r {
                cells.push(self.canonical(origin.offset(di, dj)?));
            }
        }
        Ok(cells)
    }

    /// Returns the neighborhood using the index's own visibility radius.
    ///
    /// # Errors
    ///
    /// See [`GridIndex::cells_near_point`].
    pub fn cells_near_point_default(&self, point: GeoPoint) -> GridResult<Vec<CellRef>> {
        self.cells_near_point(point, self.visibility_radius)
    }

    /// Computes the (non-canonical) cell address of a point.
    fn locate(&self, point: GeoPoint) -> GridResult<Cell> {
        let point = point.finite()?;
        Ok(Cell::new(
            grid_index(point.lng / self.tile_degrees)?,
            grid_index(point.lat / self.tile_degrees)?,
        ))
    }
}

/// Rejects radii above [`MAX_NEIGHBORHOOD_RADIUS`].
fn checked_radius(radius: u32) -> GridResult<i32> {
    if radius > MAX_NEIGHBORHOOD_RADIUS {
        return Err(GridError::RadiusTooLarge {
            radius,
            max: MAX_NEIGHBORHOOD_RADIUS,
        });
    }
    i32::try_from(radius).map_err(|_| GridError::RadiusTooLarge {
        radius,
        max: MAX_NEIGHBORHOOD_RADIUS,
    })
}

/// Floors a scaled coordinate into the i32 index range.
#[allow(clippy::cast_possible_truncation)]
fn grid_index(scaled: f64) -> GridResult<i32> {
    let floored = scaled.floor();
    if floored < f64::from(i32::MIN) || floored > f64::from(i32::MAX) {
        return Err(GridError::CellOutOfRange { value: floored });
    }
    Ok(floored as i32)
}
