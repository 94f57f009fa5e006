//! Offset hex coordinates (pointy-top, odd rows shifted right)
//!
//! Neighbour offsets depend on the parity of the row (`y`), so there are
//! two disjoint offset tables. Nothing here is bounds checked; callers
//! filter neighbours against the live cell set.

use serde::{Deserialize, Serialize};

/// Tolerance multiplier on one terrace step when comparing heights
pub const TERRACE_TOLERANCE: f32 = 1.5;

/// Vertical spacing between rows of a pointy-top grid with unit width
const ROW_SPACING: f32 = 0.866_025_4;

const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(-1, -1), (0, -1), (1, 0), (0, 1), (-1, 1), (-1, 0)];
const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(1, -1), (0, -1), (1, 0), (0, 1), (1, 1), (-1, 0)];

/// Offset hex coordinate (column x, row y)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Odd rows are shifted half a cell to the right
    pub fn is_odd_row(&self) -> bool {
        self.y.rem_euclid(2) == 1
    }

    /// Get all 6 adjacent cells
    pub fn neighbors(&self) -> [CellCoord; 6] {
        let table = if self.is_odd_row() {
            &ODD_ROW_OFFSETS
        } else {
            &EVEN_ROW_OFFSETS
        };
        table.map(|(dx, dy)| CellCoord::new(self.x + dx, self.y + dy))
    }

    pub fn is_adjacent(&self, other: &CellCoord) -> bool {
        self.neighbors().contains(other)
    }

    /// Convert to cube coordinates (x, y, z) with x + y + z = 0
    pub fn to_cube(&self) -> (i32, i32, i32) {
        let q = self.x - (self.y - self.y.rem_euclid(2)) / 2;
        let r = self.y;
        (q, -q - r, r)
    }

    /// Distance in hex steps
    pub fn distance(&self, other: &CellCoord) -> u32 {
        let (ax, ay, az) = self.to_cube();
        let (bx, by, bz) = other.to_cube();
        let d = (ax - bx).abs() + (ay - by).abs() + (az - bz).abs();
        (d / 2) as u32
    }

    /// Planar centre of the cell in world units (x, z)
    pub fn world_position(&self) -> (f32, f32) {
        let shift = if self.is_odd_row() { 0.5 } else { 0.0 };
        (self.x as f32 + shift, self.y as f32 * ROW_SPACING)
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Whether two terrace heights are at most one terrace step apart
pub fn within_one_terrace(a: f32, b: f32, terrace_step: f32) -> bool {
    (a - b).abs() <= terrace_step * TERRACE_TOLERANCE
}
