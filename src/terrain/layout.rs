//! Static map layouts - which cells exist and what each is for
//!
//! A layout is the pre-validated input to terrain generation. It can be
//! parsed from a text map or built procedurally as a hexagonal island.

use ahash::AHashMap;

use crate::hex::CellCoord;

/// Classification of one layout cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Out of bounds water, impassable
    Blocked,
    /// Land with a noise-sampled height
    Open,
    /// Land levelled onto its sampled neighbours
    AlwaysOpen,
    HomeCitySlot,
    /// May host an enemy stronghold, otherwise generated as open land
    StrongholdSlot,
    /// A symbol the layout format does not know
    Unrecognized(char),
}

impl TileKind {
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            '~' => Self::Blocked,
            '.' => Self::Open,
            '#' => Self::AlwaysOpen,
            'H' => Self::HomeCitySlot,
            'S' => Self::StrongholdSlot,
            other => Self::Unrecognized(other),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::Blocked => '~',
            Self::Open => '.',
            Self::AlwaysOpen => '#',
            Self::HomeCitySlot => 'H',
            Self::StrongholdSlot => 'S',
            Self::Unrecognized(c) => *c,
        }
    }
}

/// Ordered set of layout cells
///
/// Iteration follows insertion order, which keeps every random draw made
/// while walking the layout reproducible.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    tiles: Vec<(CellCoord, TileKind)>,
    index: AHashMap<CellCoord, usize>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cell (a replaced cell keeps its position)
    pub fn set(&mut self, cell: CellCoord, kind: TileKind) {
        match self.index.get(&cell) {
            Some(&i) => self.tiles[i].1 = kind,
            None => {
                self.index.insert(cell, self.tiles.len());
                self.tiles.push((cell, kind));
            }
        }
    }

    pub fn get(&self, cell: &CellCoord) -> Option<TileKind> {
        self.index.get(cell).map(|&i| self.tiles[i].1)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> impl Iterator<Item = (CellCoord, TileKind)> + '_ {
        self.tiles.iter().copied()
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|(_, k)| *k == kind).count()
    }

    /// Parse a text map: line index is the row, char index the column.
    ///
    /// Spaces are cells that do not exist. Unknown symbols are kept as
    /// `TileKind::Unrecognized` and reported during generation.
    pub fn parse(text: &str) -> Self {
        let mut layout = Self::new();
        for (y, line) in text.lines().enumerate() {
            for (x, symbol) in line.chars().enumerate() {
                if symbol == ' ' || symbol == '\r' {
                    continue;
                }
                layout.set(CellCoord::new(x as i32, y as i32), TileKind::from_symbol(symbol));
            }
        }
        layout
    }

    /// Render back to the text format (bounding box of all cells).
    ///
    /// Rows start on an even row so parsing the text keeps every cell's
    /// row parity, and with it the neighbour layout.
    pub fn to_text(&self) -> String {
        let Some(min_x) = self.tiles.iter().map(|(c, _)| c.x).min() else {
            return String::new();
        };
        let min_y = self.tiles.iter().map(|(c, _)| c.y).min().unwrap_or(0);
        let min_y = min_y - min_y.rem_euclid(2);
        let max_x = self.tiles.iter().map(|(c, _)| c.x).max().unwrap_or(0);
        let max_y = self.tiles.iter().map(|(c, _)| c.y).max().unwrap_or(0);

        let mut out = String::new();
        for y in min_y..=max_y {
            let row: String = (min_x..=max_x)
                .map(|x| {
                    self.get(&CellCoord::new(x, y))
                        .map(|k| k.symbol())
                        .unwrap_or(' ')
                })
                .collect();
            out.push_str(row.trim_end());
            out.push('\n');
        }
        out
    }

    /// Build a hexagonal island centred on the origin.
    ///
    /// Six home-city slots sit on the corners of the ring at
    /// `radius - 1`, stronghold slots on the mid-edges of that ring and on
    /// the corners of the ring at `radius / 2`. The centre is always land
    /// and the ring at `radius + 1` is out-of-bounds shore.
    pub fn island(radius: u32) -> Self {
        let radius = radius.max(3) as i32;
        let mut layout = Self::new();

        // Row-major so parsing the rendered text reproduces the order
        for r in -(radius + 1)..=(radius + 1) {
            for q in -(2 * radius + 2)..=(2 * radius + 2) {
                let d = axial_distance((q, r), (0, 0));
                if d > radius + 1 {
                    continue;
                }
                let kind = if d == radius + 1 {
                    TileKind::Blocked
                } else {
                    TileKind::Open
                };
                layout.set(axial_to_offset((q, r)), kind);
            }
        }

        layout.set(CellCoord::new(0, 0), TileKind::AlwaysOpen);

        let outer = radius - 1;
        let ring = axial_ring(outer);
        for (i, hex) in ring.iter().enumerate() {
            let j = i as i32 % outer;
            if j == 0 {
                layout.set(axial_to_offset(*hex), TileKind::HomeCitySlot);
            } else if j == outer / 2 {
                layout.set(axial_to_offset(*hex), TileKind::StrongholdSlot);
            }
        }

        let inner = radius / 2;
        for (i, hex) in axial_ring(inner).iter().enumerate() {
            if i as i32 % inner == 0 {
                layout.set(axial_to_offset(*hex), TileKind::StrongholdSlot);
            }
        }

        layout
    }
}

const AXIAL_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

fn axial_distance(a: (i32, i32), b: (i32, i32)) -> i32 {
    let dq = a.0 - b.0;
    let dr = a.1 - b.1;
    (dq.abs() + dr.abs() + (dq + dr).abs()) / 2
}

fn axial_to_offset((q, r): (i32, i32)) -> CellCoord {
    CellCoord::new(q + (r - r.rem_euclid(2)) / 2, r)
}

/// Cells of the ring at `radius` around the origin, corners first on each side
fn axial_ring(radius: i32) -> Vec<(i32, i32)> {
    let mut hex = (AXIAL_DIRECTIONS[4].0 * radius, AXIAL_DIRECTIONS[4].1 * radius);
    let mut ring = Vec::with_capacity((6 * radius) as usize);
    for dir in AXIAL_DIRECTIONS {
        for _ in 0..radius {
            ring.push(hex);
            hex = (hex.0 + dir.0, hex.1 + dir.1);
        }
    }
    ring
}
