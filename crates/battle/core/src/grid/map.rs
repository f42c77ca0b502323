//! The battle arena: a rectangular, elevation-aware grid.

use crate::state::Position;

use super::cell::{GridCell, TileEffect};

/// Neighbor model for movement and distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Adjacency {
    /// Cardinal neighbors only; Manhattan distance.
    Four,
    /// Cardinal + diagonal neighbors; Chebyshev distance.
    #[default]
    Eight,
    /// Axial hex neighbors; used by the overworld, not battle arenas.
    Hex,
}

impl Adjacency {
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Adjacency::Four => &[(0, -1), (-1, 0), (1, 0), (0, 1)],
            Adjacency::Eight => &[
                (-1, -1),
                (0, -1),
                (1, -1),
                (-1, 0),
                (1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
            ],
            Adjacency::Hex => &[(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)],
        }
    }

    /// Grid distance between two positions under this neighbor model.
    pub fn distance(self, a: Position, b: Position) -> u32 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        match self {
            Adjacency::Four => (dx.abs() + dy.abs()) as u32,
            Adjacency::Eight => dx.abs().max(dy.abs()) as u32,
            // Axial hex distance.
            Adjacency::Hex => ((dx.abs() + dy.abs() + (dx + dy).abs()) / 2) as u32,
        }
    }
}

/// The battle arena grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleGrid {
    width: u32,
    height: u32,
    cells: Vec<GridCell>,
    pub adjacency: Adjacency,
}

impl BattleGrid {
    /// Creates an open arena filled with ground-level floor.
    pub fn open(width: u32, height: u32, adjacency: Adjacency) -> Self {
        Self {
            width,
            height,
            cells: vec![GridCell::floor(); (width * height) as usize],
            adjacency,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> usize {
        (position.y as u32 * self.width + position.x as u32) as usize
    }

    pub fn cell(&self, position: Position) -> Option<&GridCell> {
        self.contains(position).then(|| &self.cells[self.index(position)])
    }

    pub fn cell_mut(&mut self, position: Position) -> Option<&mut GridCell> {
        if self.contains(position) {
            let idx = self.index(position);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Overwrites one cell; out-of-bounds writes are ignored.
    pub fn set_cell(&mut self, position: Position, cell: GridCell) {
        if let Some(slot) = self.cell_mut(position) {
            *slot = cell;
        }
    }

    /// Attaches a terrain effect to a cell.
    pub fn add_effect(&mut self, position: Position, effect: TileEffect) {
        if let Some(cell) = self.cell_mut(position) {
            cell.effect = Some(effect);
        }
    }

    /// In-bounds neighbors of a position under the grid's adjacency.
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        self.adjacency
            .offsets()
            .iter()
            .map(move |(dx, dy)| Position::new(position.x + dx, position.y + dy))
            .filter(|p| self.contains(*p))
    }

    /// Grid distance between two positions.
    pub fn distance(&self, a: Position, b: Position) -> u32 {
        self.adjacency.distance(a, b)
    }

    /// Height difference `from` minus `to`; positive means `from` stands higher.
    pub fn elevation_diff(&self, from: Position, to: Position) -> i32 {
        let from_h = self.cell(from).map(|c| c.height).unwrap_or(0);
        let to_h = self.cell(to).map(|c| c.height).unwrap_or(0);
        from_h - to_h
    }

    /// Line of sight between two cells, stepping a Bresenham line.
    ///
    /// Endpoints never block; any intermediate sight-blocking cell does.
    pub fn line_of_sight(&self, from: Position, to: Position) -> bool {
        let mut x = from.x;
        let mut y = from.y;
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x == to.x && y == to.y {
                return true;
            }
            let here = Position::new(x, y);
            if here != from {
                match self.cell(here) {
                    Some(cell) if cell.blocks_sight => return false,
                    Some(_) => {}
                    None => return false,
                }
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// All in-bounds cells within `radius` grid distance of `center`,
    /// center included.
    pub fn cells_in_circle(&self, center: Position, radius: u32) -> Vec<Position> {
        let r = radius as i32;
        let mut out = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let p = Position::new(center.x + dx, center.y + dy);
                if self.contains(p) && self.distance(center, p) <= radius {
                    out.push(p);
                }
            }
        }
        out
    }

    /// Cells within `radius` of `origin` inside a 90-degree wedge aimed from
    /// `origin` toward `toward`. The origin cell itself is excluded.
    pub fn cells_in_cone(&self, origin: Position, toward: Position, radius: u32) -> Vec<Position> {
        let dir_x = (toward.x - origin.x).signum();
        let dir_y = (toward.y - origin.y).signum();
        if dir_x == 0 && dir_y == 0 {
            return Vec::new();
        }

        let r = radius as i32;
        let mut out = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let p = Position::new(origin.x + dx, origin.y + dy);
                if !self.contains(p) || self.distance(origin, p) > radius {
                    continue;
                }
                // Inside the wedge when the offset is within 45 degrees of
                // the aim direction: cos^2 >= 1/2 in integer math.
                let dot = dx * dir_x + dy * dir_y;
                if dot <= 0 {
                    continue;
                }
                let len_sq = (dx * dx + dy * dy) * (dir_x * dir_x + dir_y * dir_y);
                if 2 * dot * dot >= len_sq {
                    out.push(p);
                }
            }
        }
        out
    }

    /// Decrements every tile effect by one round, clearing the expired ones.
    ///
    /// Called when the turn order wraps around to a new round.
    pub fn tick_effects(&mut self) {
        for cell in &mut self.cells {
            if let Some(effect) = &mut cell.effect {
                effect.remaining_rounds = effect.remaining_rounds.saturating_sub(1);
                if effect.remaining_rounds == 0 {
                    cell.effect = None;
                }
            }
        }
    }
}
