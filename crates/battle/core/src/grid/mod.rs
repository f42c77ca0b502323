//! Battle arena grid: cells, adjacency, line of sight, and pathfinding.

mod cell;
mod map;
mod path;

pub use cell::{GridCell, TileEffect, TileEffectKind};
pub use map::{Adjacency, BattleGrid};
pub use path::{Path, PathError, find_path, reachable_tiles};
