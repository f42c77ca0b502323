//! Weighted shortest paths and movement-range queries.
//!
//! Both entry points run Dijkstra over the arena's cost-weighted graph.
//! Traversal order is fully deterministic: the frontier is keyed on
//! `(cost, position)` with `Position`'s lexicographic ordering, so ties
//! always resolve the same way within a run.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::state::Position;

use super::map::BattleGrid;

/// Pathfinding failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("position {0} is outside the arena")]
    OutOfBounds(Position),

    #[error("no path to destination")]
    NoPath,
}

/// A found path, start tile included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub tiles: Vec<Position>,
    pub cost: u32,
}

impl Path {
    /// Number of tiles including the start.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Finds the cheapest path from `start` to `goal`.
///
/// `blocked` holds cells occupied by blocking entities; they are treated as
/// impassable, and a blocked or obstacle goal yields [`PathError::NoPath`]
/// even when otherwise reachable. Start or goal outside the arena is an
/// error.
pub fn find_path(
    grid: &BattleGrid,
    start: Position,
    goal: Position,
    blocked: &BTreeSet<Position>,
) -> Result<Path, PathError> {
    if !grid.contains(start) {
        return Err(PathError::OutOfBounds(start));
    }
    if !grid.contains(goal) {
        return Err(PathError::OutOfBounds(goal));
    }
    let goal_cell = grid.cell(goal).ok_or(PathError::OutOfBounds(goal))?;
    if !goal_cell.is_passable() || blocked.contains(&goal) {
        return Err(PathError::NoPath);
    }
    if start == goal {
        return Ok(Path {
            tiles: vec![start],
            cost: 0,
        });
    }

    let mut dist: BTreeMap<Position, u32> = BTreeMap::new();
    let mut parent: BTreeMap<Position, Position> = BTreeMap::new();
    let mut frontier = BinaryHeap::new();

    dist.insert(start, 0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((cost, current))) = frontier.pop() {
        if cost > *dist.get(&current).unwrap_or(&u32::MAX) {
            continue;
        }
        if current == goal {
            let mut tiles = vec![goal];
            let mut cursor = goal;
            while let Some(&prev) = parent.get(&cursor) {
                tiles.push(prev);
                cursor = prev;
            }
            tiles.reverse();
            return Ok(Path { tiles, cost });
        }

        for next in grid.neighbors(current) {
            let Some(cell) = grid.cell(next) else { continue };
            if !cell.is_passable() || blocked.contains(&next) {
                continue;
            }
            let next_cost = cost + cell.effective_move_cost();
            if next_cost < *dist.get(&next).unwrap_or(&u32::MAX) {
                dist.insert(next, next_cost);
                parent.insert(next, current);
                frontier.push(Reverse((next_cost, next)));
            }
        }
    }

    Err(PathError::NoPath)
}

/// All cells reachable from `start` within `budget` movement cost.
///
/// Obstacles and `blocked` cells are excluded, and the start tile itself is
/// never part of the result. An out-of-bounds start yields the empty set.
pub fn reachable_tiles(
    grid: &BattleGrid,
    start: Position,
    budget: u32,
    blocked: &BTreeSet<Position>,
) -> BTreeSet<Position> {
    let mut reachable = BTreeSet::new();
    if !grid.contains(start) {
        return reachable;
    }

    let mut dist: BTreeMap<Position, u32> = BTreeMap::new();
    let mut frontier = BinaryHeap::new();
    dist.insert(start, 0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((cost, current))) = frontier.pop() {
        if cost > *dist.get(&current).unwrap_or(&u32::MAX) {
            continue;
        }
        if current != start {
            reachable.insert(current);
        }
        for next in grid.neighbors(current) {
            let Some(cell) = grid.cell(next) else { continue };
            if !cell.is_passable() || blocked.contains(&next) {
                continue;
            }
            let next_cost = cost + cell.effective_move_cost();
            if next_cost <= budget && next_cost < *dist.get(&next).unwrap_or(&u32::MAX) {
                dist.insert(next, next_cost);
                frontier.push(Reverse((next_cost, next)));
            }
        }
    }

    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::cell::GridCell;
    use crate::grid::map::Adjacency;

    fn open_grid() -> BattleGrid {
        BattleGrid::open(6, 6, Adjacency::Four)
    }

    #[test]
    fn straight_line_on_open_grid() {
        let grid = open_grid();
        let path = find_path(
            &grid,
            Position::new(0, 0),
            Position::new(3, 0),
            &BTreeSet::new(),
        )
        .unwrap();
        assert_eq!(path.len(), 4); // start inclusive
        assert_eq!(path.cost, 3);
        assert_eq!(path.tiles.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.tiles.last(), Some(&Position::new(3, 0)));
    }

    #[test]
    fn obstacles_force_a_detour() {
        let mut grid = open_grid();
        grid.set_cell(Position::new(1, 0), GridCell::wall());
        grid.set_cell(Position::new(2, 0), GridCell::wall());
        let path = find_path(
            &grid,
            Position::new(0, 0),
            Position::new(3, 0),
            &BTreeSet::new(),
        )
        .unwrap();
        assert!(path.cost > 3);
        assert!(!path.tiles.contains(&Position::new(1, 0)));
        assert!(!path.tiles.contains(&Position::new(2, 0)));
    }

    #[test]
    fn boxed_in_start_has_no_path() {
        let mut grid = open_grid();
        grid.set_cell(Position::new(1, 0), GridCell::wall());
        grid.set_cell(Position::new(0, 1), GridCell::wall());
        grid.set_cell(Position::new(1, 1), GridCell::wall());
        assert_eq!(
            find_path(
                &grid,
                Position::new(0, 0),
                Position::new(3, 0),
                &BTreeSet::new()
            ),
            Err(PathError::NoPath)
        );
    }

    #[test]
    fn occupied_goal_is_no_path() {
        let grid = open_grid();
        let blocked = BTreeSet::from([Position::new(3, 0)]);
        assert_eq!(
            find_path(&grid, Position::new(0, 0), Position::new(3, 0), &blocked),
            Err(PathError::NoPath)
        );
    }

    #[test]
    fn out_of_bounds_endpoints_are_errors() {
        let grid = open_grid();
        assert!(matches!(
            find_path(
                &grid,
                Position::new(-1, 0),
                Position::new(3, 0),
                &BTreeSet::new()
            ),
            Err(PathError::OutOfBounds(_))
        ));
        assert!(matches!(
            find_path(
                &grid,
                Position::new(0, 0),
                Position::new(99, 0),
                &BTreeSet::new()
            ),
            Err(PathError::OutOfBounds(_))
        ));
    }

    #[test]
    fn same_inputs_same_path() {
        let mut grid = BattleGrid::open(8, 8, Adjacency::Eight);
        grid.set_cell(Position::new(3, 3), GridCell::wall());
        grid.set_cell(Position::new(3, 4), GridCell::wall());
        let a = find_path(
            &grid,
            Position::new(0, 0),
            Position::new(7, 7),
            &BTreeSet::new(),
        )
        .unwrap();
        let b = find_path(
            &grid,
            Position::new(0, 0),
            Position::new(7, 7),
            &BTreeSet::new(),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn reachable_tiles_match_manhattan_budget() {
        let grid = open_grid();
        let tiles = reachable_tiles(&grid, Position::new(0, 0), 2, &BTreeSet::new());
        // Exactly the in-bounds cells with Manhattan distance 1 or 2.
        let expected: BTreeSet<Position> = [
            (1, 0),
            (0, 1),
            (2, 0),
            (1, 1),
            (0, 2),
        ]
        .into_iter()
        .map(|(x, y)| Position::new(x, y))
        .collect();
        assert_eq!(tiles, expected);
        assert!(!tiles.contains(&Position::new(0, 0)));
    }

    #[test]
    fn terrain_cost_shrinks_reach() {
        let mut grid = open_grid();
        for y in 0..6 {
            for x in 0..6 {
                let p = Position::new(x, y);
                if x > 0 {
                    grid.set_cell(p, GridCell::floor().with_cost(2));
                }
            }
        }
        let tiles = reachable_tiles(&grid, Position::new(0, 0), 2, &BTreeSet::new());
        assert!(tiles.contains(&Position::new(1, 0)));
        assert!(!tiles.contains(&Position::new(2, 0)));
    }
}
