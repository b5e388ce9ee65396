//! A* over the walkability grid.
//!
//! 4-connected moves, unit step cost, Manhattan heuristic (admissible and
//! consistent for this move set, so the first time the goal is popped its
//! path is shortest).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::grid::{Cell, WalkGrid};

const NEIGHBORS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Frontier entry. Ordered so `BinaryHeap` pops the lowest `f` first;
/// ties go to the lower cell for deterministic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frontier {
    f: u32,
    g: u32,
    cell: Cell,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.cell.cmp(&self.cell))
            .then_with(|| other.g.cmp(&self.g))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn manhattan(a: Cell, b: Cell) -> u32 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Shortest path from `start` to `goal`, both inclusive.
///
/// Returns `None` if either end is out of bounds or blocked, or if no path
/// exists. `start == goal` yields `[start]`.
pub fn find_path(grid: &WalkGrid, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        return None;
    }

    let nx = grid.nx();
    let total = nx as usize * grid.ny() as usize;
    let idx = |(x, y): Cell| y as usize * nx as usize + x as usize;

    let mut g_score = vec![u32::MAX; total];
    let mut came_from: Vec<Option<Cell>> = vec![None; total];
    let mut open = BinaryHeap::new();

    g_score[idx(start)] = 0;
    open.push(Frontier {
        f: manhattan(start, goal),
        g: 0,
        cell: start,
    });

    while let Some(Frontier { g, cell, .. }) = open.pop() {
        if g > g_score[idx(cell)] {
            continue; // stale entry
        }
        if cell == goal {
            let mut path = vec![cell];
            let mut cur = cell;
            while let Some(prev) = came_from[idx(cur)] {
                path.push(prev);
                cur = prev;
            }
            path.reverse();
            return Some(path);
        }

        for (dx, dy) in NEIGHBORS {
            let next = (cell.0 + dx, cell.1 + dy);
            if !grid.is_walkable(next) {
                continue;
            }
            let tentative = g + 1;
            if tentative < g_score[idx(next)] {
                g_score[idx(next)] = tentative;
                came_from[idx(next)] = Some(cell);
                open.push(Frontier {
                    f: tentative + manhattan(next, goal),
                    g: tentative,
                    cell: next,
                });
            }
        }
    }

    None
}

/// Try each goal in order and return the index of the first reachable one
/// together with its path.
pub fn find_path_to_any(grid: &WalkGrid, start: Cell, goals: &[Cell]) -> Option<(usize, Vec<Cell>)> {
    goals
        .iter()
        .enumerate()
        .find_map(|(i, &goal)| find_path(grid, start, goal).map(|path| (i, path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Number of moves in a cell path.
    fn steps(path: &[Cell]) -> usize {
        path.len().saturating_sub(1)
    }

    fn assert_connected(path: &[Cell]) {
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1, "jump in path: {:?}", pair);
        }
    }

    #[test]
    fn test_open_grid_corner_to_corner() {
        let grid = WalkGrid::open(5, 5, 0.1);
        let path = find_path(&grid, (0, 0), (4, 4)).unwrap();
        assert_eq!(steps(&path), 8);
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(4, 4)));
        assert_connected(&path);
    }

    #[test]
    fn test_same_cell() {
        let grid = WalkGrid::open(3, 3, 0.1);
        assert_eq!(find_path(&grid, (1, 1), (1, 1)), Some(vec![(1, 1)]));
    }

    #[test]
    fn test_blocked_endpoints() {
        let mut grid = WalkGrid::open(5, 5, 0.1);
        grid.set_blocked((0, 0));
        grid.set_blocked((4, 4));
        assert_eq!(find_path(&grid, (0, 0), (2, 2)), None);
        assert_eq!(find_path(&grid, (2, 2), (4, 4)), None);
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let grid = WalkGrid::open(5, 5, 0.1);
        assert_eq!(find_path(&grid, (-1, 0), (2, 2)), None);
        assert_eq!(find_path(&grid, (2, 2), (5, 0)), None);
    }

    #[test]
    fn test_detour_around_wall() {
        // Wall across column 2, open only at the top row.
        let mut grid = WalkGrid::open(5, 5, 0.1);
        for gy in 0..4 {
            grid.set_blocked((2, gy));
        }
        let path = find_path(&grid, (0, 0), (4, 0)).unwrap();
        assert_eq!(steps(&path), 12);
        assert!(path.contains(&(2, 4)));
        assert_connected(&path);
    }

    #[test]
    fn test_no_path_when_sealed() {
        let mut grid = WalkGrid::open(5, 5, 0.1);
        for gy in 0..5 {
            grid.set_blocked((2, gy));
        }
        assert_eq!(find_path(&grid, (0, 0), (4, 4)), None);
    }

    #[test]
    fn test_first_reachable_goal_wins() {
        let mut grid = WalkGrid::open(5, 5, 0.1);
        grid.set_blocked((4, 4));
        let goals = [(4, 4), (9, 9), (3, 0), (0, 3)];
        let (which, path) = find_path_to_any(&grid, (0, 0), &goals).unwrap();
        assert_eq!(which, 2);
        assert_eq!(steps(&path), 3);
    }
}
