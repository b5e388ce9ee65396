//! Human approach validation: can a walker get from the entry wall to an
//! open side of every item that needs one?
//!
//! The walker always starts at the middle of the `y_min` wall, one half
//! agent-width into the room. For each item with a human-approach rule
//! (skipping wall- and ceiling-mounted items) we try approach targets in
//! side order, each one placed just outside the footprint edge, and accept
//! the first that A* can reach. One unreachable item fails the layout.

use log::warn;

use crate::config::AccessConfig;
use crate::error::{PlacementError, Result};
use crate::geometry::{Room, Side};
use crate::grid::{build_grid, Cell, WalkGrid};
use crate::pathfinding::find_path;
use crate::placement::PlacedItem;

/// Outcome for one approach-checked item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAccess {
    /// Position of the item in the placed list.
    pub index: usize,
    pub name: String,
    /// Side whose target was reached, if any.
    pub reached_side: Option<Side>,
    /// Walker route as floor-plane cell centers, entry first.
    pub path: Option<Vec<(f32, f32)>>,
}

impl ItemAccess {
    pub fn is_reachable(&self) -> bool {
        self.reached_side.is_some()
    }
}

/// Per-item results for every approach-checked item, in placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessReport {
    pub start: (f32, f32),
    pub items: Vec<ItemAccess>,
}

impl AccessReport {
    pub fn passed(&self) -> bool {
        self.items.iter().all(ItemAccess::is_reachable)
    }

    pub fn unreachable(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|a| !a.is_reachable())
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Path for the item at `index` in the placed list.
    pub fn path_for(&self, index: usize) -> Option<&[(f32, f32)]> {
        self.items
            .iter()
            .find(|a| a.index == index)
            .and_then(|a| a.path.as_deref())
    }

    /// Turn any unreachable item into [`PlacementError::AccessibilityUnreachable`].
    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            Ok(self)
        } else {
            Err(PlacementError::AccessibilityUnreachable {
                items: self.unreachable().into_iter().map(String::from).collect(),
            })
        }
    }
}

/// World point where the walker enters: middle of the `y_min` wall.
pub fn entry_point(room: &Room, config: &AccessConfig) -> (f32, f32) {
    (
        (room.x_min + room.x_max) / 2.0,
        room.y_min + config.agent.width / 2.0,
    )
}

/// Approach target for each requested side: the footprint edge midpoint
/// pushed outward by half the agent depth plus the approach margin.
pub fn approach_targets(
    item: &PlacedItem,
    sides: &[Side],
    config: &AccessConfig,
) -> Vec<(Side, (f32, f32))> {
    let offset = config.approach_offset();
    sides
        .iter()
        .map(|&side| {
            let (fx, fy, _) = item.face_center(side);
            let (nx, ny) = side.normal();
            (side, (fx + nx * offset, fy + ny * offset))
        })
        .collect()
}

fn check_item(
    grid: &WalkGrid,
    start: Cell,
    index: usize,
    item: &PlacedItem,
    config: &AccessConfig,
) -> ItemAccess {
    let sides = item.item.policy.approach.sides();
    for (side, (tx, ty)) in approach_targets(item, &sides, config) {
        let goal = grid.world_to_cell(tx, ty);
        if !grid.is_walkable(goal) {
            continue;
        }
        if let Some(cells) = find_path(grid, start, goal) {
            return ItemAccess {
                index,
                name: item.name().to_string(),
                reached_side: Some(side),
                path: Some(cells.into_iter().map(|c| grid.cell_center(c)).collect()),
            };
        }
    }
    warn!("No human approach to '{}' (sides tried: {:?})", item.name(), sides);
    ItemAccess {
        index,
        name: item.name().to_string(),
        reached_side: None,
        path: None,
    }
}

/// Check every approach-required item of a placed layout.
///
/// Errors only on bad configuration; an inaccessible layout is reported
/// through [`AccessReport::passed`].
pub fn validate(room: &Room, placed: &[PlacedItem], config: &AccessConfig) -> Result<AccessReport> {
    let grid = build_grid(room, placed, &config.agent, config.cell_size_m)?;
    let start_world = entry_point(room, config);
    let start = grid.world_to_cell(start_world.0, start_world.1);

    let items = placed
        .iter()
        .enumerate()
        .filter(|(_, p)| p.item.policy.needs_approach())
        .map(|(i, p)| check_item(&grid, start, i, p, config))
        .collect();

    Ok(AccessReport {
        start: start_world,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, Constraints, ItemInstance, NamedSide};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn placed(
        name: &str,
        center: (f32, f32),
        size_m: (f32, f32),
        constraints: Constraints,
    ) -> PlacedItem {
        let entry = CatalogEntry::fixed(name, [size_m.0 * 1000.0, size_m.1 * 1000.0, 800.0])
            .with_constraints(constraints);
        let policy = entry.policy().unwrap();
        let item = ItemInstance::sample(&entry, &policy, &mut StdRng::seed_from_u64(0));
        PlacedItem::new(item, (center.0, center.1, 0.4), 0.0, None)
    }

    fn approach() -> Constraints {
        Constraints {
            human_approach: true,
            ..Constraints::default()
        }
    }

    #[test]
    fn test_open_room_item_reachable() {
        let room = Room::with_size(6.0, 6.0, 2.5).unwrap();
        let layout = vec![placed("desk", (3.0, 4.0), (1.0, 0.6), approach())];
        let report = validate(&room, &layout, &AccessConfig::default()).unwrap();
        assert!(report.passed());
        assert_eq!(report.items.len(), 1);
        // Front is tried first and is open.
        assert_eq!(report.items[0].reached_side, Some(Side::Front));
        let path = report.path_for(0).unwrap();
        let (sx, sy) = path[0];
        assert!((sx - 3.0).abs() < 0.1 && (sy - 0.5).abs() < 0.1);
    }

    #[test]
    fn test_items_without_approach_are_not_checked() {
        let room = Room::with_size(6.0, 6.0, 2.5).unwrap();
        let hanging = Constraints {
            human_approach: true,
            under_ceiling: true,
            ..Constraints::default()
        };
        let layout = vec![
            placed("crate", (3.0, 3.0), (1.0, 1.0), Constraints::default()),
            placed("lamp", (1.0, 5.0), (0.3, 0.3), hanging),
        ];
        let report = validate(&room, &layout, &AccessConfig::default()).unwrap();
        assert!(report.items.is_empty());
        assert!(report.passed());
    }

    #[test]
    fn test_surrounded_item_fails() {
        // Target box at (3, 3.5) boxed in by four bars. The entry at (3, 0.5)
        // stays open, so the failure is about the target alone.
        let room = Room::with_size(6.0, 6.0, 2.5).unwrap();
        let layout = vec![
            placed("safe", (3.0, 3.5), (0.6, 0.6), approach()),
            placed("bar_left", (1.9, 3.5), (0.6, 2.8), Constraints::default()),
            placed("bar_right", (4.1, 3.5), (0.6, 2.8), Constraints::default()),
            placed("bar_front", (3.0, 2.4), (1.6, 0.6), Constraints::default()),
            placed("bar_back", (3.0, 4.6), (1.6, 0.6), Constraints::default()),
        ];
        let report = validate(&room, &layout, &AccessConfig::default()).unwrap();
        assert!(!report.passed());
        assert_eq!(report.unreachable(), vec!["safe"]);
        match report.into_result() {
            Err(PlacementError::AccessibilityUnreachable { items }) => {
                assert_eq!(items, vec!["safe".to_string()])
            }
            other => panic!("expected AccessibilityUnreachable, got {:?}", other),
        }
    }

    #[test]
    fn test_named_side_against_wall_fails() {
        let room = Room::with_size(6.0, 6.0, 2.5).unwrap();
        let back_only = Constraints {
            human_approach: true,
            free_side_named: Some(NamedSide { side: Side::Back }),
            ..Constraints::default()
        };
        // Back face flush with the y_max wall: its target is outside the room.
        let layout = vec![placed("bookcase", (3.0, 5.7), (1.2, 0.6), back_only)];
        let report = validate(&room, &layout, &AccessConfig::default()).unwrap();
        assert!(!report.passed());

        let front_only = Constraints {
            human_approach: true,
            free_side_named: Some(NamedSide { side: Side::Front }),
            ..Constraints::default()
        };
        let layout = vec![placed("bookcase", (3.0, 5.7), (1.2, 0.6), front_only)];
        let report = validate(&room, &layout, &AccessConfig::default()).unwrap();
        assert!(report.passed());
        assert_eq!(report.items[0].reached_side, Some(Side::Front));
    }

    #[test]
    fn test_approach_targets_offsets() {
        let item = placed("desk", (3.0, 3.0), (1.0, 0.6), approach());
        let targets = approach_targets(&item, &Side::ALL, &AccessConfig::default());
        let expect: [(Side, (f32, f32)); 4] = [
            (Side::Front, (3.0, 2.15)),
            (Side::Back, (3.0, 3.85)),
            (Side::Left, (1.95, 3.0)),
            (Side::Right, (4.05, 3.0)),
        ];
        for ((side, (x, y)), (es, (ex, ey))) in targets.iter().zip(expect.iter()) {
            assert_eq!(side, es);
            assert!((x - ex).abs() < 1e-5 && (y - ey).abs() < 1e-5, "{}: ({}, {})", side, x, y);
        }
    }

    #[test]
    fn test_blocked_entry_fails_everything() {
        let room = Room::with_size(4.0, 4.0, 2.5).unwrap();
        let layout = vec![
            placed("doorstop", (2.0, 0.3), (0.6, 0.6), Constraints::default()),
            placed("chair", (2.0, 3.0), (0.5, 0.5), approach()),
        ];
        let report = validate(&room, &layout, &AccessConfig::default()).unwrap();
        assert_eq!(report.unreachable(), vec!["chair"]);
    }
}
