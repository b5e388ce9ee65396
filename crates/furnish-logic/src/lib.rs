//! Pure placement logic for Furnish.
//!
//! Places furniture with randomized sizes inside a rectangular room,
//! honoring per-item height, wall-contact and human-approach rules, then
//! checks that a person-sized walker can reach every item that needs it.
//! Functions take plain data and return results: no file I/O, no global
//! state, and every random choice comes from an injected RNG so a seed
//! reproduces a layout exactly.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`access`] | Human-approach validation (entry point, approach targets, report) |
//! | [`catalog`] | Catalog entries, JSON ingestion, constraint policies, item draws |
//! | [`config`] | Retry budgets, wall tolerances, walker size, grid step |
//! | [`error`] | `PlacementError` and the crate `Result` alias |
//! | [`geometry`] | Room bounds, AABBs, rotated footprints, sides |
//! | [`grid`] | Walkability raster with world/cell mapping |
//! | [`layout`] | Serializable layout document and walker bands |
//! | [`pathfinding`] | 4-connected A* over the walkability grid |
//! | [`placement`] | Randomized placement with full-restart backtracking |
//! | [`planner`] | `place_and_validate` pipeline |
//!
//! # Example
//!
//! ```
//! use furnish_logic::catalog::CatalogEntry;
//! use furnish_logic::geometry::Room;
//! use furnish_logic::planner::place_and_validate;
//!
//! let room = Room::with_size(6.0, 5.0, 2.6).unwrap();
//! let table = CatalogEntry::new("table", [800.0, 800.0, 700.0], [1000.0, 1000.0, 750.0]);
//! let layout = place_and_validate(&room, &[table], 42).unwrap();
//! assert_eq!(layout.items.len(), 1);
//! ```

pub mod access;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod pathfinding;
pub mod placement;
pub mod planner;

pub use error::{PlacementError, Result};
