//! Furniture catalog: entries, constraint policies and per-run item draws.
//!
//! The catalog is exported by an external collaborator as JSON:
//!
//! ```json
//! {"items": [
//!   {"name": "bedroom_bed_1",
//!    "min_size_mm": [1800, 900, 400], "max_size_mm": [2000, 1000, 500],
//!    "color": [0.7, 0.7, 0.7],
//!    "constraints": {"touch_wall": true, "touch_wall_sides": ["back"],
//!                    "human_approach": true}}
//! ]}
//! ```
//!
//! Raw constraint keys are resolved once per entry into tagged policies
//! ([`HeightPolicy`], [`WallPolicy`], [`ApproachPolicy`]); the placement
//! engine never looks at the raw keys.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::geometry::Side;

/// Raw constraint options as they appear in the catalog.
///
/// Keys the planner does not use (`on_floor`, `in_corner`, `free_side`, ...)
/// are ignored on parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// Fixed center height above the floor (wall/ceiling fixtures).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_height_m: Option<f32>,
    pub under_ceiling: bool,
    pub touch_wall: bool,
    /// Walls allowed for `touch_wall`; all four when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch_wall_sides: Option<Vec<Side>>,
    pub human_approach: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_side_named: Option<NamedSide>,
}

/// `{"side": "front"}`. Other fields (e.g. `distance`) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NamedSide {
    pub side: Side,
}

/// Vertical placement rule. Exactly one applies per item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightPolicy {
    /// Center sits this many meters above the floor.
    Mounted(f32),
    /// Top face at the ceiling.
    UnderCeiling,
    /// Bottom face on the floor.
    Floor,
}

/// Wall contact rule.
#[derive(Debug, Clone, PartialEq)]
pub enum WallPolicy {
    Free,
    /// One of these sides must sit flush with the matching wall.
    Touching(Vec<Side>),
}

/// Which sides a walking agent must be able to reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApproachPolicy {
    None,
    AnySide,
    Side(Side),
}

impl ApproachPolicy {
    /// Sides to try, in order.
    pub fn sides(self) -> Vec<Side> {
        match self {
            ApproachPolicy::None => Vec::new(),
            ApproachPolicy::AnySide => Side::ALL.to_vec(),
            ApproachPolicy::Side(side) => vec![side],
        }
    }
}

/// Constraints resolved into one tagged rule per concern.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPolicy {
    pub height: HeightPolicy,
    pub wall: WallPolicy,
    pub approach: ApproachPolicy,
}

impl PlacementPolicy {
    /// Wall- or ceiling-mounted items hang above the walker and are never
    /// checked for approach.
    pub fn is_suspended(&self) -> bool {
        !matches!(self.height, HeightPolicy::Floor)
    }

    /// Whether the accessibility validator must find a path to this item.
    pub fn needs_approach(&self) -> bool {
        self.approach != ApproachPolicy::None && !self.is_suspended()
    }
}

impl Constraints {
    /// Resolve the raw options. Mount height wins over `under_ceiling`.
    pub fn resolve(&self) -> Result<PlacementPolicy> {
        let height = match self.mount_height_m {
            Some(h) if !h.is_finite() => {
                return Err(PlacementError::InvalidCatalog(format!(
                    "mount height {} is not finite",
                    h
                )))
            }
            Some(h) => HeightPolicy::Mounted(h),
            None if self.under_ceiling => HeightPolicy::UnderCeiling,
            None => HeightPolicy::Floor,
        };

        let wall = if self.touch_wall {
            let sides = self
                .touch_wall_sides
                .clone()
                .unwrap_or_else(|| Side::ALL.to_vec());
            if sides.is_empty() {
                return Err(PlacementError::InvalidCatalog(
                    "touch_wall set with an empty touch_wall_sides list".into(),
                ));
            }
            WallPolicy::Touching(sides)
        } else {
            WallPolicy::Free
        };

        let approach = match (self.human_approach, self.free_side_named) {
            (false, _) => ApproachPolicy::None,
            (true, Some(named)) => ApproachPolicy::Side(named.side),
            (true, None) => ApproachPolicy::AnySide,
        };

        Ok(PlacementPolicy {
            height,
            wall,
            approach,
        })
    }
}

fn default_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// One catalog record. Sizes are millimeters, `[x, y, z]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub min_size_mm: [f32; 3],
    pub max_size_mm: [f32; 3],
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default)]
    pub constraints: Constraints,
}

impl CatalogEntry {
    pub fn new(name: &str, min_size_mm: [f32; 3], max_size_mm: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            min_size_mm,
            max_size_mm,
            color: default_color(),
            constraints: Constraints::default(),
        }
    }

    /// Fixed-size entry (min == max).
    pub fn fixed(name: &str, size_mm: [f32; 3]) -> Self {
        Self::new(name, size_mm, size_mm)
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    /// Check size ranges and resolve the constraint policy.
    pub fn policy(&self) -> Result<PlacementPolicy> {
        for axis in 0..3 {
            let (lo, hi) = (self.min_size_mm[axis], self.max_size_mm[axis]);
            if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo > hi {
                return Err(PlacementError::InvalidCatalog(format!(
                    "'{}' has invalid size range on axis {}: [{}, {}] mm",
                    self.name, axis, lo, hi
                )));
            }
        }
        self.constraints.resolve().map_err(|e| match e {
            PlacementError::InvalidCatalog(msg) => {
                PlacementError::InvalidCatalog(format!("'{}': {}", self.name, msg))
            }
            other => other,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    items: Vec<CatalogEntry>,
}

/// Name-indexed catalog. A later entry with a repeated name replaces the
/// earlier one.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Parse the `{"items": [...]}` export and validate every entry.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        for entry in &file.items {
            entry.policy()?;
        }
        Ok(Self::from_entries(file.items))
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Look up each requested name in order. Fails on the first unknown one.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<CatalogEntry>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .cloned()
                    .ok_or_else(|| PlacementError::UnknownCatalogItem {
                        name: name.to_string(),
                    })
            })
            .collect()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(|k| k.as_str())
    }
}

/// One random draw from a catalog entry, sized in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInstance {
    pub name: String,
    pub sx: f32,
    pub sy: f32,
    pub sz: f32,
    pub color: [f32; 3],
    pub policy: PlacementPolicy,
}

impl ItemInstance {
    /// Sample each axis independently and uniformly from the entry's range.
    /// `policy` must come from `entry.policy()`.
    pub fn sample<R: Rng + ?Sized>(entry: &CatalogEntry, policy: &PlacementPolicy, rng: &mut R) -> Self {
        let mut size = [0.0f32; 3];
        for (axis, s) in size.iter_mut().enumerate() {
            let mm = rng.gen_range(entry.min_size_mm[axis]..=entry.max_size_mm[axis]);
            *s = mm / 1000.0;
        }
        Self {
            name: entry.name.clone(),
            sx: size[0],
            sy: size[1],
            sz: size[2],
            color: entry.color,
            policy: policy.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CATALOG_JSON: &str = r#"{
        "items": [
            {"name": "bedroom_bed_1", "min_size_mm": [1800, 900, 400], "max_size_mm": [2000, 1000, 500],
             "constraints": {"on_floor": true, "touch_wall": true, "touch_wall_sides": ["back", "left"],
                             "human_approach": true, "in_corner": false, "free_side": null,
                             "free_side_named": {"side": "front", "distance": 600}}},
            {"name": "lighting_lamp_1", "min_size_mm": [150, 150, 150], "max_size_mm": [300, 300, 300],
             "color": [1.0, 0.9, 0.2],
             "constraints": {"under_ceiling": true, "human_approach": true}},
            {"name": "sconce", "min_size_mm": [200, 100, 200], "max_size_mm": [200, 100, 200],
             "constraints": {"mount_height_m": 1.8, "under_ceiling": true}}
        ]
    }"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        assert_eq!(catalog.len(), 3);
        let bed = catalog.get("bedroom_bed_1").unwrap();
        assert_eq!(bed.color, [1.0, 1.0, 1.0]);
        let policy = bed.policy().unwrap();
        assert_eq!(policy.height, HeightPolicy::Floor);
        assert_eq!(policy.wall, WallPolicy::Touching(vec![Side::Back, Side::Left]));
        assert_eq!(policy.approach, ApproachPolicy::Side(Side::Front));
        assert!(policy.needs_approach());
    }

    #[test]
    fn test_mount_height_beats_under_ceiling() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        let sconce = catalog.get("sconce").unwrap().policy().unwrap();
        assert_eq!(sconce.height, HeightPolicy::Mounted(1.8));
        let lamp = catalog.get("lighting_lamp_1").unwrap().policy().unwrap();
        assert_eq!(lamp.height, HeightPolicy::UnderCeiling);
        // Hanging lamps are never approach-checked.
        assert!(!lamp.needs_approach());
    }

    #[test]
    fn test_touch_wall_defaults_to_all_sides() {
        let policy = Constraints {
            touch_wall: true,
            ..Constraints::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(policy.wall, WallPolicy::Touching(Side::ALL.to_vec()));
    }

    #[test]
    fn test_empty_wall_sides_rejected() {
        let result = Constraints {
            touch_wall: true,
            touch_wall_sides: Some(vec![]),
            ..Constraints::default()
        }
        .resolve();
        assert!(matches!(result, Err(PlacementError::InvalidCatalog(_))));
    }

    #[test]
    fn test_inverted_size_range_rejected() {
        let entry = CatalogEntry::new("bad", [500.0, 500.0, 500.0], [400.0, 600.0, 600.0]);
        let err = entry.policy().unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        let err = catalog.resolve(&["sconce", "unicorn"]).unwrap_err();
        match err {
            PlacementError::UnknownCatalogItem { name } => assert_eq!(name, "unicorn"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_names_are_distinct() {
        let mut catalog_entries = Catalog::from_json(CATALOG_JSON).unwrap().entries;
        catalog_entries.push(CatalogEntry::fixed("sconce", [100.0, 100.0, 100.0]));
        let catalog = Catalog::from_entries(catalog_entries);
        let mut names: Vec<_> = catalog.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["bedroom_bed_1", "lighting_lamp_1", "sconce"]);
        // A repeated name resolves to the later entry.
        assert_eq!(catalog.get("sconce").unwrap().min_size_mm, [100.0; 3]);
    }

    #[test]
    fn test_resolve_keeps_request_order_and_repeats() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        let entries = catalog
            .resolve(&["sconce", "bedroom_bed_1", "sconce"])
            .unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["sconce", "bedroom_bed_1", "sconce"]);
    }

    #[test]
    fn test_sample_within_range_in_meters() {
        let entry = CatalogEntry::new("chair", [400.0, 450.0, 700.0], [700.0, 700.0, 1000.0]);
        let policy = entry.policy().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let item = ItemInstance::sample(&entry, &policy, &mut rng);
            assert!((0.4..=0.7).contains(&item.sx));
            assert!((0.45..=0.7).contains(&item.sy));
            assert!((0.7..=1.0).contains(&item.sz));
        }
    }

    #[test]
    fn test_fixed_entry_samples_exact_size() {
        let entry = CatalogEntry::fixed("cube", [1000.0, 1000.0, 1000.0]);
        let policy = entry.policy().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let item = ItemInstance::sample(&entry, &policy, &mut rng);
        assert_eq!((item.sx, item.sy, item.sz), (1.0, 1.0, 1.0));
    }
}
