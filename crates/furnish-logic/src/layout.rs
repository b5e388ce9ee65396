//! Renderer-facing output: the accepted layout document and walker bands.
//!
//! The document is what downstream visualization consumes. Every item
//! carries its final pose, box, color and forward vector. Items that needed
//! human approach also carry the route the walker took to reach them.

use serde::{Deserialize, Serialize};

use crate::access::AccessReport;
use crate::error::Result;
use crate::geometry::{Aabb, Room, Side};
use crate::placement::PlacedItem;

/// One quad of a walker band, corners in drawing order.
pub type BandQuad = [(f32, f32); 4];

/// Centers of the six AABB faces, for snapping attachments and labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchors {
    pub front: [f32; 3],
    pub back: [f32; 3],
    pub left: [f32; 3],
    pub right: [f32; 3],
    pub top: [f32; 3],
    pub bottom: [f32; 3],
}

impl Anchors {
    fn of(p: &PlacedItem) -> Self {
        let arr = |(x, y, z): (f32, f32, f32)| [x, y, z];
        Self {
            front: arr(p.face_center(Side::Front)),
            back: arr(p.face_center(Side::Back)),
            left: arr(p.face_center(Side::Left)),
            right: arr(p.face_center(Side::Right)),
            top: arr(p.top_center()),
            bottom: arr(p.bottom_center()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub name: String,
    pub center: [f32; 3],
    /// Unrotated size, meters.
    pub size: [f32; 3],
    pub rotation: f32,
    pub aabb: Aabb,
    pub color: [f32; 3],
    pub forward: [f32; 3],
    pub wall_contact_side: Option<Side>,
    pub anchors: Anchors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approach_side: Option<Side>,
    /// Walker route at floor height, entry point first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approach_path: Option<Vec<[f32; 2]>>,
}

impl LayoutItem {
    fn from_placed(p: &PlacedItem) -> Self {
        let (fx, fy, fz) = p.forward_vector();
        Self {
            name: p.name().to_string(),
            center: [p.cx, p.cy, p.cz],
            size: [p.item.sx, p.item.sy, p.item.sz],
            rotation: p.rotation,
            aabb: p.aabb(),
            color: p.item.color,
            forward: [fx, fy, fz],
            wall_contact_side: p.wall_contact_side,
            anchors: Anchors::of(p),
            approach_side: None,
            approach_path: None,
        }
    }
}

/// A fully placed and approach-validated room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub room: Room,
    pub seed: u64,
    /// Where the walker enters the room.
    pub entry: [f32; 2],
    pub items: Vec<LayoutItem>,
}

impl Layout {
    pub fn new(room: &Room, seed: u64, placed: &[PlacedItem], report: &AccessReport) -> Self {
        let mut items: Vec<LayoutItem> = placed.iter().map(LayoutItem::from_placed).collect();
        for access in &report.items {
            if let Some(item) = items.get_mut(access.index) {
                item.approach_side = access.reached_side;
                item.approach_path = access
                    .path
                    .as_ref()
                    .map(|path| path.iter().map(|&(x, y)| [x, y]).collect());
            }
        }
        Self {
            room: *room,
            seed,
            entry: [report.start.0, report.start.1],
            items,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Walker bands for every item that has an approach path.
    pub fn bands(&self, agent_width: f32) -> Vec<(&str, Vec<BandQuad>)> {
        self.items
            .iter()
            .filter_map(|item| {
                let path = item.approach_path.as_ref()?;
                let points: Vec<(f32, f32)> = path.iter().map(|p| (p[0], p[1])).collect();
                Some((item.name.as_str(), path_to_band(&points, agent_width)))
            })
            .collect()
    }
}

/// Expand a polyline into one rectangle per segment, `width` wide and
/// centered on the segment. Zero-length segments are skipped.
pub fn path_to_band(path: &[(f32, f32)], width: f32) -> Vec<BandQuad> {
    let half = width / 2.0;
    path.windows(2)
        .filter_map(|seg| {
            let ((x1, y1), (x2, y2)) = (seg[0], seg[1]);
            let (dx, dy) = (x2 - x1, y2 - y1);
            let len = dx.hypot(dy);
            if len == 0.0 {
                return None;
            }
            // Unit normal to the direction of travel.
            let (nx, ny) = (-dy / len, dx / len);
            Some([
                (x1 + nx * half, y1 + ny * half),
                (x1 - nx * half, y1 - ny * half),
                (x2 - nx * half, y2 - ny * half),
                (x2 + nx * half, y2 + ny * half),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ItemAccess;
    use crate::catalog::{CatalogEntry, ItemInstance};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_band_along_x() {
        let quads = path_to_band(&[(0.0, 0.0), (1.0, 0.0)], 1.0);
        assert_eq!(quads.len(), 1);
        assert_eq!(
            quads[0],
            [(0.0, 0.5), (0.0, -0.5), (1.0, -0.5), (1.0, 0.5)]
        );
    }

    #[test]
    fn test_band_skips_repeated_points() {
        let quads = path_to_band(&[(0.0, 0.0), (0.0, 0.0), (0.0, 2.0)], 0.6);
        assert_eq!(quads.len(), 1);
        let q = quads[0];
        assert!((q[0].0 + 0.3).abs() < 1e-6 && q[0].1 == 0.0);
        assert!((q[2].0 - 0.3).abs() < 1e-6 && q[2].1 == 2.0);
    }

    #[test]
    fn test_band_of_single_point_is_empty() {
        assert!(path_to_band(&[(1.0, 1.0)], 1.0).is_empty());
        assert!(path_to_band(&[], 1.0).is_empty());
    }

    #[test]
    fn test_layout_document_carries_paths() {
        let room = Room::with_size(4.0, 3.0, 2.5).unwrap();
        let entry = CatalogEntry::fixed("desk", [1000.0, 600.0, 750.0]).with_color([0.2, 0.4, 0.6]);
        let policy = entry.policy().unwrap();
        let item = ItemInstance::sample(&entry, &policy, &mut StdRng::seed_from_u64(0));
        let placed = vec![PlacedItem::new(item, (2.0, 2.0, 0.375), 90.0, Some(Side::Back))];
        let report = AccessReport {
            start: (2.0, 0.5),
            items: vec![ItemAccess {
                index: 0,
                name: "desk".into(),
                reached_side: Some(Side::Front),
                path: Some(vec![(2.05, 0.55), (2.05, 0.65)]),
            }],
        };

        let layout = Layout::new(&room, 7, &placed, &report);
        let item = &layout.items[0];
        assert_eq!(item.color, [0.2, 0.4, 0.6]);
        assert_eq!(item.wall_contact_side, Some(Side::Back));
        assert_eq!(item.approach_side, Some(Side::Front));
        assert_eq!(item.approach_path.as_ref().map(Vec::len), Some(2));
        assert!((item.forward[0] + 1.0).abs() < 1e-6);
        // Quarter turn: the 1.0 × 0.6 desk covers 0.6 along X and 1.0 along Y.
        assert!((item.anchors.front[1] - 1.5).abs() < 1e-5);
        assert!((item.anchors.back[1] - 2.5).abs() < 1e-5);
        assert!((item.anchors.left[0] - 1.7).abs() < 1e-5);
        assert!((item.anchors.right[0] - 2.3).abs() < 1e-5);
        assert!((item.anchors.top[2] - 0.75).abs() < 1e-5);
        assert!(item.anchors.bottom[2].abs() < 1e-5);

        let json = layout.to_json_pretty().unwrap();
        assert!(json.contains("\"wall_contact_side\": \"back\""));
        let back = Layout::from_json(&json).unwrap();
        assert_eq!(back.items[0].name, "desk");
        assert_eq!(layout.bands(1.0).len(), 1);
    }
}
