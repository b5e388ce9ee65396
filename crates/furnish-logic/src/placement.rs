//! Randomized constrained placement with full-restart backtracking.
//!
//! Algorithm:
//! 1. Draw a fresh [`ItemInstance`] for every requested entry
//! 2. Seat items strictly in request order; each item gets up to
//!    `item_trials` random poses (rotation, center, height rule, wall rule)
//! 3. A pose is kept only if it is inside the room, overlaps nothing placed
//!    so far and, for wall items, actually sits within tolerance of its wall
//! 4. If one item runs out of trials the whole attempt is thrown away and
//!    the next attempt re-samples every size (no partial repair)
//! 5. After `global_attempts` failures, report the last item that would not fit

use log::{debug, info};
use rand::Rng;

use crate::catalog::{CatalogEntry, HeightPolicy, ItemInstance, WallPolicy};
use crate::config::PlacementConfig;
use crate::error::{PlacementError, Result};
use crate::geometry::{rotated_footprint, Aabb, Room, Side};

/// An item bound to a pose.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub item: ItemInstance,
    pub cx: f32,
    pub cy: f32,
    pub cz: f32,
    /// Degrees, a multiple of the rotation step in [0, 360).
    pub rotation: f32,
    /// Wall this item was pushed against, if any.
    pub wall_contact_side: Option<Side>,
    rx: f32,
    ry: f32,
    z_min: f32,
    z_max: f32,
}

impl PlacedItem {
    pub fn new(
        item: ItemInstance,
        center: (f32, f32, f32),
        rotation: f32,
        wall_contact_side: Option<Side>,
    ) -> Self {
        let (rx, ry) = rotated_footprint(item.sx, item.sy, rotation);
        let half_z = item.sz / 2.0;
        Self {
            item,
            cx: center.0,
            cy: center.1,
            cz: center.2,
            rotation,
            wall_contact_side,
            rx,
            ry,
            z_min: center.2 - half_z,
            z_max: center.2 + half_z,
        }
    }

    /// Pin the vertical span exactly, e.g. onto the floor or ceiling plane,
    /// instead of deriving it from `cz`.
    pub fn with_z_span(mut self, z_min: f32, z_max: f32) -> Self {
        self.z_min = z_min;
        self.z_max = z_max;
        self
    }

    pub fn name(&self) -> &str {
        &self.item.name
    }

    /// Rotated floor extents (rx, ry).
    pub fn footprint(&self) -> (f32, f32) {
        (self.rx, self.ry)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_footprint(self.cx, self.cy, self.rx, self.ry, self.z_min, self.z_max)
    }

    /// Local +Y rotated by `rotation` about Z.
    pub fn forward_vector(&self) -> (f32, f32, f32) {
        let a = self.rotation.to_radians();
        (-a.sin(), a.cos(), 0.0)
    }

    /// Center of the given vertical face of the AABB.
    pub fn face_center(&self, side: Side) -> (f32, f32, f32) {
        let b = self.aabb();
        match side {
            Side::Front => (self.cx, b.y_min, self.cz),
            Side::Back => (self.cx, b.y_max, self.cz),
            Side::Left => (b.x_min, self.cy, self.cz),
            Side::Right => (b.x_max, self.cy, self.cz),
        }
    }

    pub fn top_center(&self) -> (f32, f32, f32) {
        (self.cx, self.cy, self.z_max)
    }

    pub fn bottom_center(&self) -> (f32, f32, f32) {
        (self.cx, self.cy, self.z_min)
    }

    /// Whether `side`'s face lies within `epsilon` of the matching wall.
    pub fn is_side_touching_wall(&self, side: Side, room: &Room, epsilon: f32) -> bool {
        (self.aabb().face(side) - room.wall(side)).abs() < epsilon
    }
}

/// Outer retry loop states.
#[derive(Debug)]
pub enum PlacementState {
    /// Attempt `attempt` (1-based) is drawing sizes and seating items.
    SamplingItem { attempt: u32 },
    /// `item` exhausted its trials during `attempt`.
    AttemptFailed { attempt: u32, item: String },
    AttemptSucceeded { attempt: u32, placed: Vec<PlacedItem> },
    AllAttemptsExhausted { attempts: u32, item: String },
}

/// Place every entry, restarting from scratch whenever one item cannot be
/// seated. Entries are processed in the given order.
pub fn place<R: Rng + ?Sized>(
    room: &Room,
    entries: &[CatalogEntry],
    config: &PlacementConfig,
    rng: &mut R,
) -> Result<Vec<PlacedItem>> {
    let budget = config.global_attempts.max(1);
    let mut state = PlacementState::SamplingItem { attempt: 1 };

    loop {
        state = match state {
            PlacementState::SamplingItem { attempt } => {
                match place_attempt(room, entries, config, rng) {
                    Ok(placed) => PlacementState::AttemptSucceeded { attempt, placed },
                    Err(PlacementError::ItemDoesNotFit { item, trials }) => {
                        debug!(
                            "Attempt {}/{} abandoned: '{}' did not fit in {} trials",
                            attempt, budget, item, trials
                        );
                        PlacementState::AttemptFailed { attempt, item }
                    }
                    Err(e) => return Err(e),
                }
            }
            PlacementState::AttemptFailed { attempt, item } if attempt >= budget => {
                PlacementState::AllAttemptsExhausted {
                    attempts: attempt,
                    item,
                }
            }
            PlacementState::AttemptFailed { attempt, .. } => {
                PlacementState::SamplingItem {
                    attempt: attempt + 1,
                }
            }
            PlacementState::AttemptSucceeded { attempt, placed } => {
                info!(
                    "Placed {} items on attempt {}/{}",
                    placed.len(),
                    attempt,
                    budget
                );
                return Ok(placed);
            }
            PlacementState::AllAttemptsExhausted { attempts, item } => {
                return Err(PlacementError::PlacementExhausted { item, attempts });
            }
        };
    }
}

/// One global attempt: fresh sizes for every entry, seated in order.
///
/// Fails with [`PlacementError::ItemDoesNotFit`] naming the first item that
/// ran out of trials; nothing placed so far is returned.
pub fn place_attempt<R: Rng + ?Sized>(
    room: &Room,
    entries: &[CatalogEntry],
    config: &PlacementConfig,
    rng: &mut R,
) -> Result<Vec<PlacedItem>> {
    room.validate()?;
    let rotations = config.rotations();

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let policy = entry.policy()?;
        items.push(ItemInstance::sample(entry, &policy, rng));
    }

    let mut placed: Vec<PlacedItem> = Vec::with_capacity(items.len());
    for item in items {
        match seat_item(room, &item, &placed, config, &rotations, rng) {
            Some(pose) => {
                let (z_min, z_max) = pose.z_span;
                placed.push(
                    PlacedItem::new(item, pose.center, pose.rotation, pose.wall_side)
                        .with_z_span(z_min, z_max),
                );
            }
            None => {
                return Err(PlacementError::ItemDoesNotFit {
                    item: item.name,
                    trials: config.item_trials,
                });
            }
        }
    }
    Ok(placed)
}

/// Uniform draw in [lo, hi]; `None` when the item is larger than the room
/// on this axis.
fn uniform_in<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> Option<f32> {
    if lo > hi {
        None
    } else {
        Some(rng.gen_range(lo..=hi))
    }
}

/// An accepted pose from [`seat_item`].
struct Pose {
    center: (f32, f32, f32),
    z_span: (f32, f32),
    rotation: f32,
    wall_side: Option<Side>,
}

/// Vertical center and exact (bottom, top) span for an item of height `sz`.
/// Floor and ceiling items are pinned to the room planes so the box never
/// strays past them by rounding.
fn vertical_span(room: &Room, height: HeightPolicy, sz: f32) -> (f32, (f32, f32)) {
    match height {
        HeightPolicy::Mounted(h) => {
            let cz = room.z_min + h;
            (cz, (cz - sz / 2.0, cz + sz / 2.0))
        }
        HeightPolicy::UnderCeiling => {
            let z_min = room.z_max - sz;
            ((z_min + room.z_max) / 2.0, (z_min, room.z_max))
        }
        HeightPolicy::Floor => {
            let z_max = room.z_min + sz;
            ((room.z_min + z_max) / 2.0, (room.z_min, z_max))
        }
    }
}

/// Random pose search for one item.
fn seat_item<R: Rng + ?Sized>(
    room: &Room,
    item: &ItemInstance,
    placed: &[PlacedItem],
    config: &PlacementConfig,
    rotations: &[f32],
    rng: &mut R,
) -> Option<Pose> {
    if rotations.is_empty() {
        return None;
    }
    let room_box = room.aabb();

    for _ in 0..config.item_trials {
        let rotation = rotations[rng.gen_range(0..rotations.len())];
        let (rx, ry) = rotated_footprint(item.sx, item.sy, rotation);

        // Naive baseline: anywhere inside the room on all three axes.
        let Some(mut cx) = uniform_in(rng, room.x_min + rx / 2.0, room.x_max - rx / 2.0) else {
            continue;
        };
        let Some(mut cy) = uniform_in(rng, room.y_min + ry / 2.0, room.y_max - ry / 2.0) else {
            continue;
        };
        // The Z draw is replaced by the height rule; it only rejects items
        // taller than the room.
        if uniform_in(rng, room.z_min + item.sz / 2.0, room.z_max - item.sz / 2.0).is_none() {
            continue;
        }

        let (cz, (z_min, z_max)) = vertical_span(room, item.policy.height, item.sz);

        let mut wall_side = None;
        if let WallPolicy::Touching(sides) = &item.policy.wall {
            let side = sides[rng.gen_range(0..sides.len())];
            let margin = config.wall_margin_m;
            match side {
                Side::Front => cy = room.y_min + ry / 2.0 + margin,
                Side::Back => cy = room.y_max - ry / 2.0 - margin,
                Side::Left => cx = room.x_min + rx / 2.0 + margin,
                Side::Right => cx = room.x_max - rx / 2.0 - margin,
            }
            wall_side = Some(side);
        }

        let candidate = Aabb::from_footprint(cx, cy, rx, ry, z_min, z_max);
        if !room_box.contains(&candidate) {
            continue;
        }
        if placed.iter().any(|other| candidate.intersects(&other.aabb())) {
            continue;
        }
        if let Some(side) = wall_side {
            if (candidate.face(side) - room.wall(side)).abs() >= config.wall_epsilon_m {
                continue;
            }
        }

        return Some(Pose {
            center: (cx, cy, cz),
            z_span: (z_min, z_max),
            rotation,
            wall_side,
        });
    }
    None
}
