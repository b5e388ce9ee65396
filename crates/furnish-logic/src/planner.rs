//! The full pipeline: place, validate human approach, export.
//!
//! A run is a pure function of (room, entries, seed, config). When the
//! walker cannot reach an item the whole layout is rejected; picking a new
//! seed and trying again is the caller's business.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::access::validate;
use crate::catalog::CatalogEntry;
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::geometry::Room;
use crate::layout::Layout;
use crate::placement::place;

/// [`place_and_validate_with`] using the default configuration.
pub fn place_and_validate(room: &Room, entries: &[CatalogEntry], seed: u64) -> Result<Layout> {
    place_and_validate_with(room, entries, seed, &PlannerConfig::default())
}

/// Place every entry and check human approach. Either the whole layout is
/// valid and reachable, or an error is returned and nothing is kept.
pub fn place_and_validate_with(
    room: &Room,
    entries: &[CatalogEntry],
    seed: u64,
    config: &PlannerConfig,
) -> Result<Layout> {
    config.validate()?;
    room.validate()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let placed = place(room, entries, &config.placement, &mut rng)?;
    let report = validate(room, &placed, &config.access)?.into_result()?;

    info!(
        "Seed {}: {} items placed, {} approach-checked",
        seed,
        placed.len(),
        report.items.len()
    );
    Ok(Layout::new(room, seed, &placed, &report))
}
