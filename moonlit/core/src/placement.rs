//! Placement Engine
//!
//! Assigns every body an on-screen position by rejection sampling inside a safe
//! rectangle, keeping clear of the moon and of bodies that are already placed.
//!
//! # Stability
//!
//! A position is assigned once per entry and never recomputed, even when the
//! viewport later changes size. Callers pass the existing positions back in and
//! only entries without one are sampled.
//!
//! # Degraded placement
//!
//! After `max_attempts` rejected candidates the last candidate is accepted anyway.
//! The returned [`Placement`] says whether it was collision-free so callers can
//! tell a crowded sky from a clean one; overlap is never reported as an error.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::entries::EntryId;

/// A point in viewport pixel space (top-left of the body sprite)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset in pixels
    pub x: f64,
    /// Vertical offset in pixels
    pub y: f64,
}

impl Position {
    /// Create a position
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Viewport size in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Moon disk used as the exclusion zone
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonGeometry {
    /// Moon centre in viewport space
    pub center: Position,
    /// Moon radius in pixels
    pub radius: f64,
}

/// Rectangle candidates are sampled from
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafeRect {
    /// Smallest x
    pub min_x: f64,
    /// Largest x
    pub max_x: f64,
    /// Smallest y
    pub min_y: f64,
    /// Largest y
    pub max_y: f64,
}

impl SafeRect {
    /// Whether a point lies inside the rectangle
    #[must_use]
    pub fn contains(&self, position: &Position) -> bool {
        position.x >= self.min_x
            && position.x <= self.max_x.max(self.min_x)
            && position.y >= self.min_y
            && position.y <= self.max_y.max(self.min_y)
    }
}

/// Placement tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Moon radius in pixels
    pub moon_radius: f64,
    /// Extra clearance around the moon (halo)
    pub safety_margin: f64,
    /// Body sprite edge length in pixels
    pub body_size: f64,
    /// Minimum separation between bodies, as a multiple of `body_size`
    pub separation_factor: f64,
    /// Reserved space above the sky
    pub top_margin: f64,
    /// Reserved space below the sky (input area)
    pub bottom_margin: f64,
    /// Reserved space on the left and right
    pub side_margin: f64,
    /// Candidates sampled before accepting a colliding one
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            moon_radius: 150.0,
            safety_margin: 80.0,
            body_size: 48.0,
            separation_factor: 1.5,
            top_margin: 120.0,
            bottom_margin: 180.0,
            side_margin: 100.0,
            max_attempts: 100,
        }
    }
}

impl PlacementConfig {
    /// Minimum distance from a body to the moon centre
    #[must_use]
    pub fn min_moon_distance(&self) -> f64 {
        self.moon_radius + self.safety_margin
    }

    /// Minimum distance between two bodies
    #[must_use]
    pub fn min_separation(&self) -> f64 {
        self.body_size * self.separation_factor
    }

    /// Moon geometry for a viewport
    ///
    /// The centre sits halfway between the top and bottom margins.
    #[must_use]
    pub fn moon_for(&self, viewport: Viewport) -> MoonGeometry {
        MoonGeometry {
            center: Position::new(
                viewport.width / 2.0,
                (viewport.height - self.top_margin - self.bottom_margin) / 2.0 + self.top_margin,
            ),
            radius: self.moon_radius,
        }
    }

    /// Rectangle that keeps the whole sprite on screen
    #[must_use]
    pub fn safe_rect(&self, viewport: Viewport) -> SafeRect {
        SafeRect {
            min_x: self.side_margin,
            max_x: viewport.width - self.side_margin - self.body_size,
            min_y: self.top_margin,
            max_y: viewport.height - self.bottom_margin - self.body_size,
        }
    }
}

/// Outcome of placing a single body
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Accepted position
    pub position: Position,
    /// Whether the position satisfies every clearance rule
    pub collision_free: bool,
    /// Candidates sampled, including the accepted one
    pub attempts: u32,
}

/// Result of a batch placement
#[derive(Clone, Debug, Default)]
pub struct PlacementReport {
    /// Every requested ID with its position, plus all previously known positions
    pub positions: HashMap<EntryId, Position>,
    /// Entries that were sampled in this call, in request order
    pub placed: Vec<(EntryId, Placement)>,
}

impl PlacementReport {
    /// Number of entries that had to accept a colliding position
    #[must_use]
    pub fn degraded_count(&self) -> usize {
        self.placed.iter().filter(|(_, p)| !p.collision_free).count()
    }
}

/// Rejection-sampling placement engine
#[derive(Clone, Debug)]
pub struct PlacementEngine {
    config: PlacementConfig,
    rng: StdRng,
}

impl PlacementEngine {
    /// Create an engine seeded from system entropy
    #[must_use]
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine with a fixed seed (reproducible layouts)
    #[must_use]
    pub fn with_seed(config: PlacementConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Placement tuning
    #[must_use]
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Assign positions to every ID that does not have one yet
    ///
    /// IDs already present in `existing` keep their position unconditionally. New
    /// candidates must clear the moon and every position known so far, whether it
    /// came from `existing` or was accepted earlier in this call.
    pub fn assign_positions<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a EntryId>,
        existing: &HashMap<EntryId, Position>,
        viewport: Viewport,
        moon: &MoonGeometry,
    ) -> PlacementReport {
        let mut report = PlacementReport {
            positions: existing.clone(),
            placed: Vec::new(),
        };
        let mut occupied: Vec<Position> = existing.values().copied().collect();

        for id in ids {
            if report.positions.contains_key(id) {
                continue;
            }

            let placement = self.place(viewport, moon, &occupied);
            if !placement.collision_free {
                tracing::debug!(
                    entry_id = %id,
                    attempts = placement.attempts,
                    "Accepted overlapping position after exhausting retries"
                );
            }

            occupied.push(placement.position);
            report.positions.insert(id.clone(), placement.position);
            report.placed.push((id.clone(), placement));
        }

        report
    }

    /// Sample one position clear of the moon and of `occupied`
    pub fn place(
        &mut self,
        viewport: Viewport,
        moon: &MoonGeometry,
        occupied: &[Position],
    ) -> Placement {
        let rect = self.config.safe_rect(viewport);
        let max_attempts = self.config.max_attempts.max(1);

        let mut attempts = 0;
        loop {
            attempts += 1;
            let candidate = self.sample(&rect);
            let collision_free = self.is_clear(&candidate, moon, occupied);

            if collision_free || attempts >= max_attempts {
                return Placement {
                    position: candidate,
                    collision_free,
                    attempts,
                };
            }
        }
    }

    /// Whether a candidate clears the moon and all occupied positions
    #[must_use]
    pub fn is_clear(&self, candidate: &Position, moon: &MoonGeometry, occupied: &[Position]) -> bool {
        let min_separation = self.config.min_separation();
        candidate.distance_to(&moon.center) >= self.config.min_moon_distance()
            && occupied
                .iter()
                .all(|other| candidate.distance_to(other) >= min_separation)
    }

    /// Uniform sample inside the rectangle
    ///
    /// A rectangle squeezed to nothing by a tiny viewport collapses to its minimum
    /// corner instead of producing an empty range.
    fn sample(&mut self, rect: &SafeRect) -> Position {
        let width = (rect.max_x - rect.min_x).max(0.0);
        let height = (rect.max_y - rect.min_y).max(0.0);
        Position::new(
            rect.min_x + self.rng.gen::<f64>() * width,
            rect.min_y + self.rng.gen::<f64>() * height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<EntryId> {
        (0..n).map(|i| EntryId::new(format!("e{i}"))).collect()
    }

    fn setup() -> (PlacementEngine, Viewport, MoonGeometry) {
        let config = PlacementConfig::default();
        let viewport = Viewport::new(1440.0, 900.0);
        let moon = config.moon_for(viewport);
        (PlacementEngine::with_seed(config, 7), viewport, moon)
    }

    #[test]
    fn test_moon_center_between_margins() {
        let config = PlacementConfig::default();
        let moon = config.moon_for(Viewport::new(1000.0, 900.0));
        assert!((moon.center.x - 500.0).abs() < f64::EPSILON);
        // (900 - 120 - 180) / 2 + 120
        assert!((moon.center.y - 420.0).abs() < f64::EPSILON);
        assert!((moon.radius - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_positions_clear_moon_and_stay_in_rect() {
        let (mut engine, viewport, moon) = setup();
        let ids = ids(12);
        let report = engine.assign_positions(&ids, &HashMap::new(), viewport, &moon);
        let rect = engine.config().safe_rect(viewport);

        assert_eq!(report.positions.len(), 12);
        for (_, placement) in &report.placed {
            assert!(rect.contains(&placement.position));
            if placement.collision_free {
                assert!(placement.position.distance_to(&moon.center) >= 230.0);
            }
        }
    }

    #[test]
    fn test_existing_positions_are_sticky() {
        let (mut engine, viewport, moon) = setup();
        let first = engine.assign_positions(&ids(3), &HashMap::new(), viewport, &moon);

        // Same entries plus more, on a different viewport
        let bigger = Viewport::new(2000.0, 1200.0);
        let second = engine.assign_positions(&ids(6), &first.positions, bigger, &moon);

        for id in ids(3) {
            assert_eq!(first.positions[&id], second.positions[&id]);
        }
        assert_eq!(second.placed.len(), 3);
    }

    #[test]
    fn test_bodies_are_separated_when_room_allows() {
        let (mut engine, viewport, moon) = setup();
        let report = engine.assign_positions(&ids(8), &HashMap::new(), viewport, &moon);
        assert_eq!(report.degraded_count(), 0);

        let positions: Vec<Position> = report.positions.values().copied().collect();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(a.distance_to(b) >= 72.0);
            }
        }
    }

    #[test]
    fn test_exhaustion_accepts_last_candidate() {
        let config = PlacementConfig {
            max_attempts: 5,
            ..PlacementConfig::default()
        };
        // Viewport so small the safe rectangle sits inside the moon's halo
        let viewport = Viewport::new(500.0, 500.0);
        let moon = config.moon_for(viewport);
        let mut engine = PlacementEngine::with_seed(config, 1);

        let placement = engine.place(viewport, &moon, &[]);
        assert!(!placement.collision_free);
        assert_eq!(placement.attempts, 5);
    }

    #[test]
    fn test_degenerate_rect_collapses_to_corner() {
        let config = PlacementConfig::default();
        let viewport = Viewport::new(100.0, 100.0);
        let moon = config.moon_for(viewport);
        let mut engine = PlacementEngine::with_seed(config, 3);

        let placement = engine.place(viewport, &moon, &[]);
        assert!((placement.position.x - 100.0).abs() < f64::EPSILON);
        assert!((placement.position.y - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_collision_property_holds_under_normal_density() {
        let config = PlacementConfig::default();
        let viewport = Viewport::new(1440.0, 900.0);
        let moon = config.moon_for(viewport);

        let mut clean = 0;
        let trials = 200;
        for seed in 0..trials {
            let mut engine = PlacementEngine::with_seed(config.clone(), seed);
            let report = engine.assign_positions(&ids(2), &HashMap::new(), viewport, &moon);
            let a = report.positions[&EntryId::new("e0")];
            let b = report.positions[&EntryId::new("e1")];
            if a.distance_to(&b) >= config.min_separation() {
                clean += 1;
            }
        }
        assert!(clean * 100 >= trials * 99);
    }
}
