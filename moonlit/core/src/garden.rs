//! Moon Garden
//!
//! Flowers planted on the moon with star credits. Flowers live in the moon's own
//! coordinate space (its square container), so they never collide with bodies.
//!
//! Credits are earned one per positive note and spent `flower_cost` per flower.

use std::f64::consts::TAU;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::placement::Position;

/// Flower identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowerId(pub String);

impl FlowerId {
    /// Generate a new unique flower ID
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst);

        Self(format!("flower_{}_{count}", Utc::now().timestamp_millis()))
    }
}

impl std::fmt::Display for FlowerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flower sprites offered in the plant menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowerStyle {
    /// First sprite
    Blossom,
    /// Second sprite
    Daisy,
    /// Third sprite
    Bell,
}

impl FlowerStyle {
    /// All styles in menu order
    pub const ALL: [Self; 3] = [Self::Blossom, Self::Daisy, Self::Bell];

    /// Parse a style by name or menu slot (`flower2`, `2`)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let slot = s.strip_prefix("flower").unwrap_or(&s);
        if let Ok(n) = slot.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied();
        }
        Self::ALL.into_iter().find(|style| style.name() == s)
    }

    /// Style name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Blossom => "blossom",
            Self::Daisy => "daisy",
            Self::Bell => "bell",
        }
    }

    /// Sprite asset name
    #[must_use]
    pub fn asset(self) -> &'static str {
        match self {
            Self::Blossom => "flower1",
            Self::Daisy => "flower2",
            Self::Bell => "flower3",
        }
    }
}

/// A planted flower
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    /// Flower ID
    pub id: FlowerId,
    /// Sprite style
    pub style: FlowerStyle,
    /// Top-left of the sprite inside the moon container, whole pixels
    pub position: Position,
}

/// Garden tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GardenConfig {
    /// Edge length of the square moon container
    pub moon_size: f64,
    /// Flower sprite edge length
    pub flower_size: f64,
    /// Closest a flower centre may be to the moon centre
    pub min_distance: f64,
    /// Farthest a flower centre may be, as a fraction of the container radius
    pub max_distance_ratio: f64,
    /// Credits spent per flower
    pub flower_cost: u32,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            moon_size: 360.0,
            flower_size: 32.0,
            min_distance: 20.0,
            max_distance_ratio: 0.68,
            flower_cost: 3,
        }
    }
}

impl GardenConfig {
    /// Farthest a flower centre may be from the moon centre
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        self.max_distance_ratio * self.moon_size / 2.0
    }
}

/// Star credits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarCredits(u32);

impl StarCredits {
    /// Credits available
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Earn one credit
    pub fn earn(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    /// Spend `cost` credits if there are enough
    pub fn spend(&mut self, cost: u32) -> bool {
        match self.0.checked_sub(cost) {
            Some(left) => {
                self.0 = left;
                true
            }
            None => false,
        }
    }

    /// Replace the balance
    pub fn set(&mut self, credits: u32) {
        self.0 = credits;
    }
}

/// Errors when planting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlantError {
    /// Not enough credits
    #[error("not enough stars to plant a flower (have {have}, need {need})")]
    NotEnoughStars {
        /// Credits available
        have: u32,
        /// Credits required
        need: u32,
    },
}

/// Flowers and the credits that pay for them
#[derive(Clone, Debug, Default)]
pub struct Garden {
    config: GardenConfig,
    flowers: Vec<Flower>,
    credits: StarCredits,
}

impl Garden {
    /// Create an empty garden
    #[must_use]
    pub fn new(config: GardenConfig) -> Self {
        Self {
            config,
            flowers: Vec::new(),
            credits: StarCredits::default(),
        }
    }

    /// Garden tuning
    #[must_use]
    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    /// Planted flowers in planting order
    #[must_use]
    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    /// Credits available
    #[must_use]
    pub fn credits(&self) -> u32 {
        self.credits.get()
    }

    /// Earn one credit
    pub fn earn(&mut self) {
        self.credits.earn();
    }

    /// Whether a flower can be afforded
    #[must_use]
    pub fn can_plant(&self) -> bool {
        self.credits.get() >= self.config.flower_cost
    }

    /// Spend credits and plant a flower at a random spot on the moon
    pub fn plant(&mut self, style: FlowerStyle, rng: &mut impl Rng) -> Result<Flower, PlantError> {
        let need = self.config.flower_cost;
        if !self.credits.spend(need) {
            return Err(PlantError::NotEnoughStars {
                have: self.credits.get(),
                need,
            });
        }

        let flower = Flower {
            id: FlowerId::generate(),
            style,
            position: self.sample_position(rng),
        };
        tracing::debug!(flower_id = %flower.id, ?style, "Flower planted");
        self.flowers.push(flower.clone());
        Ok(flower)
    }

    /// Sample a sprite position in the annulus around the moon centre
    ///
    /// Angle is uniform in `[0, 2π)`, distance uniform between the minimum and
    /// maximum. The result is the sprite's top-left corner, rounded to pixels.
    pub fn sample_position(&self, rng: &mut impl Rng) -> Position {
        let min = self.config.min_distance;
        let max = self.config.max_distance().max(min);

        let angle = rng.gen::<f64>() * TAU;
        let distance = min + rng.gen::<f64>() * (max - min);

        let center = self.config.moon_size / 2.0;
        let half = self.config.flower_size / 2.0;
        Position::new(
            (center + angle.cos() * distance - half).round(),
            (center + angle.sin() * distance - half).round(),
        )
    }

    /// Remove every flower and set the balance
    pub fn reset(&mut self, credits: u32) {
        self.flowers.clear();
        self.credits.set(credits);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_plant_requires_credits() {
        let mut garden = Garden::new(GardenConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        garden.earn();
        garden.earn();

        assert_eq!(
            garden.plant(FlowerStyle::Daisy, &mut rng),
            Err(PlantError::NotEnoughStars { have: 2, need: 3 })
        );
        assert_eq!(garden.credits(), 2);

        garden.earn();
        assert!(garden.can_plant());
        let flower = garden.plant(FlowerStyle::Daisy, &mut rng).unwrap();
        assert_eq!(flower.style, FlowerStyle::Daisy);
        assert_eq!(garden.credits(), 0);
        assert_eq!(garden.flowers().len(), 1);
    }

    #[test]
    fn test_flowers_stay_in_annulus() {
        let garden = Garden::new(GardenConfig::default());
        let config = garden.config().clone();
        let mut rng = StdRng::seed_from_u64(7);
        let half = config.flower_size / 2.0;
        let center = Position::new(config.moon_size / 2.0, config.moon_size / 2.0);

        for _ in 0..500 {
            let p = garden.sample_position(&mut rng);
            assert_eq!(p.x, p.x.round());
            let sprite_center = Position::new(p.x + half, p.y + half);
            let d = sprite_center.distance_to(&center);
            // Rounding moves the centre by at most half a pixel on each axis
            assert!(d >= config.min_distance - 1.0, "too close: {d}");
            assert!(d <= config.max_distance() + 1.0, "too far: {d}");
        }
    }

    #[test]
    fn test_reset_clears_flowers() {
        let mut garden = Garden::new(GardenConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..3 {
            garden.earn();
        }
        garden.plant(FlowerStyle::Bell, &mut rng).unwrap();
        garden.reset(1);
        assert!(garden.flowers().is_empty());
        assert_eq!(garden.credits(), 1);
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!(FlowerStyle::parse("flower2"), Some(FlowerStyle::Daisy));
        assert_eq!(FlowerStyle::parse("BELL"), Some(FlowerStyle::Bell));
        assert_eq!(FlowerStyle::parse("3"), Some(FlowerStyle::Bell));
        assert_eq!(FlowerStyle::parse("rose"), None);
        assert_eq!(FlowerStyle::parse("0"), None);
        assert_eq!(FlowerStyle::parse("flower4"), None);
        assert_eq!(FlowerStyle::Blossom.asset(), "flower1");
    }
}
