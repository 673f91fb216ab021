use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rng::RngExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    DamageDealt,
    DamageTaken,
    Harvest,
    Heal,
}

/// A short-lived floating number for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub value: f32,
    pub x: f32,
    pub y: f32,
    pub remaining: f32,
}

const JITTER: f32 = 0.3;

impl Feedback {
    /// `rng` must be the cosmetic stream.
    pub fn new<R: Rng>(kind: FeedbackKind, value: f32, x: f32, y: f32, seconds: f32, rng: &mut R) -> Self {
        Self {
            kind,
            value,
            x: x + rng.random_f32(-JITTER, JITTER),
            y: y + rng.random_f32(-JITTER, JITTER),
            remaining: seconds,
        }
    }

    /// Returns false once expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining > 0.0
    }
}
