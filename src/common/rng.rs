//! Shared random source for launches and AI aiming.

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

#[derive(Resource, Debug, Deref, DerefMut)]
pub struct GameRng(pub StdRng);

impl GameRng {
    /// Deterministic generator, used by tests.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}
