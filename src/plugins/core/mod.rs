//! Core plugin: shared resources and global settings.

use crate::common::{rng::GameRng, tunables::Tunables};
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    // Tests (and embedders) may insert their own Tunables before the plugin runs.
    if !app.world().contains_resource::<Tunables>() {
        let path = Tunables::config_path();
        let (tunables, problems) = Tunables::load_checked(&path);
        if problems.is_empty() {
            info!("Loaded tunables from {path}");
        } else {
            for problem in &problems {
                warn!("{path}: {problem}");
            }
            warn!("Using default tunables");
        }
        app.insert_resource(tunables);
    }

    app.init_resource::<GameRng>();
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));
}
