//! Timed spawn policies: depth-scaled TNT rain and meteor showers

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::{HazardSettings, ShowerSettings};

/// A TNT the spawner wants placed this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    /// Grid column
    pub column: i32,
    pub fuse: f32,
}

/// Drops TNT from the top of the world more often the deeper the player is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardSpawner {
    timer: f32,
    interval: f32,
}

impl HazardSpawner {
    pub fn new(settings: &HazardSettings) -> Self {
        Self {
            timer: 0.0,
            interval: settings.spawn_interval,
        }
    }

    /// Spawn probability for a player `depth` blocks below the surface
    pub fn chance(settings: &HazardSettings, depth: i32) -> f32 {
        (settings.base_chance + depth.max(0) as f32 * settings.depth_multiplier)
            .min(settings.max_chance)
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Advance the timer; at each interval roll once for a spawn
    pub fn update(
        &mut self,
        dt: f32,
        depth: i32,
        world_width: i32,
        settings: &HazardSettings,
        rng: &mut Pcg32,
    ) -> Option<SpawnRequest> {
        self.timer += dt;
        if self.timer < self.interval {
            return None;
        }
        self.timer = 0.0;

        if rng.random::<f32>() >= Self::chance(settings, depth) {
            return None;
        }

        let column = if world_width > 2 {
            rng.random_range(1..=world_width - 2)
        } else {
            0
        };
        let fuse = roll(settings.min_fuse, settings.max_fuse, rng);
        let jitter = settings.interval_jitter.abs();
        self.interval = (settings.spawn_interval + roll(-jitter, jitter, rng)).max(0.1);
        Some(SpawnRequest { column, fuse })
    }
}

/// What a shower did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShowerTick {
    /// Shower began; carries its duration
    pub started: Option<f32>,
    pub ended: bool,
    /// A meteor should be spawned
    pub spawn_meteor: bool,
}

/// Periodic meteor shower scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteorShower {
    active: bool,
    /// Counts toward the next shower, or toward the end of the current one
    timer: f32,
    next_shower: f32,
    duration: f32,
    spawn_timer: f32,
    next_spawn: f32,
}

impl MeteorShower {
    pub fn new(settings: &ShowerSettings, rng: &mut Pcg32) -> Self {
        Self {
            active: false,
            timer: 0.0,
            next_shower: roll(settings.min_interval, settings.max_interval, rng),
            duration: 0.0,
            spawn_timer: 0.0,
            next_spawn: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds until the next shower starts (0 while active)
    pub fn time_until_next(&self) -> f32 {
        if self.active {
            0.0
        } else {
            (self.next_shower - self.timer).max(0.0)
        }
    }

    pub fn update(&mut self, dt: f32, settings: &ShowerSettings, rng: &mut Pcg32) -> ShowerTick {
        let mut out = ShowerTick::default();
        if !settings.enabled {
            return out;
        }
        self.timer += dt;

        if !self.active {
            if self.timer >= self.next_shower {
                self.active = true;
                self.timer = 0.0;
                self.duration = roll(settings.min_duration, settings.max_duration, rng);
                self.spawn_timer = 0.0;
                self.next_spawn = 0.0;
                out.started = Some(self.duration);
            }
            return out;
        }

        if self.timer >= self.duration {
            self.active = false;
            self.timer = 0.0;
            self.next_shower = roll(settings.min_interval, settings.max_interval, rng);
            out.ended = true;
            return out;
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.next_spawn {
            self.spawn_timer = 0.0;
            self.next_spawn = roll(settings.min_spawn_gap, settings.max_spawn_gap, rng);
            out.spawn_meteor = true;
        }
        out
    }
}

fn roll(min: f32, max: f32, rng: &mut Pcg32) -> f32 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;

    #[test]
    fn test_chance_is_capped() {
        let settings = HazardSettings::default();
        assert!((HazardSpawner::chance(&settings, 0) - 0.3).abs() < 1e-6);
        assert!((HazardSpawner::chance(&settings, 10) - 0.5).abs() < 1e-6);
        assert_eq!(HazardSpawner::chance(&settings, 400), 0.95);
        assert!((HazardSpawner::chance(&settings, -5) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_spawns_in_column_band() {
        let settings = HazardSettings::default();
        let mut spawner = HazardSpawner::new(&settings);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawned = 0;
        for _ in 0..60 * 600 {
            if let Some(req) = spawner.update(SIM_DT, 1000, 20, &settings, &mut rng) {
                spawned += 1;
                assert!((1..=18).contains(&req.column));
                assert!((2.0..=3.5).contains(&req.fuse));
                assert!((4.0..=6.0).contains(&spawner.interval()));
            }
        }
        // ~100 rolls at 95%
        assert!(spawned > 70, "only {spawned} spawns");
    }

    #[test]
    fn test_shower_toggles() {
        let settings = ShowerSettings::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut shower = MeteorShower::new(&settings, &mut rng);
        let mut started = 0;
        let mut ended = 0;
        let mut meteors = 0;
        for _ in 0..60 * 200 {
            let tick = shower.update(SIM_DT, &settings, &mut rng);
            if let Some(duration) = tick.started {
                started += 1;
                assert!((12.0..=18.0).contains(&duration));
            }
            if tick.ended {
                ended += 1;
            }
            if tick.spawn_meteor {
                assert!(shower.is_active());
                meteors += 1;
            }
        }
        assert!(started >= 2);
        assert!(ended >= 2);
        assert!(meteors >= 15);
    }

    #[test]
    fn test_disabled_shower_never_starts() {
        let settings = ShowerSettings {
            enabled: false,
            ..ShowerSettings::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut shower = MeteorShower::new(&settings, &mut rng);
        for _ in 0..60 * 120 {
            assert_eq!(shower.update(SIM_DT, &settings, &mut rng), ShowerTick::default());
        }
    }
}
