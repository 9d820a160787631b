//! Per-camera visitor motion simulation
//!
//! Owns the population of visitor "dots" for one camera feed and advances
//! them one tick at a time: straight-line motion, wall bounce, obstacle
//! bounce, then behavioral classification (moving vs. stationary past the
//! dwell threshold). A dot that has dwelled too long turns red and raises
//! one detection signal per tick for as long as the condition holds;
//! debouncing those signals into alerts is the cooldown gate's job.
//!
//! Dot state is kept in base (unscaled) floor-map coordinates. A tick may
//! run at a uniform scale factor (the enlarged focused view): positions
//! are scaled on the way in and unscaled on the way out, while velocity
//! and radius stay in base units, so switching between grid and focused
//! views is lossless and motion resumes seamlessly.

use crate::domain::floor_map::{FloorMap, Rect};
use crate::infra::config::Config;
use tracing::debug;

/// Initial velocity components are drawn uniformly from this range
const MAX_INITIAL_SPEED: f64 = 0.1;

/// Behavioral state of a visitor dot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotColor {
    /// Moving normally
    Green,
    /// Stationary past the dwell threshold
    Red,
}

/// A simulated visitor
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    /// Center position in base floor-map coordinates
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub color: DotColor,
    /// Last tick (epoch ms) at which the dot moved at or above the
    /// speed threshold; frozen while stationary.
    pub last_moved_ms: u64,
}

/// Tuning knobs for one simulator instance
#[derive(Debug, Clone)]
pub struct SimulatorParams {
    pub min_dots: usize,
    pub max_dots: usize,
    pub dot_radius: f64,
    pub speed_threshold: f64,
    pub dwell_ms: u64,
    pub wall_margin: f64,
    pub max_spawn_attempts: u32,
}

impl From<&Config> for SimulatorParams {
    fn from(config: &Config) -> Self {
        Self {
            min_dots: config.min_dots(),
            max_dots: config.max_dots(),
            dot_radius: config.dot_radius(),
            speed_threshold: config.speed_threshold(),
            dwell_ms: config.dwell_ms(),
            wall_margin: config.wall_margin(),
            max_spawn_attempts: config.max_spawn_attempts(),
        }
    }
}

/// Motion simulator for a single camera's floor map.
///
/// The dot set is empty until the first `ensure_spawned` call (lazy
/// creation on first render) and persists until `reset`.
pub struct Simulator {
    map: FloorMap,
    params: SimulatorParams,
    rng: fastrand::Rng,
    dots: Vec<Dot>,
}

impl Simulator {
    pub fn new(map: FloorMap, params: SimulatorParams) -> Self {
        Self { map, params, rng: fastrand::Rng::new(), dots: Vec::new() }
    }

    /// Deterministic variant for tests and reproducible demos
    pub fn with_seed(map: FloorMap, params: SimulatorParams, seed: u64) -> Self {
        Self { map, params, rng: fastrand::Rng::with_seed(seed), dots: Vec::new() }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn map(&self) -> &FloorMap {
        &self.map
    }

    /// Clear the population. The next `ensure_spawned` re-seeds it.
    pub fn reset(&mut self) {
        self.dots.clear();
    }

    /// Spawn the population if it does not exist yet. The count is the
    /// explicit `population` override when given, otherwise a uniform
    /// draw from the configured range.
    pub fn ensure_spawned(&mut self, now_ms: u64, population: Option<usize>) {
        if !self.dots.is_empty() {
            return;
        }
        let count = population
            .unwrap_or_else(|| self.rng.usize(self.params.min_dots..=self.params.max_dots));
        for _ in 0..count {
            let dot = self.spawn_dot(now_ms);
            self.dots.push(dot);
        }
        debug!(count = %count, "dots_spawned");
    }

    /// Rejection-sample a spawn position away from walls and solid
    /// obstacles. Past the attempt cap the last candidate is accepted;
    /// best effort, not a hard guarantee.
    fn spawn_dot(&mut self, now_ms: u64) -> Dot {
        let margin = self.params.wall_margin;
        let radius = self.params.dot_radius;
        let span_x = (self.map.width - 2.0 * margin).max(0.0);
        let span_y = (self.map.height - 2.0 * margin).max(0.0);

        let mut x = margin;
        let mut y = margin;
        for _ in 0..self.params.max_spawn_attempts {
            x = margin + self.rng.f64() * span_x;
            y = margin + self.rng.f64() * span_y;
            let clear = self
                .map
                .solid_obstacles()
                .all(|o| !o.rect.expanded(2.0 * radius).contains_point(x, y));
            if clear {
                break;
            }
        }

        Dot {
            x,
            y,
            radius,
            speed_x: self.random_speed(),
            speed_y: self.random_speed(),
            color: DotColor::Green,
            last_moved_ms: now_ms,
        }
    }

    fn random_speed(&mut self) -> f64 {
        self.rng.f64() * 2.0 * MAX_INITIAL_SPEED - MAX_INITIAL_SPEED
    }

    /// Advance every dot by one tick at the given uniform map scale.
    /// Returns the indices of dots that signaled a detection this tick.
    pub fn tick(&mut self, scale: f64, now_ms: u64) -> Vec<usize> {
        let width = self.map.width * scale;
        let height = self.map.height * scale;
        let solids: Vec<Rect> =
            self.map.solid_obstacles().map(|o| o.rect.scaled(scale)).collect();

        let mut flagged = Vec::new();
        for (i, dot) in self.dots.iter_mut().enumerate() {
            let radius = dot.radius;
            let x = dot.x * scale;
            let y = dot.y * scale;
            let mut speed_x = dot.speed_x;
            let mut speed_y = dot.speed_y;
            let mut next_x = x + speed_x;
            let mut next_y = y + speed_y;

            // Wall bounce, each axis independently; single correction pass
            if next_x + radius >= width || next_x - radius <= 0.0 {
                speed_x = -speed_x;
                next_x = x + speed_x;
            }
            if next_y + radius >= height || next_y - radius <= 0.0 {
                speed_y = -speed_y;
                next_y = y + speed_y;
            }

            // Obstacle bounce, in definition order, no early exit. Also
            // tests the current position so a dot that ended up inside
            // (imperfect earlier resolution) still gets pushed out by a
            // velocity reversal rather than a teleport.
            for obs in &solids {
                let will_collide = obs.overlaps_circle(next_x, next_y, radius);
                let inside_now = obs.overlaps_circle(x, y, radius);
                if will_collide || inside_now {
                    let from_left = x < obs.x;
                    let from_right = x > obs.x + obs.width;
                    let from_top = y < obs.y;
                    let from_bottom = y > obs.y + obs.height;

                    if from_left || from_right {
                        speed_x = -speed_x;
                    }
                    if from_top || from_bottom {
                        speed_y = -speed_y;
                    }
                    next_x = x + speed_x;
                    next_y = y + speed_y;
                }
            }

            // Commit in base coordinates
            dot.x = (x + speed_x) / scale;
            dot.y = (y + speed_y) / scale;
            dot.speed_x = speed_x;
            dot.speed_y = speed_y;

            // Behavioral classification on the committed velocity
            let moved = (speed_x * speed_x + speed_y * speed_y).sqrt();
            if moved < self.params.speed_threshold {
                if now_ms.saturating_sub(dot.last_moved_ms) > self.params.dwell_ms {
                    dot.color = DotColor::Red;
                    flagged.push(i);
                }
            } else {
                dot.color = DotColor::Green;
                dot.last_moved_ms = now_ms;
            }
        }
        flagged
    }

    /// Override the population directly (tests and scripted demos)
    #[cfg(test)]
    pub fn set_dots(&mut self, dots: Vec<Dot>) {
        self.dots = dots;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::floor_map::Obstacle;

    fn test_params() -> SimulatorParams {
        SimulatorParams {
            min_dots: 10,
            max_dots: 35,
            dot_radius: 5.0,
            speed_threshold: 0.025,
            dwell_ms: 8000,
            wall_margin: 10.0,
            max_spawn_attempts: 100,
        }
    }

    // Modeled on the Daru Staircase camera: one solid pedestal and a
    // walkable staircase band below it.
    fn gallery_map() -> FloorMap {
        FloorMap::new(
            350.0,
            220.0,
            vec![
                Obstacle::new(140.0, 35.0, 70.0, 70.0, "Pedestal"),
                Obstacle::new(115.0, 125.0, 120.0, 22.0, "Stairs"),
            ],
            vec![Rect::new(0.0, 0.0, 350.0, 220.0)],
        )
    }

    fn moving_dot(x: f64, y: f64, speed_x: f64, speed_y: f64) -> Dot {
        Dot { x, y, radius: 5.0, speed_x, speed_y, color: DotColor::Green, last_moved_ms: 0 }
    }

    #[test]
    fn test_spawn_count_in_range() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 7);
        sim.ensure_spawned(0, None);
        assert!(sim.dots().len() >= 10 && sim.dots().len() <= 35);
    }

    #[test]
    fn test_spawn_respects_population_override() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 7);
        sim.ensure_spawned(0, Some(12));
        assert_eq!(sim.dots().len(), 12);
    }

    #[test]
    fn test_spawn_is_idempotent() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 7);
        sim.ensure_spawned(0, Some(12));
        sim.ensure_spawned(0, Some(30));
        assert_eq!(sim.dots().len(), 12);
    }

    #[test]
    fn test_spawn_avoids_solid_obstacles() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 42);
        sim.ensure_spawned(0, Some(35));
        let case = Rect::new(140.0, 35.0, 70.0, 70.0).expanded(10.0);
        for dot in sim.dots() {
            assert!(
                !case.contains_point(dot.x, dot.y),
                "dot spawned inside keep-out zone at ({}, {})",
                dot.x,
                dot.y
            );
        }
    }

    #[test]
    fn test_reset_clears_and_allows_reseed() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 7);
        sim.ensure_spawned(0, Some(12));
        sim.reset();
        assert!(sim.dots().is_empty());
        sim.ensure_spawned(0, Some(20));
        assert_eq!(sim.dots().len(), 20);
    }

    #[test]
    fn test_wall_containment_over_many_ticks() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 99);
        sim.ensure_spawned(0, Some(25));
        let (width, height) = (350.0, 220.0);
        for tick in 0..2000 {
            sim.tick(1.0, tick as u64 * 33);
            for dot in sim.dots() {
                assert!(
                    dot.x >= dot.radius - 1e-9 && dot.x <= width - dot.radius + 1e-9,
                    "x out of bounds: {}",
                    dot.x
                );
                assert!(
                    dot.y >= dot.radius - 1e-9 && dot.y <= height - dot.radius + 1e-9,
                    "y out of bounds: {}",
                    dot.y
                );
            }
        }
    }

    #[test]
    fn test_wall_bounce_reverses_velocity() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 1);
        sim.set_dots(vec![moving_dot(344.9, 100.0, 0.1, 0.0)]);
        sim.tick(1.0, 0);
        let dot = &sim.dots()[0];
        assert!(dot.speed_x < 0.0);
        assert!(dot.x <= 345.0);
    }

    #[test]
    fn test_obstacle_bounce_from_left() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 1);
        // Approaching the pedestal (x 140..210) from the left
        sim.set_dots(vec![moving_dot(134.95, 70.0, 0.1, 0.0)]);
        sim.tick(1.0, 0);
        let dot = &sim.dots()[0];
        assert!(dot.speed_x < 0.0, "horizontal velocity should flip");
        assert_eq!(dot.speed_y, 0.0);
    }

    #[test]
    fn test_obstacle_avoidance_outside_stays_outside() {
        let params = test_params();
        let mut sim = Simulator::with_seed(gallery_map(), params, 5);
        sim.ensure_spawned(0, Some(30));
        let case = Rect::new(140.0, 35.0, 70.0, 70.0);
        for tick in 0..2000 {
            let before: Vec<bool> = sim
                .dots()
                .iter()
                .map(|d| case.overlaps_circle(d.x, d.y, d.radius))
                .collect();
            sim.tick(1.0, tick as u64 * 33);
            for (dot, was_inside) in sim.dots().iter().zip(before) {
                if !was_inside {
                    assert!(
                        !case.overlaps_circle(dot.x, dot.y, dot.radius),
                        "dot entered solid obstacle at ({}, {})",
                        dot.x,
                        dot.y
                    );
                }
            }
        }
    }

    #[test]
    fn test_stairs_do_not_bounce() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 1);
        // Heading straight into the stairs band (y 125..147)
        sim.set_dots(vec![moving_dot(175.0, 119.0, 0.0, 0.1)]);
        for tick in 0..400 {
            sim.tick(1.0, tick * 33);
        }
        let dot = &sim.dots()[0];
        // Velocity never reversed by the stairs; the dot passed through
        assert!(dot.speed_y > 0.0);
        assert!(dot.y > 150.0);
    }

    #[test]
    fn test_dwell_detection_turns_red_and_signals_every_tick() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 1);
        sim.set_dots(vec![moving_dot(50.0, 50.0, 0.001, 0.0)]);

        // Below the dwell threshold: no signal, still green
        let flagged = sim.tick(1.0, 7999);
        assert!(flagged.is_empty());
        assert_eq!(sim.dots()[0].color, DotColor::Green);

        // Past the threshold: exactly one signal per tick, red
        let flagged = sim.tick(1.0, 8001);
        assert_eq!(flagged, vec![0]);
        assert_eq!(sim.dots()[0].color, DotColor::Red);

        let flagged = sim.tick(1.0, 8034);
        assert_eq!(flagged, vec![0]);
    }

    #[test]
    fn test_moving_dot_refreshes_last_moved() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 1);
        sim.set_dots(vec![moving_dot(50.0, 50.0, 0.08, 0.05)]);
        sim.tick(1.0, 9000);
        let dot = &sim.dots()[0];
        assert_eq!(dot.color, DotColor::Green);
        assert_eq!(dot.last_moved_ms, 9000);
        // No detection even long after spawn, because it keeps moving
        let flagged = sim.tick(1.0, 20_000);
        assert!(flagged.is_empty());
    }

    #[test]
    fn test_red_dot_turns_green_when_it_moves_again() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 1);
        let mut dot = moving_dot(50.0, 50.0, 0.001, 0.0);
        dot.color = DotColor::Red;
        sim.set_dots(vec![dot]);
        // Give it real velocity again by mutating through a tick: the dot
        // is slow, so first confirm it stays red...
        let flagged = sim.tick(1.0, 10_000);
        assert_eq!(flagged.len(), 1);
        // ...then replace with a moving twin and confirm reclassification
        sim.set_dots(vec![Dot {
            color: DotColor::Red,
            ..moving_dot(50.0, 50.0, 0.09, 0.0)
        }]);
        sim.tick(1.0, 10_033);
        assert_eq!(sim.dots()[0].color, DotColor::Green);
    }

    #[test]
    fn test_scaled_tick_round_trips_base_coordinates() {
        let params = test_params();
        let mut grid = Simulator::with_seed(gallery_map(), params.clone(), 11);
        let mut focused = Simulator::with_seed(gallery_map(), params, 11);
        grid.ensure_spawned(0, Some(15));
        focused.ensure_spawned(0, Some(15));
        assert_eq!(grid.dots(), focused.dots());

        // A focused tick keeps positions in base units: after one tick at
        // scale 2.4, displacement equals velocity / scale when no bounce
        // occurs, and every position remains inside the base map.
        focused.tick(2.4, 33);
        for dot in focused.dots() {
            assert!(dot.x >= 0.0 && dot.x <= 350.0);
            assert!(dot.y >= 0.0 && dot.y <= 220.0);
        }
    }

    #[test]
    fn test_scale_switch_resumes_seamlessly() {
        let mut sim = Simulator::with_seed(gallery_map(), test_params(), 13);
        sim.ensure_spawned(0, Some(10));
        for tick in 0..50 {
            sim.tick(1.0, tick * 33);
        }
        let before = sim.dots().to_vec();
        // Focus for a while, then return to grid scale
        for tick in 50..100 {
            sim.tick(2.4, tick * 33);
        }
        for tick in 100..150 {
            sim.tick(1.0, tick * 33);
        }
        // Population unchanged, all dots still in base bounds
        assert_eq!(sim.dots().len(), before.len());
        for dot in sim.dots() {
            assert!(dot.x >= 0.0 && dot.x <= 350.0);
            assert!(dot.y >= 0.0 && dot.y <= 220.0);
        }
    }

    #[test]
    fn test_spawn_exhaustion_accepts_last_candidate() {
        // A map whose interior is one big keep-out zone: sampling can
        // never succeed, but spawn must still terminate with dots placed.
        let blocked = FloorMap::new(
            100.0,
            100.0,
            vec![Obstacle::new(-20.0, -20.0, 140.0, 140.0, "Installation")],
            vec![],
        );
        let mut sim = Simulator::with_seed(blocked, test_params(), 3);
        sim.ensure_spawned(0, Some(5));
        assert_eq!(sim.dots().len(), 5);
    }
}
