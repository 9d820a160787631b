//! Floor plan geometry for camera views
//!
//! A floor map is static per-camera data: outer bounds, rectangular
//! obstacles (display cases, benches, staircases) and zone outlines.
//! Obstacles whose label mentions stairs are passable: visitors walk
//! over them, so they take part in rendering and spawn avoidance but
//! never in collision response.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in floor-map coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle grown by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// Uniformly scaled copy (position and size)
    pub fn scaled(&self, factor: f64) -> Rect {
        Rect {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Overlap test against a circle of radius `r` centered at (cx, cy),
    /// approximating the circle by its bounding box. This is the same
    /// test the renderer's collision pass uses, so simulation and
    /// drawing agree on what "touching" means.
    pub fn overlaps_circle(&self, cx: f64, cy: f64, r: f64) -> bool {
        cx + r > self.x
            && cx - r < self.x + self.width
            && cy + r > self.y
            && cy - r < self.y + self.height
    }
}

/// A floor-map obstacle: a rectangle plus an optional display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub label: Option<String>,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64, label: &str) -> Self {
        Self { rect: Rect::new(x, y, width, height), label: Some(label.to_string()) }
    }

    /// Stairs are walkable: no collision response, spawn avoidance only
    pub fn is_passable(&self) -> bool {
        self.label.as_deref().is_some_and(|l| l.to_lowercase().contains("stairs"))
    }
}

/// Static per-camera floor plan. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorMap {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub zones: Vec<Rect>,
}

impl FloorMap {
    pub fn new(width: f64, height: f64, obstacles: Vec<Obstacle>, zones: Vec<Rect>) -> Self {
        Self { width, height, obstacles, zones }
    }

    /// Uniformly scaled copy, e.g. for the enlarged focused view
    pub fn scaled(&self, factor: f64) -> FloorMap {
        FloorMap {
            width: self.width * factor,
            height: self.height * factor,
            obstacles: self
                .obstacles
                .iter()
                .map(|o| Obstacle { rect: o.rect.scaled(factor), label: o.label.clone() })
                .collect(),
            zones: self.zones.iter().map(|z| z.scaled(factor)).collect(),
        }
    }

    /// Obstacles that participate in collision response
    pub fn solid_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| !o.is_passable())
    }
}
