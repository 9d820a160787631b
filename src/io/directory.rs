//! Museum directory - cameras, guards, seed alerts, floor maps
//!
//! Read-only mock data consumed by the command interpreter and the
//! session controller. Ships with a built-in Louvre set; a TOML file can
//! replace it wholesale for other sites.

use crate::domain::floor_map::{FloorMap, Obstacle, Rect};
use crate::domain::types::{
    Alert, AlertId, AlertStatus, Camera, CameraId, CameraStatus, Guard, GuardStatus, Severity,
};
use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Number of feeds shown in the grid view
pub const GRID_CAMERAS: usize = 4;

#[derive(Debug, Deserialize)]
struct TomlDirectory {
    #[serde(default)]
    cameras: Vec<Camera>,
    #[serde(default)]
    guards: Vec<Guard>,
    #[serde(default)]
    alerts: Vec<Alert>,
    /// Keyed by camera id (TOML keys are strings)
    #[serde(default)]
    floor_maps: HashMap<String, FloorMap>,
}

#[derive(Debug, Clone)]
pub struct Directory {
    pub cameras: Vec<Camera>,
    pub guards: Vec<Guard>,
    pub seed_alerts: Vec<Alert>,
    floor_maps: FxHashMap<CameraId, FloorMap>,
}

impl Directory {
    /// Load from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read directory file {}", path.display()))?;
        let parsed: TomlDirectory = toml::from_str(&content)
            .with_context(|| format!("Failed to parse directory file {}", path.display()))?;

        // Convert floor map keys from string to camera ids
        let mut floor_maps = FxHashMap::default();
        for (key, map) in parsed.floor_maps {
            if let Ok(id) = key.parse::<u32>() {
                floor_maps.insert(CameraId(id), map);
            }
        }

        Ok(Self {
            cameras: parsed.cameras,
            guards: parsed.guards,
            seed_alerts: parsed.alerts,
            floor_maps,
        })
    }

    /// Load from an optional file, falling back to the built-in set
    pub fn load(path: Option<&str>) -> Self {
        match path {
            Some(path) => match Self::from_file(path) {
                Ok(directory) => directory,
                Err(e) => {
                    warn!(error = %e, "directory_load_failed_using_builtin");
                    Self::builtin()
                }
            },
            None => Self::builtin(),
        }
    }

    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.iter().find(|c| c.id == id)
    }

    pub fn floor_map(&self, id: CameraId) -> Option<&FloorMap> {
        self.floor_maps.get(&id)
    }

    /// Cameras shown in the grid view, in directory order
    pub fn grid_cameras(&self) -> impl Iterator<Item = &Camera> {
        self.cameras.iter().take(GRID_CAMERAS)
    }

    /// Built-in Louvre site data
    pub fn builtin() -> Self {
        let cameras = vec![
            camera(1, "Camera 1 - Salle des États", CameraStatus::Active, "Denon Wing - Room 711"),
            camera(
                2,
                "Camera 2 - Daru Staircase",
                CameraStatus::Active,
                "Denon Wing - Grand Staircase",
            ),
            camera(
                3,
                "Camera 3 - Egyptian Antiquities",
                CameraStatus::Active,
                "Sully Wing - Ground Floor",
            ),
            camera(4, "Camera 4 - Cour Marly", CameraStatus::Active, "Richelieu Wing - Room 105"),
            camera(
                5,
                "Camera 5 - Grande Galerie",
                CameraStatus::Offline,
                "Denon Wing - Italian Paintings",
            ),
        ];

        let guards = vec![
            guard("Guard Dubois", "Salle des États", GuardStatus::OnDuty),
            guard("Guard Chen", "Egyptian Antiquities", GuardStatus::OnDuty),
            guard("Guard Martinez", "Security Office", GuardStatus::OnDuty),
            guard("Guard Moreau", "Richelieu Wing", GuardStatus::OffDuty),
        ];

        let seed_alerts = vec![
            seed_alert(
                "seed-1",
                Severity::Medium,
                "motion",
                "Unusual motion pattern - Gallery 3",
                "Gallery 3",
                None,
                "15 min ago",
                AlertStatus::Investigating,
            ),
            seed_alert(
                "seed-2",
                Severity::Low,
                "maintenance",
                "Camera offline for scheduled maintenance",
                "Denon Wing - Italian Paintings",
                Some(5),
                "1 hour ago",
                AlertStatus::Active,
            ),
        ];

        let mut floor_maps = FxHashMap::default();
        floor_maps.insert(CameraId(1), salle_des_etats());
        floor_maps.insert(CameraId(2), daru_staircase());
        floor_maps.insert(CameraId(3), egyptian_antiquities());
        floor_maps.insert(CameraId(4), cour_marly());

        Self { cameras, guards, seed_alerts, floor_maps }
    }
}

fn camera(id: u32, name: &str, status: CameraStatus, room: &str) -> Camera {
    Camera {
        id: CameraId(id),
        name: name.to_string(),
        status,
        room: room.to_string(),
        people_count: None,
    }
}

fn guard(name: &str, location: &str, status: GuardStatus) -> Guard {
    Guard { name: name.to_string(), location: location.to_string(), status }
}

#[allow(clippy::too_many_arguments)]
fn seed_alert(
    id: &str,
    severity: Severity,
    kind: &str,
    message: &str,
    location: &str,
    camera: Option<u32>,
    timestamp: &str,
    status: AlertStatus,
) -> Alert {
    Alert {
        id: AlertId(id.to_string()),
        severity,
        kind: kind.to_string(),
        message: message.to_string(),
        location: location.to_string(),
        camera: camera.map(CameraId),
        timestamp: timestamp.to_string(),
        status,
        auto_generated: false,
        created_at: 0,
    }
}

/// All built-in plans share one footprint so the grid view lines up
const MAP_WIDTH: f64 = 350.0;
const MAP_HEIGHT: f64 = 220.0;

fn full_zone() -> Vec<Rect> {
    vec![Rect::new(0.0, 0.0, MAP_WIDTH, MAP_HEIGHT)]
}

/// Mona Lisa gallery: central protective case, benches in the corners
fn salle_des_etats() -> FloorMap {
    FloorMap::new(
        MAP_WIDTH,
        MAP_HEIGHT,
        vec![
            Obstacle::new(150.0, 85.0, 50.0, 60.0, "Mona Lisa"),
            Obstacle::new(25.0, 35.0, 40.0, 18.0, "Bench"),
            Obstacle::new(285.0, 35.0, 40.0, 18.0, "Bench"),
            Obstacle::new(25.0, 167.0, 40.0, 18.0, "Bench"),
            Obstacle::new(285.0, 167.0, 40.0, 18.0, "Bench"),
        ],
        full_zone(),
    )
}

/// Winged Victory pedestal above the grand staircase steps
fn daru_staircase() -> FloorMap {
    FloorMap::new(
        MAP_WIDTH,
        MAP_HEIGHT,
        vec![
            Obstacle::new(140.0, 35.0, 70.0, 70.0, "Winged Victory"),
            Obstacle::new(115.0, 125.0, 120.0, 22.0, "Stairs"),
            Obstacle::new(125.0, 147.0, 100.0, 22.0, "Stairs"),
            Obstacle::new(135.0, 169.0, 80.0, 22.0, "Stairs"),
        ],
        full_zone(),
    )
}

/// Sphinx statues flanking the sarcophagus displays
fn egyptian_antiquities() -> FloorMap {
    FloorMap::new(
        MAP_WIDTH,
        MAP_HEIGHT,
        vec![
            Obstacle::new(45.0, 80.0, 48.0, 70.0, "Sphinx"),
            Obstacle::new(257.0, 80.0, 48.0, 70.0, "Sphinx"),
            Obstacle::new(125.0, 35.0, 100.0, 35.0, "Sarcophagus"),
            Obstacle::new(125.0, 150.0, 100.0, 35.0, "Sarcophagus"),
        ],
        full_zone(),
    )
}

/// Marly Horses courtyard
fn cour_marly() -> FloorMap {
    FloorMap::new(
        MAP_WIDTH,
        MAP_HEIGHT,
        vec![
            Obstacle::new(70.0, 65.0, 60.0, 90.0, "Marly Horse"),
            Obstacle::new(220.0, 65.0, 60.0, 90.0, "Marly Horse"),
            Obstacle::new(150.0, 20.0, 50.0, 35.0, "Sculpture"),
            Obstacle::new(150.0, 165.0, 50.0, 35.0, "Sculpture"),
        ],
        full_zone(),
    )
}
