//! Host-side collaborators: the player session and the terrain.

use crate::location::PlanarPosition;
use std::sync::Mutex;

/// What triggered an automatic lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Join,
    NewPlayer,
    Respawn,
}

/// A connected player (or any movable subject).
pub trait Session: Send + Sync {
    fn name(&self) -> String;

    /// Source network address, possibly with a port. None if unknown.
    fn address(&self) -> Option<String>;

    fn notify(&self, message: &str);

    /// Capability gate: `Err(reason)` vetoes a move to `position`.
    fn check_move(&self, _position: &PlanarPosition) -> Result<(), String> {
        Ok(())
    }

    fn move_to(&self, position: PlanarPosition);
}

/// Ground height at a planar position.
pub trait Terrain: Send + Sync {
    fn ground_height(&self, x: f64, z: f64) -> f64;
}

/// Terrain with the same height everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain {
    pub height: f64,
}

impl Terrain for FlatTerrain {
    fn ground_height(&self, _x: f64, _z: f64) -> f64 {
        self.height
    }
}

/// An in-process session that records what happens to it.
///
/// `max_coordinate` models an older client that cannot represent positions
/// beyond a fixed magnitude.
#[derive(Debug, Default)]
pub struct LocalSession {
    pub name: String,
    pub address: Option<String>,
    pub max_coordinate: Option<f64>,
    pub echo: bool,
    messages: Mutex<Vec<String>>,
    position: Mutex<Option<PlanarPosition>>,
}

impl LocalSession {
    pub fn new(name: impl Into<String>, address: Option<&str>) -> Self {
        Self {
            name: name.into(),
            address: address.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn with_max_coordinate(mut self, limit: f64) -> Self {
        self.max_coordinate = Some(limit);
        self
    }

    /// Print notifications to stderr as they arrive.
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn position(&self) -> Option<PlanarPosition> {
        *self.position.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Session for LocalSession {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn address(&self) -> Option<String> {
        self.address.clone()
    }

    fn notify(&self, message: &str) {
        if self.echo {
            eprintln!("  [{}] {}", self.name, message);
        }
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).push(message.to_string());
    }

    fn check_move(&self, position: &PlanarPosition) -> Result<(), String> {
        match self.max_coordinate {
            Some(limit) if position.x.abs() > limit || position.y.abs() > limit || position.z.abs() > limit => {
                Err(format!("destination {} exceeds the client limit of {}", position, limit))
            }
            _ => Ok(()),
        }
    }

    fn move_to(&self, position: PlanarPosition) {
        *self.position.lock().unwrap_or_else(|e| e.into_inner()) = Some(position);
    }
}
