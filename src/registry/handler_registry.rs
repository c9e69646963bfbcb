//! # Handler Registry
//!
//! Ordered, append-only collection of the robots loaded into a process.
//!
//! ## Overview
//!
//! Robots are registered during bootstrap and never removed or replaced.
//! The dispatcher works from a snapshot taken when a dispatch begins, so a
//! registration that lands mid-dispatch cannot change a result in flight.
//!
//! Bootstrap finishes before the transport starts delivering events, so
//! writers and dispatch do not overlap in practice; the lock is only held for
//! the duration of a `Vec` push or clone.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::logging::log_registry_operation;
use crate::robot::Robot;

/// One registry entry: the robot and the name it was loaded under
#[derive(Clone)]
pub struct RegisteredRobot {
    pub name: String,
    pub robot: Arc<dyn Robot>,
}

impl std::fmt::Debug for RegisteredRobot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredRobot")
            .field("name", &self.name)
            .field("robot", &self.robot.name())
            .finish()
    }
}

/// Immutable view of the registry at one point in time
pub type RegistrySnapshot = Arc<[RegisteredRobot]>;

/// Registry of loaded robots, in registration order
#[derive(Default)]
pub struct HandlerRegistry {
    robots: RwLock<Vec<RegisteredRobot>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a robot and hand it back for further configuration
    pub fn register(&self, name: impl Into<String>, robot: Arc<dyn Robot>) -> Arc<dyn Robot> {
        let name = name.into();
        let position = {
            let mut robots = self.robots.write();
            robots.push(RegisteredRobot {
                name: name.clone(),
                robot: robot.clone(),
            });
            robots.len() - 1
        };

        log_registry_operation("register", &name, Some(position), "registered", None);
        robot
    }

    /// Snapshot of the current registration order
    pub fn all(&self) -> RegistrySnapshot {
        let robots = self.robots.read();
        Arc::from(robots.as_slice())
    }

    pub fn names(&self) -> Vec<String> {
        self.robots.read().iter().map(|r| r.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.robots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.read().is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("robots", &self.names())
            .finish()
    }
}
