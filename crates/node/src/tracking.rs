use glam::{Quat, Vec2, Vec3};

/// Event emitted by the tracking/VR collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingEvent {
    /// A controller button changed state.
    ControllerButton {
        device: u32,
        button: u32,
        /// Touchpad position at the time of the press.
        touchpad: Vec2,
        position: Vec3,
        z_vector: Vec3,
        rotation: Quat,
    },
    /// A tracked device pose update.
    Pose {
        device: u32,
        position: Vec3,
        rotation: Quat,
    },
}

/// Tracking/VR collaborator, polled once per frame by the driver.
pub trait Tracker {
    fn poll_events(&mut self) -> Vec<TrackingEvent>;
}

/// Tracker for setups without VR hardware; never emits events.
#[derive(Debug, Default)]
pub struct NullTracker;

impl Tracker for NullTracker {
    fn poll_events(&mut self) -> Vec<TrackingEvent> {
        Vec::new()
    }
}
