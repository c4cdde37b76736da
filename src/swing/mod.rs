//! The swing set: scene construction, debug controls and animation

pub mod animation;
pub mod config;
pub mod controls;
pub mod model;

pub use animation::{orbit_position, swing_angle, Clock, SwingAnimation};
pub use config::{ConfigField, SwingConfig};
pub use controls::build_controls;
pub use model::{build_swing_set, rebuild_seat, SwingSetNodes};
