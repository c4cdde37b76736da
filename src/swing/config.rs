//! Tunable values of the swing set that are not stored on any node

/// Values the debug panel edits that fan out to several nodes or rebuild geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingConfig {
    /// X position shared by both legs of the left arch
    pub left_arch_x: f32,
    /// Half the distance between the ropes; the left rope sits at `-rope_x`
    pub rope_x: f32,
    pub seat_width: f32,
    pub seat_height: f32,
    pub seat_depth: f32,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            left_arch_x: 0.0,
            rope_x: 0.0,
            seat_width: 1.5,
            seat_height: 0.03,
            seat_depth: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    LeftArchX,
    RopeX,
    SeatWidth,
    SeatHeight,
    SeatDepth,
}

impl SwingConfig {
    pub fn get(&self, field: ConfigField) -> f32 {
        match field {
            ConfigField::LeftArchX => self.left_arch_x,
            ConfigField::RopeX => self.rope_x,
            ConfigField::SeatWidth => self.seat_width,
            ConfigField::SeatHeight => self.seat_height,
            ConfigField::SeatDepth => self.seat_depth,
        }
    }

    pub fn set(&mut self, field: ConfigField, value: f32) {
        match field {
            ConfigField::LeftArchX => self.left_arch_x = value,
            ConfigField::RopeX => self.rope_x = value,
            ConfigField::SeatWidth => self.seat_width = value,
            ConfigField::SeatHeight => self.seat_height = value,
            ConfigField::SeatDepth => self.seat_depth = value,
        }
    }
}
