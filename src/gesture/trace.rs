use super::types::{GestureCommand, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClassifierTrace {
    pub armed: Option<GestureCommand>,
    pub session: u32,
    pub running: bool,
    pub window_len: u8,
    pub shake_peaks: u8,
    pub rotary_accumulated: f64,
    pub last_acceleration: Option<Vec3>,
    pub last_rotation_rate: Option<Vec3>,
    pub last_detection: Option<GestureCommand>,
}
