use embassy_time::Instant;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum GestureCommand {
    Shake = 0,
    FlickUp = 1,
    Twist = 2,
    SpinCrown = 3,
}

impl GestureCommand {
    pub const ALL: [Self; 4] = [Self::Shake, Self::FlickUp, Self::Twist, Self::SpinCrown];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Text shown to the wearer while the command is active.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Shake => "Shake it!",
            Self::FlickUp => "Flick it!",
            Self::Twist => "Twist it!",
            Self::SpinCrown => "Spin it!",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Shake => "shake",
            Self::FlickUp => "flick_up",
            Self::Twist => "twist",
            Self::SpinCrown => "spin_crown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.label() == label)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

/// One fused device-motion reading. Acceleration is user acceleration in g,
/// rotation rate is in rad/s, `at` is the sensor's monotonic timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub acceleration: Vec3,
    pub rotation_rate: Vec3,
    pub at: Instant,
}

impl MotionSample {
    pub const fn new(acceleration: Vec3, rotation_rate: Vec3, at: Instant) -> Self {
        Self {
            acceleration,
            rotation_rate,
            at,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum DetectionSource {
    Motion = 1,
    Rotary = 2,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GestureDetection {
    pub gesture: GestureCommand,
    pub session: u32,
    pub source: DetectionSource,
}
