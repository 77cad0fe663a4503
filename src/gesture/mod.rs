pub mod classifier;
pub mod features;
pub mod sensor;
pub mod session;
pub mod sink;
pub mod trace;
pub mod types;

pub use classifier::GestureClassifier;
pub use sensor::{MotionFeed, NoRotaryInput, RotaryInput, UnavailableMotionFeed};
pub use sink::{DetectionLog, DetectionSink};
pub use trace::ClassifierTrace;
pub use types::{DetectionSource, GestureCommand, GestureDetection, MotionSample, Vec3};
