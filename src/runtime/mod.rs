pub mod channels;
pub mod countdown;
pub mod debug_overlay;
pub mod detector;
pub mod feedback;
pub mod orchestrator;
pub mod tasks;

pub use channels::{
    ClassifierControl, ClassifierControlSignal, ClassifierInput, ClassifierInputChannel,
    DetectionSignal, GameInput, GameInputChannel, SignalDetectionSink, CLASSIFIER_CONTROL,
    CLASSIFIER_INPUTS, CLASSIFIER_INPUT_CAPACITY, DETECTIONS, GAME_INPUTS, GAME_INPUT_CAPACITY,
};
pub use countdown::{CountdownEvent, CountdownTimer, DeadlineCountdown};
pub use debug_overlay::{manual_trigger_label, request_manual_trigger, DebugOverlayState};
pub use detector::{ClassifierLink, DetectorControl};
pub use feedback::{
    FeedbackEvent, FeedbackPair, FeedbackSink, HapticDriver, HapticFeedback, HapticPattern,
    LogFeedback, MissingAsset, NullFeedback, SoundFeedback, SoundPlayer,
};
pub use orchestrator::{GameOrchestrator, OrchestratorPhase};
pub use tasks::{
    apply_classifier_control, handle_classifier_input, handle_game_input, run_classifier,
    run_game_loop,
};
