use embassy_futures::select::{select, select3, Either, Either3};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Receiver, signal::Signal};
use embassy_time::{Instant, Timer};
use log::{debug, info};

use crate::{
    game::{CommandRandomizer, HighScoreStore},
    gesture::{DetectionSink, GestureClassifier, GestureDetection, MotionFeed, RotaryInput},
};

use super::{
    channels::{ClassifierControl, ClassifierInput, GameInput},
    countdown::CountdownTimer,
    detector::DetectorControl,
    feedback::FeedbackSink,
    orchestrator::GameOrchestrator,
};

/// Brings the classifier in line with the latest published control.
pub fn apply_classifier_control<F, R, S>(
    classifier: &mut GestureClassifier<F, R, S>,
    control: ClassifierControl,
) where
    F: MotionFeed,
    R: RotaryInput,
    S: DetectionSink,
{
    if control.running && !classifier.is_running() {
        let _ = classifier.start();
    }
    if classifier.armed() != control.command || classifier.session_id() != control.session {
        classifier.arm_session(control.command, control.session);
    }
    if !control.running && classifier.is_running() {
        classifier.stop();
    }
}

/// Applies one classifier input. Returns `false` on `Shutdown`.
pub fn handle_classifier_input<F, R, S>(
    classifier: &mut GestureClassifier<F, R, S>,
    input: ClassifierInput,
) -> bool
where
    F: MotionFeed,
    R: RotaryInput,
    S: DetectionSink,
{
    match input {
        ClassifierInput::Motion(sample) => classifier.ingest(sample),
        ClassifierInput::RotaryDelta(delta) => classifier.ingest_rotary_delta(delta),
        ClassifierInput::Shutdown => {
            classifier.stop();
            return false;
        }
    }
    true
}

/// Sole consumer of classifier work; returns on `Shutdown`. A pending control
/// is always applied before the next queued sample.
pub async fn run_classifier<F, R, S, M, const N: usize>(
    classifier: &mut GestureClassifier<F, R, S>,
    controls: &Signal<M, ClassifierControl>,
    inputs: Receiver<'_, M, ClassifierInput, N>,
) where
    F: MotionFeed,
    R: RotaryInput,
    S: DetectionSink,
    M: RawMutex,
{
    loop {
        // `select` polls the control first, so a pending one always wins.
        match select(controls.wait(), inputs.receive()).await {
            Either::First(control) => apply_classifier_control(classifier, control),
            Either::Second(input) => {
                if let Some(control) = controls.try_take() {
                    apply_classifier_control(classifier, control);
                }
                if !handle_classifier_input(classifier, input) {
                    debug!("gesture: classifier task exit");
                    return;
                }
            }
        }
    }
}

/// Applies one input. Returns `false` once the loop should exit.
pub fn handle_game_input<R, S, T, F, D>(
    orchestrator: &mut GameOrchestrator<R, S, T, F, D>,
    input: GameInput,
    now: Instant,
) -> bool
where
    R: CommandRandomizer,
    S: HighScoreStore,
    T: CountdownTimer,
    F: FeedbackSink,
    D: DetectorControl,
{
    match input {
        GameInput::Start => {
            let _ = orchestrator.start_game(now);
        }
        GameInput::Reset => {
            let _ = orchestrator.reset_game(now);
        }
        GameInput::End => {
            let _ = orchestrator.end_game(now);
        }
        GameInput::Detection(detection) => {
            let _ = orchestrator.on_detection(detection, now);
        }
        GameInput::ManualTrigger(gesture) => {
            let _ = orchestrator.trigger_manual(gesture, now);
        }
        GameInput::Shutdown => {
            let _ = orchestrator.end_game(now);
            return false;
        }
    }
    true
}

/// Waits for the orchestrator's next deadline, a detection or the next input,
/// whichever comes first, then polls. Returns on `GameInput::Shutdown`.
pub async fn run_game_loop<R, S, T, F, D, M, const N: usize>(
    orchestrator: &mut GameOrchestrator<R, S, T, F, D>,
    detections: &Signal<M, GestureDetection>,
    inputs: Receiver<'_, M, GameInput, N>,
) where
    R: CommandRandomizer,
    S: HighScoreStore,
    T: CountdownTimer,
    F: FeedbackSink,
    D: DetectorControl,
    M: RawMutex,
{
    loop {
        let deadline = orchestrator.next_deadline();
        let next = select3(detections.wait(), inputs.receive(), wait_until(deadline));
        let input = match next.await {
            Either3::First(detection) => Some(GameInput::Detection(detection)),
            Either3::Second(input) => Some(input),
            Either3::Third(()) => None,
        };

        let now = Instant::now();
        if let Some(input) = input {
            if !handle_game_input(orchestrator, input, now) {
                info!("game: loop exit");
                return;
            }
        }
        let _ = orchestrator.poll(now);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => Timer::at(deadline).await,
        None => core::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
    use embassy_time::{Duration, Instant};

    use super::*;
    use crate::{
        config::active_config,
        game::{GameEngine, MemoryHighScoreStore, ScriptedRandomizer},
        gesture::{DetectionLog, GestureCommand, MotionSample, NoRotaryInput, Vec3},
        runtime::{countdown::DeadlineCountdown, feedback::NullFeedback},
    };

    struct AlwaysOnMotion;

    impl MotionFeed for AlwaysOnMotion {
        fn is_available(&self) -> bool {
            true
        }

        fn set_update_interval(&mut self, _interval: Duration) {}

        fn start(&mut self) {}

        fn stop(&mut self) {}
    }

    #[derive(Default)]
    struct NoDetector;

    impl DetectorControl for NoDetector {
        fn start(&mut self) {}

        fn stop(&mut self) {}

        fn arm(&mut self, _command: Option<GestureCommand>, _session: u32) {}
    }

    fn classifier() -> GestureClassifier<AlwaysOnMotion, NoRotaryInput, DetectionLog<4>> {
        GestureClassifier::new(
            &active_config().detector,
            AlwaysOnMotion,
            NoRotaryInput,
            DetectionLog::new(),
        )
    }

    fn flick_sample(ms: u64) -> ClassifierInput {
        ClassifierInput::Motion(MotionSample::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::ZERO,
            Instant::from_millis(ms),
        ))
    }

    #[test]
    fn classifier_task_processes_queue_in_order() {
        let controls: Signal<CriticalSectionRawMutex, ClassifierControl> = Signal::new();
        let inputs: Channel<CriticalSectionRawMutex, ClassifierInput, 8> = Channel::new();
        let mut classifier = classifier();

        controls.signal(ClassifierControl {
            running: true,
            command: Some(GestureCommand::FlickUp),
            session: 7,
        });
        inputs.try_send(flick_sample(5)).expect("queue has room");
        inputs
            .try_send(ClassifierInput::Shutdown)
            .expect("queue has room");

        block_on(run_classifier(&mut classifier, &controls, inputs.receiver()));

        let detections = classifier.sink().detections();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].gesture, GestureCommand::FlickUp);
        assert_eq!(detections[0].session, 7);
        assert!(!classifier.is_running());
    }

    #[test]
    fn control_lands_ahead_of_a_full_motion_queue() {
        let controls: Signal<CriticalSectionRawMutex, ClassifierControl> = Signal::new();
        let inputs: Channel<CriticalSectionRawMutex, ClassifierInput, 32> = Channel::new();
        let mut classifier = classifier();
        apply_classifier_control(
            &mut classifier,
            ClassifierControl {
                running: true,
                command: Some(GestureCommand::Shake),
                session: 1,
            },
        );

        for ms in 0..31 {
            inputs.try_send(flick_sample(ms * 20)).expect("queue has room");
        }
        inputs
            .try_send(ClassifierInput::Shutdown)
            .expect("queue has room");
        assert!(inputs.try_send(flick_sample(700)).is_err());

        controls.signal(ClassifierControl {
            running: true,
            command: Some(GestureCommand::FlickUp),
            session: 2,
        });
        block_on(run_classifier(&mut classifier, &controls, inputs.receiver()));

        let detections = classifier.sink().detections();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].gesture, GestureCommand::FlickUp);
        assert_eq!(detections[0].session, 2);
    }

    #[test]
    fn stop_control_keeps_the_armed_session() {
        let mut classifier = classifier();
        let armed = ClassifierControl {
            running: true,
            command: Some(GestureCommand::Twist),
            session: 3,
        };
        apply_classifier_control(&mut classifier, armed);
        assert!(classifier.is_running());
        assert_eq!(classifier.armed(), Some(GestureCommand::Twist));

        apply_classifier_control(
            &mut classifier,
            ClassifierControl {
                running: false,
                ..armed
            },
        );
        assert!(!classifier.is_running());
        assert_eq!(classifier.session_id(), 3);

        apply_classifier_control(&mut classifier, ClassifierControl::IDLE);
        assert_eq!(classifier.armed(), None);
        assert_eq!(classifier.session_id(), 0);
    }

    #[test]
    fn game_loop_drains_inputs_until_shutdown() {
        let config = active_config();
        let detections: Signal<CriticalSectionRawMutex, GestureDetection> = Signal::new();
        let inputs: Channel<CriticalSectionRawMutex, GameInput, 8> = Channel::new();
        let mut orchestrator = GameOrchestrator::new(
            GameEngine::new(
                ScriptedRandomizer::new(&[
                    GestureCommand::Shake,
                    GestureCommand::FlickUp,
                    GestureCommand::Twist,
                ]),
                MemoryHighScoreStore::new(0),
                &config.gameplay,
            ),
            DeadlineCountdown::new(),
            NullFeedback,
            NoDetector,
            &config.timing,
        );

        for input in [
            GameInput::Start,
            GameInput::ManualTrigger(GestureCommand::Shake),
            GameInput::ManualTrigger(GestureCommand::Twist),
            GameInput::ManualTrigger(GestureCommand::FlickUp),
            GameInput::Shutdown,
        ] {
            inputs.try_send(input).expect("queue has room");
        }

        block_on(run_game_loop(
            &mut orchestrator,
            &detections,
            inputs.receiver(),
        ));

        let state = orchestrator.state();
        assert_eq!(state.score, 2);
        assert!(state.is_over);
        assert_eq!(state.high_score, 2);
        assert_eq!(orchestrator.engine().store().value(), 2);
    }
}
