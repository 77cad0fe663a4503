use log::debug;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum FeedbackEvent {
    Tick,
    Success,
    Failure,
    SpeedUp,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HapticPattern {
    Click,
    Success,
    Failure,
    DirectionUp,
}

impl FeedbackEvent {
    pub const fn haptic(self) -> HapticPattern {
        match self {
            Self::Tick => HapticPattern::Click,
            Self::Success => HapticPattern::Success,
            Self::Failure => HapticPattern::Failure,
            Self::SpeedUp => HapticPattern::DirectionUp,
        }
    }

    pub const fn sound_asset(self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::SpeedUp => "speedup",
        }
    }
}

/// Fire-and-forget effect output. Results are never inspected.
pub trait FeedbackSink {
    fn play(&mut self, event: FeedbackEvent);
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for &mut T {
    fn play(&mut self, event: FeedbackEvent) {
        (**self).play(event);
    }
}

pub trait HapticDriver {
    fn play(&mut self, pattern: HapticPattern);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MissingAsset;

pub trait SoundPlayer {
    fn play_asset(&mut self, name: &'static str) -> Result<(), MissingAsset>;
}

pub struct HapticFeedback<D> {
    driver: D,
}

impl<D: HapticDriver> HapticFeedback<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: HapticDriver> FeedbackSink for HapticFeedback<D> {
    fn play(&mut self, event: FeedbackEvent) {
        self.driver.play(event.haptic());
    }
}

/// Missing assets are skipped without retry.
pub struct SoundFeedback<P> {
    player: P,
}

impl<P: SoundPlayer> SoundFeedback<P> {
    pub fn new(player: P) -> Self {
        Self { player }
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

impl<P: SoundPlayer> FeedbackSink for SoundFeedback<P> {
    fn play(&mut self, event: FeedbackEvent) {
        let asset = event.sound_asset();
        if self.player.play_asset(asset).is_err() {
            debug!("feedback: sound asset {} unavailable", asset);
        }
    }
}

pub struct FeedbackPair<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> FeedbackPair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: FeedbackSink, B: FeedbackSink> FeedbackSink for FeedbackPair<A, B> {
    fn play(&mut self, event: FeedbackEvent) {
        self.first.play(event);
        self.second.play(event);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn play(&mut self, _event: FeedbackEvent) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn play(&mut self, event: FeedbackEvent) {
        debug!("feedback: {:?}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Buzzer {
        played: Vec<HapticPattern>,
    }

    impl HapticDriver for Buzzer {
        fn play(&mut self, pattern: HapticPattern) {
            self.played.push(pattern);
        }
    }

    #[derive(Default)]
    struct Speaker {
        played: Vec<&'static str>,
    }

    impl SoundPlayer for Speaker {
        fn play_asset(&mut self, name: &'static str) -> Result<(), MissingAsset> {
            if name == "speedup" {
                return Err(MissingAsset);
            }
            self.played.push(name);
            Ok(())
        }
    }

    #[test]
    fn pair_fans_out_to_haptics_and_sound() {
        let mut pair = FeedbackPair::new(
            HapticFeedback::new(Buzzer::default()),
            SoundFeedback::new(Speaker::default()),
        );
        for event in [
            FeedbackEvent::Tick,
            FeedbackEvent::Success,
            FeedbackEvent::SpeedUp,
            FeedbackEvent::Failure,
        ] {
            pair.play(event);
        }

        assert_eq!(
            pair.first.driver().played,
            vec![
                HapticPattern::Click,
                HapticPattern::Success,
                HapticPattern::DirectionUp,
                HapticPattern::Failure,
            ]
        );
        assert_eq!(
            pair.second.player().played,
            vec!["tick", "success", "failure"]
        );
    }
}
