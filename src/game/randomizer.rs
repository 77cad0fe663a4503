use heapless::Vec;
use rand::{rngs::SmallRng, Rng as _, RngCore, SeedableRng};

use crate::gesture::GestureCommand;

pub const SCRIPT_CAPACITY: usize = 32;

pub trait CommandRandomizer {
    fn next_command(&mut self, previous: Option<GestureCommand>) -> GestureCommand;
}

impl<T: CommandRandomizer + ?Sized> CommandRandomizer for &mut T {
    fn next_command(&mut self, previous: Option<GestureCommand>) -> GestureCommand {
        (**self).next_command(previous)
    }
}

/// Uniform over every command; immediate repeats are possible.
pub struct UniformRandomizer<R> {
    rng: R,
}

impl<R: RngCore> UniformRandomizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> CommandRandomizer for UniformRandomizer<R> {
    fn next_command(&mut self, _previous: Option<GestureCommand>) -> GestureCommand {
        GestureCommand::ALL[self.rng.random_range(0..GestureCommand::ALL.len())]
    }
}

/// Uniform over the commands other than `previous`.
pub struct ExcludePreviousRandomizer<R> {
    rng: R,
}

impl<R: RngCore> ExcludePreviousRandomizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> CommandRandomizer for ExcludePreviousRandomizer<R> {
    fn next_command(&mut self, previous: Option<GestureCommand>) -> GestureCommand {
        let Some(previous) = previous else {
            return GestureCommand::ALL[self.rng.random_range(0..GestureCommand::ALL.len())];
        };
        let mut candidates: Vec<GestureCommand, 4> = Vec::new();
        for command in GestureCommand::ALL {
            if command != previous {
                let _ = candidates.push(command);
            }
        }
        candidates[self.rng.random_range(0..candidates.len())]
    }
}

pub type DefaultRandomizer = ExcludePreviousRandomizer<SmallRng>;

pub fn default_randomizer(seed: u64) -> DefaultRandomizer {
    ExcludePreviousRandomizer::new(SmallRng::seed_from_u64(seed))
}

/// Replays a fixed sequence, wrapping at the end. An empty script yields `Shake`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandomizer {
    script: Vec<GestureCommand, SCRIPT_CAPACITY>,
    cursor: usize,
    calls: Vec<Option<GestureCommand>, SCRIPT_CAPACITY>,
}

impl ScriptedRandomizer {
    /// Commands beyond `SCRIPT_CAPACITY` are dropped.
    pub fn new(script: &[GestureCommand]) -> Self {
        let mut stored = Vec::new();
        for command in script.iter().take(SCRIPT_CAPACITY) {
            let _ = stored.push(*command);
        }
        Self {
            script: stored,
            cursor: 0,
            calls: Vec::new(),
        }
    }

    /// `previous` arguments seen so far, oldest first; stops recording when full.
    pub fn calls(&self) -> &[Option<GestureCommand>] {
        &self.calls
    }
}

impl CommandRandomizer for ScriptedRandomizer {
    fn next_command(&mut self, previous: Option<GestureCommand>) -> GestureCommand {
        let _ = self.calls.push(previous);
        if self.script.is_empty() {
            return GestureCommand::Shake;
        }
        let command = self.script[self.cursor % self.script.len()];
        self.cursor = (self.cursor + 1) % self.script.len();
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclude_previous_never_repeats() {
        let mut randomizer = default_randomizer(7);
        let mut previous = None;
        for _ in 0..500 {
            let next = randomizer.next_command(previous);
            assert_ne!(Some(next), previous);
            previous = Some(next);
        }
    }

    #[test]
    fn exclude_previous_reaches_every_other_command() {
        let mut randomizer = default_randomizer(11);
        let mut seen = [false; 4];
        for _ in 0..400 {
            let next = randomizer.next_command(Some(GestureCommand::Twist));
            seen[next.as_u8() as usize] = true;
        }
        assert_eq!(seen, [true, true, false, true]);
    }

    #[test]
    fn uniform_covers_all_commands_including_repeats() {
        let mut randomizer = UniformRandomizer::new(SmallRng::seed_from_u64(3));
        let mut seen = [false; 4];
        let mut repeated = false;
        let mut previous = None;
        for _ in 0..400 {
            let next = randomizer.next_command(previous);
            seen[next.as_u8() as usize] = true;
            repeated |= Some(next) == previous;
            previous = Some(next);
        }
        assert_eq!(seen, [true; 4]);
        assert!(repeated);
    }

    #[test]
    fn scripted_sequence_wraps_and_records_previous() {
        let mut randomizer =
            ScriptedRandomizer::new(&[GestureCommand::Twist, GestureCommand::SpinCrown]);
        assert_eq!(randomizer.next_command(None), GestureCommand::Twist);
        assert_eq!(
            randomizer.next_command(Some(GestureCommand::Twist)),
            GestureCommand::SpinCrown
        );
        assert_eq!(
            randomizer.next_command(Some(GestureCommand::SpinCrown)),
            GestureCommand::Twist
        );
        assert_eq!(
            randomizer.calls(),
            &[
                None,
                Some(GestureCommand::Twist),
                Some(GestureCommand::SpinCrown)
            ]
        );
    }

    #[test]
    fn empty_script_falls_back_to_shake() {
        let mut randomizer = ScriptedRandomizer::new(&[]);
        assert_eq!(randomizer.next_command(None), GestureCommand::Shake);
    }
}
