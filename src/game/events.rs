use crate::gesture::GestureCommand;

/// Machine input. Randomizer draws and store loads happen in the engine
/// before dispatch, so the machine itself stays free of I/O.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) enum GameEvent {
    Start {
        high_score: u32,
        first: GestureCommand,
    },
    /// `next` is drawn only when `gesture` is the active command.
    Match {
        gesture: GestureCommand,
        next: Option<GestureCommand>,
    },
    Timeout,
    End,
}
