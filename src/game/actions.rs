#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameApplyStatus {
    Applied,
    Unchanged,
    InvalidTransition,
}
