use crate::types::QuizAnswer;

/// Snapshot of the host's key state for one frame. Movement keys are
/// level-triggered; the rest are just-pressed edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputFrame {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub interact: bool,
    pub pause: bool,
    pub quit: bool,
    pub quiz_answer: Option<QuizAnswer>,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn press_interact() -> Self {
        Self {
            interact: true,
            ..Self::default()
        }
    }

    pub fn answer(choice: QuizAnswer) -> Self {
        Self {
            quiz_answer: Some(choice),
            ..Self::default()
        }
    }
}
