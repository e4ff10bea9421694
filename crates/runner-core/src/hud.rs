//! Score presentation.

use crate::state::RunState;

/// Display strings derived from a [`RunState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub score_text: String,
    pub coins_text: String,
    pub best_text: String,
}

impl ScoreBoard {
    pub fn from_state(state: &RunState) -> Self {
        Self {
            score_text: format!("Score: {}", whole_units(state.score())),
            coins_text: format!("Coins: {}", state.money()),
            best_text: format!("Best: {}", whole_units(state.best_score())),
        }
    }
}

/// Floors a score to whole units for display.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_units(value: f32) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_text() {
        let mut state = RunState::new();
        state.advance(123.9);
        state.add_money(4);

        let board = ScoreBoard::from_state(&state);

        assert_eq!(board.score_text, "Score: 123");
        assert_eq!(board.coins_text, "Coins: 4");
        assert_eq!(board.best_text, "Best: 123");
    }

    #[test]
    fn test_fresh_state() {
        let board = ScoreBoard::from_state(&RunState::new());
        assert_eq!(board.score_text, "Score: 0");
        assert_eq!(board.coins_text, "Coins: 0");
    }
}
