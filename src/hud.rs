//! HUD text for the score state
//!
//! Recomputed by presentation whenever a `ScoreChanged` event arrives.

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, ScoreState};

/// Strings the HUD shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudText {
    /// Score badge, e.g. "120$"
    pub score: String,
    /// Remaining budget, e.g. "Coins Left: 97"
    pub coins_left: String,
}

impl HudText {
    pub fn new(score: u64, tokens_remaining: u32) -> Self {
        Self {
            score: format!("{}$", score),
            coins_left: format!("Coins Left: {}", tokens_remaining),
        }
    }

    /// Text for the newest score change in a batch of events, if any
    pub fn latest(events: &[GameEvent]) -> Option<Self> {
        events.iter().rev().find_map(|e| match *e {
            GameEvent::ScoreChanged {
                score,
                tokens_remaining,
            } => Some(Self::new(score, tokens_remaining)),
            _ => None,
        })
    }
}

impl From<&ScoreState> for HudText {
    fn from(state: &ScoreState) -> Self {
        Self::new(state.score, state.tokens_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let hud = HudText::from(&ScoreState {
            score: 120,
            tokens_remaining: 97,
        });
        assert_eq!(hud.score, "120$");
        assert_eq!(hud.coins_left, "Coins Left: 97");
    }

    #[test]
    fn test_latest_picks_newest_change() {
        let events = vec![
            GameEvent::ScoreChanged {
                score: 0,
                tokens_remaining: 9,
            },
            GameEvent::TokenSettled {
                token: 3,
                bucket: 1,
                points: 20,
            },
            GameEvent::ScoreChanged {
                score: 20,
                tokens_remaining: 9,
            },
            GameEvent::TokenReaped {
                token: 3,
                settled: true,
            },
        ];
        assert_eq!(HudText::latest(&events), Some(HudText::new(20, 9)));
        assert_eq!(HudText::latest(&events[1..2]), None);
    }
}
