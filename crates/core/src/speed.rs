//! Simulated train speed derived from answer events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top speed in km/h.
pub const MAX_SPEED: u16 = 320;

/// Speed at the start of every leg.
pub const CRUISE_SPEED: u16 = 50;

/// Lowest speed a wrong answer can drop the train to.
pub const WRONG_ANSWER_FLOOR: u16 = 30;

/// Speed lost on a wrong answer.
pub const WRONG_ANSWER_PENALTY: u16 = 50;

/// Bonus for an instant correct answer.
pub const MAX_TIME_BONUS: u16 = 50;

/// Bonus never drops below this, however slow the answer.
pub const MIN_TIME_BONUS: u16 = 10;

/// Bonus lost per elapsed second.
pub const BONUS_DECAY_PER_SEC: u16 = 2;

/// Speed in km/h, always within `0..=MAX_SPEED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub struct Speed(u16);

impl Speed {
    /// Clamps `kmh` into the valid range.
    #[must_use]
    pub fn new(kmh: u32) -> Self {
        let clamped = kmh.min(u32::from(MAX_SPEED));
        Self(u16::try_from(clamped).unwrap_or(MAX_SPEED))
    }

    #[must_use]
    pub fn cruise() -> Self {
        Self(CRUISE_SPEED)
    }

    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Speed after a correct answer given `elapsed_secs` after the question was served.
    #[must_use]
    pub fn after_correct(client: Speed, elapsed_secs: u32) -> Self {
        let bonus = time_bonus(elapsed_secs);
        Self::new(u32::from(client.0) + u32::from(bonus))
    }

    /// Speed after a wrong answer.
    #[must_use]
    pub fn after_wrong(client: Speed) -> Self {
        Self(
            client
                .0
                .saturating_sub(WRONG_ANSWER_PENALTY)
                .max(WRONG_ANSWER_FLOOR),
        )
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::cruise()
    }
}

impl From<u16> for Speed {
    fn from(kmh: u16) -> Self {
        Self::new(u32::from(kmh))
    }
}

impl From<Speed> for u16 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km/h", self.0)
    }
}

/// `max(MIN_TIME_BONUS, MAX_TIME_BONUS - 2 * elapsed_secs)`.
#[must_use]
pub fn time_bonus(elapsed_secs: u32) -> u16 {
    let decay = elapsed_secs.saturating_mul(u32::from(BONUS_DECAY_PER_SEC));
    let bonus = u32::from(MAX_TIME_BONUS).saturating_sub(decay);
    u16::try_from(bonus)
        .unwrap_or(MAX_TIME_BONUS)
        .max(MIN_TIME_BONUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_to_max() {
        assert_eq!(Speed::new(1_000).value(), MAX_SPEED);
        assert_eq!(Speed::new(120).value(), 120);
    }

    #[test]
    fn time_bonus_decays_to_floor() {
        assert_eq!(time_bonus(0), 50);
        assert_eq!(time_bonus(5), 40);
        assert_eq!(time_bonus(20), 10);
        assert_eq!(time_bonus(25), 10);
        assert_eq!(time_bonus(u32::MAX), 10);
    }

    #[test]
    fn correct_answer_adds_at_least_min_bonus() {
        for client in [0_u16, 50, 150, 300] {
            for elapsed in [0, 3, 30, 600] {
                let after = Speed::after_correct(Speed::from(client), elapsed);
                assert!(after.value() <= MAX_SPEED);
                let expected_min = (client + MIN_TIME_BONUS).min(MAX_SPEED);
                assert!(after.value() >= expected_min);
            }
        }
        assert_eq!(Speed::after_correct(Speed::from(310), 0).value(), MAX_SPEED);
    }

    #[test]
    fn wrong_answer_drops_speed_with_floor() {
        assert_eq!(Speed::after_wrong(Speed::from(200)).value(), 150);
        assert_eq!(Speed::after_wrong(Speed::from(70)).value(), 30);
        assert_eq!(Speed::after_wrong(Speed::from(0)).value(), 30);
    }

    #[test]
    fn from_u16_clamps() {
        assert_eq!(Speed::from(999).value(), MAX_SPEED);
        assert_eq!(u16::from(Speed::from(80)), 80);
    }
}
