//! Loyalty rewards

use std::fmt::{Display, Formatter, Result as FmtResult};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Stars needed for a reward, counted from zero.
pub const REWARD_CYCLE_STARS: u32 = 200;

/// Stars a new member needs before their first reward.
pub const NEW_MEMBER_STARS_TO_REWARD: u32 = 50;

/// Minor units (cents) that earn one star.
const MINOR_UNITS_PER_STAR: i64 = 50;

/// Stars earned for an order total: two per whole currency unit, rounded down.
pub fn loyalty_points(total: &Money<'_, Currency>) -> u32 {
    let minor = total.to_minor_units().max(0);

    u32::try_from(minor / MINOR_UNITS_PER_STAR).unwrap_or(u32::MAX)
}

/// Membership level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardTier {
    /// Entry level
    #[default]
    Green,
    /// Second level
    Gold,
    /// Top level
    Platinum,
}

impl Display for RewardTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Green => "Green",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        })
    }
}

/// A member's star balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    stars: u32,
    tier: RewardTier,
    stars_to_next_reward: u32,
}

impl Rewards {
    /// A new member: no stars, green tier.
    pub fn new() -> Self {
        Self {
            stars: 0,
            tier: RewardTier::Green,
            stars_to_next_reward: NEW_MEMBER_STARS_TO_REWARD,
        }
    }

    /// Existing balance.
    pub fn with_balance(stars: u32, tier: RewardTier, stars_to_next_reward: u32) -> Self {
        Self {
            stars,
            tier,
            stars_to_next_reward,
        }
    }

    /// Star balance
    pub fn stars(&self) -> u32 {
        self.stars
    }

    /// Membership tier
    pub fn tier(&self) -> RewardTier {
        self.tier
    }

    /// Stars still needed for the next reward
    pub fn stars_to_next_reward(&self) -> u32 {
        self.stars_to_next_reward
    }

    /// Add stars. The distance to the next reward shrinks by the same amount, stopping at zero.
    pub fn credit(&mut self, stars: u32) {
        self.stars = self.stars.saturating_add(stars);
        self.stars_to_next_reward = self.stars_to_next_reward.saturating_sub(stars);
    }

    /// Whether a reward can be redeemed.
    pub fn reward_available(&self) -> bool {
        self.stars_to_next_reward == 0
    }

    /// Progress through the current reward cycle.
    pub fn progress(&self) -> Percentage {
        let remaining = self.stars_to_next_reward.min(REWARD_CYCLE_STARS);
        let earned = Decimal::from(REWARD_CYCLE_STARS - remaining);

        Percentage::from(earned / Decimal::from(REWARD_CYCLE_STARS))
    }
}

impl Default for Rewards {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn two_stars_per_dollar_rounded_down() {
        assert_eq!(loyalty_points(&Money::from_minor(1463, USD)), 29);
        assert_eq!(loyalty_points(&Money::from_minor(1450, USD)), 29);
        assert_eq!(loyalty_points(&Money::from_minor(49, USD)), 0);
        assert_eq!(loyalty_points(&Money::from_minor(0, USD)), 0);
        assert_eq!(loyalty_points(&Money::from_minor(-500, USD)), 0);
    }

    #[test]
    fn new_members_start_green() {
        let rewards = Rewards::new();

        assert_eq!(rewards.stars(), 0);
        assert_eq!(rewards.tier(), RewardTier::Green);
        assert_eq!(rewards.stars_to_next_reward(), 50);
        assert!(!rewards.reward_available());
    }

    #[test]
    fn credit_saturates_distance_to_reward() {
        let mut rewards = Rewards::new();

        rewards.credit(29);
        assert_eq!(rewards.stars(), 29);
        assert_eq!(rewards.stars_to_next_reward(), 21);

        rewards.credit(29);
        assert_eq!(rewards.stars(), 58);
        assert_eq!(rewards.stars_to_next_reward(), 0);
        assert!(rewards.reward_available());
    }

    #[test]
    fn progress_is_share_of_cycle() {
        let rewards = Rewards::with_balance(150, RewardTier::Gold, 50);

        assert_eq!(rewards.progress(), Percentage::from(0.75));
    }
}
