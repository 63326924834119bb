use crate::error::SetupError;

/// Battle rules and tunable probabilities.
///
/// Every field has a compile-time default; TOML files only need to name the
/// values they override.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Block chance without a shield.
    pub base_block_chance: f32,
    pub shield_block_chance: f32,
    /// Fraction of damage that leaks through an unshielded block (ceiled).
    pub block_damage_multiplier: f32,
    pub shield_block_damage_multiplier: f32,
    pub base_dodge_chance: f32,
    /// Upper bound of dodge chance after gear bonuses.
    pub max_dodge_chance: f32,
    pub max_action_points: u8,
    pub critical_multiplier: f32,
    pub element_strong_multiplier: f32,
    pub element_weak_multiplier: f32,
    pub flee_chance: f32,
}

impl BattleConfig {
    pub const DEFAULT_BASE_BLOCK_CHANCE: f32 = 0.99;
    pub const DEFAULT_SHIELD_BLOCK_CHANCE: f32 = 1.0;
    pub const DEFAULT_BLOCK_DAMAGE_MULTIPLIER: f32 = 0.01;
    pub const DEFAULT_SHIELD_BLOCK_DAMAGE_MULTIPLIER: f32 = 0.0;
    pub const DEFAULT_BASE_DODGE_CHANCE: f32 = 0.75;
    pub const DEFAULT_MAX_DODGE_CHANCE: f32 = 0.95;
    pub const DEFAULT_MAX_ACTION_POINTS: u8 = 2;
    pub const DEFAULT_CRITICAL_MULTIPLIER: f32 = 1.5;
    pub const DEFAULT_ELEMENT_STRONG_MULTIPLIER: f32 = 1.5;
    pub const DEFAULT_ELEMENT_WEAK_MULTIPLIER: f32 = 0.5;
    pub const DEFAULT_FLEE_CHANCE: f32 = 0.75;

    pub fn new() -> Self {
        Self {
            base_block_chance: Self::DEFAULT_BASE_BLOCK_CHANCE,
            shield_block_chance: Self::DEFAULT_SHIELD_BLOCK_CHANCE,
            block_damage_multiplier: Self::DEFAULT_BLOCK_DAMAGE_MULTIPLIER,
            shield_block_damage_multiplier: Self::DEFAULT_SHIELD_BLOCK_DAMAGE_MULTIPLIER,
            base_dodge_chance: Self::DEFAULT_BASE_DODGE_CHANCE,
            max_dodge_chance: Self::DEFAULT_MAX_DODGE_CHANCE,
            max_action_points: Self::DEFAULT_MAX_ACTION_POINTS,
            critical_multiplier: Self::DEFAULT_CRITICAL_MULTIPLIER,
            element_strong_multiplier: Self::DEFAULT_ELEMENT_STRONG_MULTIPLIER,
            element_weak_multiplier: Self::DEFAULT_ELEMENT_WEAK_MULTIPLIER,
            flee_chance: Self::DEFAULT_FLEE_CHANCE,
        }
    }

    /// Rejects probabilities outside `[0, 1]`, negative multipliers and a
    /// zero action point budget.
    pub fn validate(&self) -> Result<(), SetupError> {
        let probabilities = [
            ("base_block_chance", self.base_block_chance),
            ("shield_block_chance", self.shield_block_chance),
            ("base_dodge_chance", self.base_dodge_chance),
            ("max_dodge_chance", self.max_dodge_chance),
            ("flee_chance", self.flee_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(SetupError::InvalidConfig {
                    field,
                    reason: "probability must lie in [0, 1]",
                });
            }
        }

        let multipliers = [
            ("block_damage_multiplier", self.block_damage_multiplier),
            (
                "shield_block_damage_multiplier",
                self.shield_block_damage_multiplier,
            ),
            ("critical_multiplier", self.critical_multiplier),
            ("element_strong_multiplier", self.element_strong_multiplier),
            ("element_weak_multiplier", self.element_weak_multiplier),
        ];
        for (field, value) in multipliers {
            if !(value >= 0.0) {
                return Err(SetupError::InvalidConfig {
                    field,
                    reason: "multiplier must be non-negative",
                });
            }
        }

        if self.max_action_points == 0 {
            return Err(SetupError::InvalidConfig {
                field: "max_action_points",
                reason: "at least one action point is required",
            });
        }
        Ok(())
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(BattleConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let config = BattleConfig {
            base_dodge_chance: 1.2,
            ..BattleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SetupError::InvalidConfig {
                field: "base_dodge_chance",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_action_points() {
        let config = BattleConfig {
            max_action_points: 0,
            ..BattleConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
