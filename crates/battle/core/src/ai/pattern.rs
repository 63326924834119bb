use super::EnemyAi;
use super::strategies::{
    Avenger, BasicAi, Berserker, Bodyguard, Commander, Coward, Debuffer, ElementalShifter,
    GlassCannon, HealerPriest, Martyr, Mimic, Ritualist, Saboteur, Sniper, SwarmDrone, Tactician,
    Vampire,
};
use crate::catalog::SkillDefinition;

/// Named enemy behavior. Used by content files to bind a strategy to a unit.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AiPattern {
    #[default]
    Basic,
    Berserker,
    Tactician,
    Bodyguard,
    Sniper,
    HealerPriest,
    GlassCannon,
    Debuffer,
    Vampire,
    Martyr,
    Mimic,
    Coward,
    Avenger,
    Ritualist,
    SwarmDrone,
    Saboteur,
    ElementalShifter,
    Commander,
}

impl AiPattern {
    /// Builds a fresh strategy.
    ///
    /// `enemy_skills` is the unit-type skill set; only [`AiPattern::Basic`]
    /// draws from it; the other patterns carry their own signature skills.
    pub fn create(self, enemy_skills: &[SkillDefinition]) -> Box<dyn EnemyAi> {
        match self {
            Self::Basic => Box::new(BasicAi::new(enemy_skills.to_vec())),
            Self::Berserker => Box::new(Berserker::new()),
            Self::Tactician => Box::new(Tactician::new()),
            Self::Bodyguard => Box::new(Bodyguard::new()),
            Self::Sniper => Box::new(Sniper::new()),
            Self::HealerPriest => Box::new(HealerPriest::new()),
            Self::GlassCannon => Box::new(GlassCannon::new()),
            Self::Debuffer => Box::new(Debuffer::new()),
            Self::Vampire => Box::new(Vampire::new()),
            Self::Martyr => Box::new(Martyr::new()),
            Self::Mimic => Box::new(Mimic::new()),
            Self::Coward => Box::new(Coward::new()),
            Self::Avenger => Box::new(Avenger::new()),
            Self::Ritualist => Box::new(Ritualist::new()),
            Self::SwarmDrone => Box::new(SwarmDrone::new()),
            Self::Saboteur => Box::new(Saboteur::new()),
            Self::ElementalShifter => Box::new(ElementalShifter::new()),
            Self::Commander => Box::new(Commander::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_pattern_builds_a_matching_strategy() {
        for pattern in AiPattern::iter() {
            assert_eq!(pattern.create(&[]).pattern(), pattern);
        }
        assert_eq!(AiPattern::iter().count(), 18);
    }

    #[test]
    fn parses_snake_case_names() {
        assert_eq!(
            "healer_priest".parse::<AiPattern>().unwrap(),
            AiPattern::HealerPriest
        );
        assert_eq!(
            "ElementalShifter".parse::<AiPattern>().ok(),
            None,
            "camel case is not a recognised spelling"
        );
        assert_eq!(
            "SWARM_DRONE".parse::<AiPattern>().unwrap(),
            AiPattern::SwarmDrone
        );
    }
}
