//! Elemental matchup table.
//!
//! - Classical cycle: Ignis > Ventus > Terra > Aqua > Ignis
//! - Arcane pair: Lux and Umbra are strong against each other
//! - Same element, `None`, or classical vs arcane: neutral

use crate::config::BattleConfig;
use crate::state::ElementType;

/// True when `attacker` gets the strong multiplier against `defender`.
pub fn is_strong_against(attacker: ElementType, defender: ElementType) -> bool {
    use ElementType::*;
    matches!(
        (attacker, defender),
        (Ignis, Ventus)
            | (Ventus, Terra)
            | (Terra, Aqua)
            | (Aqua, Ignis)
            | (Lux, Umbra)
            | (Umbra, Lux)
    )
}

/// True when `attacker` gets the weak multiplier against `defender`.
pub fn is_weak_against(attacker: ElementType, defender: ElementType) -> bool {
    use ElementType::*;
    matches!(
        (attacker, defender),
        (Ventus, Ignis) | (Terra, Ventus) | (Aqua, Terra) | (Ignis, Aqua)
    )
}

/// Damage multiplier for `attacker` hitting `defender`.
pub fn element_multiplier(
    attacker: ElementType,
    defender: ElementType,
    config: &BattleConfig,
) -> f32 {
    if is_strong_against(attacker, defender) {
        config.element_strong_multiplier
    } else if is_weak_against(attacker, defender) {
        config.element_weak_multiplier
    } else {
        1.0
    }
}

/// Element that takes reduced damage from `incoming`.
///
/// Used by shifting enemies to adapt to the party's last attack element.
/// `None` maps to Ignis.
pub fn resistant_element(incoming: ElementType) -> ElementType {
    use ElementType::*;
    match incoming {
        Ignis => Aqua,
        Aqua => Terra,
        Terra => Ventus,
        Ventus => Ignis,
        Lux => Umbra,
        Umbra => Lux,
        None => Ignis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn classical_cycle() {
        let config = BattleConfig::default();
        assert_eq!(element_multiplier(ElementType::Ignis, ElementType::Ventus, &config), 1.5);
        assert_eq!(element_multiplier(ElementType::Ventus, ElementType::Ignis, &config), 0.5);
        assert_eq!(element_multiplier(ElementType::Aqua, ElementType::Ignis, &config), 1.5);
        assert_eq!(element_multiplier(ElementType::Terra, ElementType::Aqua, &config), 1.5);
    }

    #[test]
    fn arcane_pair_is_mutual() {
        let config = BattleConfig::default();
        assert_eq!(element_multiplier(ElementType::Lux, ElementType::Umbra, &config), 1.5);
        assert_eq!(element_multiplier(ElementType::Umbra, ElementType::Lux, &config), 1.5);
    }

    #[test]
    fn neutral_matchups() {
        let config = BattleConfig::default();
        for e in ElementType::iter() {
            assert_eq!(element_multiplier(e, e, &config), 1.0);
            assert_eq!(element_multiplier(ElementType::None, e, &config), 1.0);
            assert_eq!(element_multiplier(e, ElementType::None, &config), 1.0);
        }
        assert_eq!(element_multiplier(ElementType::Ignis, ElementType::Lux, &config), 1.0);
        assert_eq!(element_multiplier(ElementType::Umbra, ElementType::Terra, &config), 1.0);
    }

    #[test]
    fn resistant_element_takes_weak_damage() {
        for incoming in [
            ElementType::Ignis,
            ElementType::Aqua,
            ElementType::Terra,
            ElementType::Ventus,
        ] {
            assert!(is_weak_against(incoming, resistant_element(incoming)));
        }
        assert_eq!(resistant_element(ElementType::None), ElementType::Ignis);
        assert_eq!(resistant_element(ElementType::Lux), ElementType::Umbra);
    }
}
