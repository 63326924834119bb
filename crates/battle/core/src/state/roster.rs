//! Roster of all combatants in one battle.

use super::types::{Side, UnitId};
use super::unit::BattleUnit;

/// Every unit taking part in a battle, party first, enemies after.
///
/// Units are never removed: dead and fled units stay in place so that
/// identifiers remain stable and revival is possible.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    units: Vec<BattleUnit>,
    party_len: usize,
}

impl Roster {
    /// Assigns dense ids and sides to the given units.
    pub fn new(party: Vec<BattleUnit>, enemies: Vec<BattleUnit>) -> Self {
        let party_len = party.len();
        let units = party
            .into_iter()
            .map(|u| (Side::Party, u))
            .chain(enemies.into_iter().map(|u| (Side::Enemy, u)))
            .enumerate()
            .map(|(index, (side, mut unit))| {
                unit.id = UnitId(index as u16);
                unit.side = side;
                unit
            })
            .collect();
        Self { units, party_len }
    }

    pub fn get(&self, id: UnitId) -> Option<&BattleUnit> {
        self.units.get(id.index())
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut BattleUnit> {
        self.units.get_mut(id.index())
    }

    pub fn contains(&self, id: UnitId) -> bool {
        id.index() < self.units.len()
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.get(id).is_some_and(BattleUnit::is_alive)
    }

    pub fn side_of(&self, id: UnitId) -> Option<Side> {
        self.get(id).map(|u| u.side)
    }

    pub fn all(&self) -> &[BattleUnit] {
        &self.units
    }

    pub fn party(&self) -> &[BattleUnit] {
        &self.units[..self.party_len]
    }

    pub fn enemies(&self) -> &[BattleUnit] {
        &self.units[self.party_len..]
    }

    pub fn side(&self, side: Side) -> &[BattleUnit] {
        match side {
            Side::Party => self.party(),
            Side::Enemy => self.enemies(),
        }
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &BattleUnit> {
        self.side(side).iter().filter(|u| u.is_alive())
    }

    pub fn living_ids(&self, side: Side) -> Vec<UnitId> {
        self.living(side).map(|u| u.id).collect()
    }

    pub fn first_living(&self, side: Side) -> Option<&BattleUnit> {
        self.living(side).next()
    }

    pub fn any_alive(&self, side: Side) -> bool {
        self.first_living(side).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{UnitStats, UnitType};

    fn unit(name: &str) -> BattleUnit {
        BattleUnit::new(name, UnitType::Knight, UnitStats::default())
    }

    #[test]
    fn assigns_dense_ids_party_first() {
        let roster = Roster::new(vec![unit("a"), unit("b")], vec![unit("x")]);
        assert_eq!(roster.party()[1].id, UnitId(1));
        assert_eq!(roster.enemies()[0].id, UnitId(2));
        assert_eq!(roster.side_of(UnitId(2)), Some(Side::Enemy));
        assert_eq!(roster.side_of(UnitId(0)), Some(Side::Party));
    }

    #[test]
    fn living_skips_dead_units() {
        let mut roster = Roster::new(vec![unit("a"), unit("b")], vec![unit("x")]);
        roster.get_mut(UnitId(0)).unwrap().take_damage(1000);
        assert_eq!(roster.first_living(Side::Party).unwrap().id, UnitId(1));
        assert_eq!(roster.living_ids(Side::Party), vec![UnitId(1)]);
    }
}
