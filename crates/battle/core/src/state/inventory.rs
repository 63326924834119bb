//! Shared party inventory.

use crate::catalog::{ItemDefinition, ItemStock};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySlot {
    pub item: ItemDefinition,
    pub quantity: u32,
}

/// Items shared by every party member. Slots keep their index when emptied.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    slots: Vec<InventorySlot>,
}

impl Inventory {
    pub fn new(stock: &[ItemStock]) -> Self {
        Self {
            slots: stock
                .iter()
                .map(|s| InventorySlot {
                    item: s.item.clone(),
                    quantity: s.quantity,
                })
                .collect(),
        }
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index)
    }

    /// Takes one item out of a slot and returns its definition.
    pub fn take(&mut self, index: usize) -> Option<ItemDefinition> {
        let slot = self.slots.get_mut(index)?;
        if slot.quantity == 0 {
            return None;
        }
        slot.quantity -= 1;
        Some(slot.item.clone())
    }

    /// Indices of slots that still hold at least one item.
    pub fn stocked_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.quantity > 0)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.quantity == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SkillTargetType;

    fn stock(name: &str, quantity: u32) -> ItemStock {
        ItemStock {
            item: ItemDefinition::new(name, SkillTargetType::Ally),
            quantity,
        }
    }

    #[test]
    fn take_decrements_and_stops_at_zero() {
        let mut inv = Inventory::new(&[stock("Potion", 1), stock("Ether", 0)]);
        assert_eq!(inv.take(0).unwrap().name, "Potion");
        assert!(inv.take(0).is_none());
        assert!(inv.take(1).is_none());
        assert!(inv.take(5).is_none());
        assert!(inv.is_empty());
    }

    #[test]
    fn stocked_slots_skip_empty() {
        let inv = Inventory::new(&[stock("a", 0), stock("b", 2), stock("c", 1)]);
        assert_eq!(inv.stocked_slots(), vec![1, 2]);
    }
}
