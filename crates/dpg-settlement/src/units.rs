use dpg_types::{Address, Amount, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered one-way unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub owner: Address,
    /// Penalty surcharge withheld from the owner when it bought this unit
    pub withheld: Amount,
}

/// Arena of registered units keyed by identifier; presence means registered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, UnitRecord>,
}

impl UnitRegistry {
    pub fn exists(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitRecord> {
        self.units.get(&id)
    }

    pub fn owner_of(&self, id: UnitId) -> Option<Address> {
        self.units.get(&id).map(|unit| unit.owner)
    }

    /// Register `id` to `owner`, or hand an existing unit over to `owner`.
    /// Returns true when the unit was newly registered.
    pub fn register_or_transfer(&mut self, id: UnitId, owner: Address, withheld: Amount) -> bool {
        match self.units.get_mut(&id) {
            Some(unit) => {
                unit.owner = owner;
                unit.withheld = withheld;
                false
            }
            None => {
                self.units.insert(id, UnitRecord { owner, withheld });
                true
            }
        }
    }

    /// Deregister `id`, returning its record if it was registered
    pub fn deregister(&mut self, id: UnitId) -> Option<UnitRecord> {
        self.units.remove(&id)
    }

    /// Number of registered units
    pub fn total_supply(&self) -> usize {
        self.units.len()
    }

    /// Identifiers currently owned by `owner`, ascending
    pub fn units_of(&self, owner: &Address) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|(_, unit)| unit.owner == *owner)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_transfer_deregister() {
        let retail = Address::from_low_u64_be(1);
        let consumer = Address::from_low_u64_be(2);
        let mut registry = UnitRegistry::default();

        assert!(registry.register_or_transfer(1, retail, Amount::ZERO));
        assert!(registry.register_or_transfer(2, retail, Amount::ZERO));
        assert!(!registry.register_or_transfer(2, consumer, Amount::ZERO));

        assert_eq!(registry.total_supply(), 2);
        assert_eq!(registry.units_of(&retail), vec![1]);
        assert_eq!(registry.owner_of(2), Some(consumer));

        let record = registry.deregister(2).unwrap();
        assert_eq!(record.owner, consumer);
        assert!(!registry.exists(2));
        assert!(registry.deregister(2).is_none());
    }
}
