use dpg_types::{Address, Call, DpgError, Result, Role, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::authorizer::Authorizer;

/// Owner-administered registry of approved collectors, agencies and retailers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRegistry {
    owner: Address,
    members: BTreeMap<Role, BTreeMap<Address, Timestamp>>,
}

impl ActorRegistry {
    /// Create a registry administered by `owner`
    pub fn new(owner: Address) -> Self {
        ActorRegistry {
            owner,
            members: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Grant `role` to `who`; owner only
    pub fn add(&mut self, call: &Call, role: Role, who: Address) -> Result<()> {
        self.require(Role::Owner, &call.sender)?;
        if role == Role::Owner {
            return Err(DpgError::Config("the owner role cannot be granted".to_string()));
        }
        if who.is_zero() {
            return Err(DpgError::ZeroAddress);
        }

        let holders = self.members.entry(role).or_default();
        if holders.contains_key(&who) {
            return Err(DpgError::AlreadyApproved(who));
        }
        holders.insert(who, call.now);

        tracing::info!(%role, %who, "actor approved");
        Ok(())
    }

    /// Revoke `role` from `who`; owner only
    pub fn remove(&mut self, call: &Call, role: Role, who: Address) -> Result<()> {
        self.require(Role::Owner, &call.sender)?;
        if who.is_zero() {
            return Err(DpgError::ZeroAddress);
        }

        let removed = self
            .members
            .get_mut(&role)
            .and_then(|holders| holders.remove(&who));
        if removed.is_none() {
            return Err(DpgError::NotApproved(who));
        }

        tracing::info!(%role, %who, "actor removed");
        Ok(())
    }

    pub fn add_collector(&mut self, call: &Call, who: Address) -> Result<()> {
        self.add(call, Role::Collector, who)
    }

    pub fn remove_collector(&mut self, call: &Call, who: Address) -> Result<()> {
        self.remove(call, Role::Collector, who)
    }

    pub fn add_agency(&mut self, call: &Call, who: Address) -> Result<()> {
        self.add(call, Role::Agency, who)
    }

    pub fn remove_agency(&mut self, call: &Call, who: Address) -> Result<()> {
        self.remove(call, Role::Agency, who)
    }

    pub fn add_retailer(&mut self, call: &Call, who: Address) -> Result<()> {
        self.add(call, Role::Retailer, who)
    }

    pub fn remove_retailer(&mut self, call: &Call, who: Address) -> Result<()> {
        self.remove(call, Role::Retailer, who)
    }

    /// All current holders of `role`
    pub fn members(&self, role: Role) -> Vec<Address> {
        self.members
            .get(&role)
            .map(|holders| holders.keys().copied().collect())
            .unwrap_or_default()
    }
}

impl Authorizer for ActorRegistry {
    fn is_owner(&self, who: &Address) -> bool {
        self.owner == *who
    }

    fn has_role(&self, role: Role, who: &Address) -> bool {
        match role {
            Role::Owner => self.is_owner(who),
            _ => self.approved_since(role, who).is_some(),
        }
    }

    fn role_count(&self, role: Role) -> usize {
        match role {
            Role::Owner => 1,
            _ => self.members.get(&role).map_or(0, BTreeMap::len),
        }
    }

    fn approved_since(&self, role: Role, who: &Address) -> Option<Timestamp> {
        self.members
            .get(&role)
            .and_then(|holders| holders.get(who))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ActorRegistry, Address) {
        let owner = Address::from_low_u64_be(1);
        (ActorRegistry::new(owner), owner)
    }

    #[test]
    fn test_owner_adds_collector() {
        let (mut registry, owner) = setup();
        let collector = Address::from_low_u64_be(2);

        registry
            .add_collector(&Call::new(owner, 100), collector)
            .unwrap();

        assert!(registry.has_role(Role::Collector, &collector));
        assert!(!registry.has_role(Role::Agency, &collector));
        assert_eq!(registry.approved_since(Role::Collector, &collector), Some(100));
        assert_eq!(registry.role_count(Role::Collector), 1);
    }

    #[test]
    fn test_non_owner_cannot_add() {
        let (mut registry, _) = setup();
        let requestor = Address::from_low_u64_be(3);

        let result = registry.add_agency(&Call::new(requestor, 0), requestor);
        assert_eq!(
            result,
            Err(DpgError::Unauthorized {
                role: Role::Owner,
                caller: requestor
            })
        );
        assert_eq!(registry.role_count(Role::Agency), 0);
    }

    #[test]
    fn test_rejects_zero_and_duplicates() {
        let (mut registry, owner) = setup();
        let call = Call::new(owner, 0);
        let agency = Address::from_low_u64_be(4);

        assert_eq!(registry.add_agency(&call, Address::ZERO), Err(DpgError::ZeroAddress));

        registry.add_agency(&call, agency).unwrap();
        assert_eq!(
            registry.add_agency(&call, agency),
            Err(DpgError::AlreadyApproved(agency))
        );
    }

    #[test]
    fn test_remove() {
        let (mut registry, owner) = setup();
        let call = Call::new(owner, 0);
        let collector = Address::from_low_u64_be(5);

        assert_eq!(
            registry.remove_collector(&call, collector),
            Err(DpgError::NotApproved(collector))
        );

        registry.add_collector(&call, collector).unwrap();
        registry.remove_collector(&call, collector).unwrap();
        assert!(!registry.has_role(Role::Collector, &collector));
        assert!(registry.members(Role::Collector).is_empty());
    }

    #[test]
    fn test_owner_role_not_grantable() {
        let (mut registry, owner) = setup();
        let result = registry.add(&Call::new(owner, 0), Role::Owner, Address::from_low_u64_be(6));
        assert!(matches!(result, Err(DpgError::Config(_))));
    }

    #[test]
    fn test_require() {
        let (mut registry, owner) = setup();
        let retailer = Address::from_low_u64_be(7);
        registry.add_retailer(&Call::new(owner, 0), retailer).unwrap();

        assert!(registry.require(Role::Retailer, &retailer).is_ok());
        assert!(registry.require(Role::Owner, &owner).is_ok());
        assert!(registry.require(Role::Collector, &retailer).is_err());
    }

    #[test]
    fn test_registry_serializes() {
        let (mut registry, owner) = setup();
        registry
            .add_collector(&Call::new(owner, 0), Address::from_low_u64_be(8))
            .unwrap();

        let json = serde_json::to_string(&registry).unwrap();
        let back: ActorRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.members(Role::Collector), registry.members(Role::Collector));
    }
}
