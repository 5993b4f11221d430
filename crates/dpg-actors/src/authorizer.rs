use dpg_types::{Address, DpgError, Result, Role, Timestamp};

/// Capability checks the settlement engine asks of the actor registry
pub trait Authorizer {
    /// Check whether `who` is the settlement authority
    fn is_owner(&self, who: &Address) -> bool;

    /// Check whether `who` currently holds `role`
    fn has_role(&self, role: Role, who: &Address) -> bool;

    /// Number of actors currently holding `role`
    fn role_count(&self, role: Role) -> usize;

    /// When `who` was granted `role`, if it currently holds it
    fn approved_since(&self, role: Role, who: &Address) -> Option<Timestamp>;

    /// Fail with `Unauthorized` unless `who` holds `role`
    fn require(&self, role: Role, who: &Address) -> Result<()> {
        let allowed = match role {
            Role::Owner => self.is_owner(who),
            _ => self.has_role(role, who),
        };
        if allowed {
            Ok(())
        } else {
            Err(DpgError::Unauthorized { role, caller: *who })
        }
    }
}
