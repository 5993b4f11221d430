use dpg_actors::Authorizer;
use dpg_types::{Amount, Call, DpgError, Result, Role, Rollover};
use serde::{Deserialize, Serialize};

use crate::accrual::{AccrualPool, AccruingVariant};
use crate::claims::ClaimBook;
use crate::config::EngineConfig;
use crate::engine::{Engine, Variant};
use crate::events::Event;

/// Agency variant: garbage reports feed a fund shared among approved agencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationState {
    pub fund: AccrualPool,
    pub claims: ClaimBook,
}

impl Variant for DonationState {
    const NAME: &'static str = "donation";

    // The fund is a running balance; nothing is epoch-scoped.
    fn on_rollover(&mut self, _rollover: Rollover) {}
}

impl AccruingVariant for DonationState {
    fn pool(&self) -> &AccrualPool {
        &self.fund
    }

    fn pool_mut(&mut self) -> &mut AccrualPool {
        &mut self.fund
    }

    fn share_bps(config: &EngineConfig) -> u32 {
        config.donation_share_bps
    }
}

pub type DonationEngine<A> = Engine<DonationState, A>;

impl<A: Authorizer> Engine<DonationState, A> {
    /// Pay the calling agency an equal share of the agency fund, once per epoch.
    ///
    /// The share is the fund's settlement basis for the epoch divided by the
    /// number of currently approved agencies, capped by what is left in the
    /// fund. What nobody claims carries forward.
    pub fn claim_donation(&mut self, call: &Call) -> Result<Amount> {
        self.atomically(|engine| {
            let agency = call.sender;
            engine.authorizer.require(Role::Agency, &agency)?;
            let epoch = engine.advance_for_settlement(call.now)?;
            engine.variant.claims.ensure_unclaimed(&agency, epoch)?;

            let approved_at = engine
                .authorizer
                .approved_since(Role::Agency, &agency)
                .ok_or(DpgError::Unauthorized {
                    role: Role::Agency,
                    caller: agency,
                })?;
            if call.now.saturating_sub(approved_at) < engine.config.epoch_length_secs {
                return Err(DpgError::NotYetEligible(agency));
            }

            let agencies = engine.authorizer.role_count(Role::Agency);
            let share = engine
                .variant
                .fund
                .basis_for(epoch)
                .split(agencies)
                .min(engine.variant.fund.balance());
            if share.is_zero() {
                return Err(DpgError::NothingToClaim(agency));
            }

            engine.variant.fund.draw(share)?;
            engine.pay(&agency, share)?;
            engine.variant.claims.record(agency, epoch);

            tracing::info!(%agency, epoch, amount = %share, agencies, "donation claimed");
            engine.emit(call.now, Event::DonationClaimed { agency, amount: share });
            Ok(share)
        })
    }

    pub fn agency_fund(&self) -> Amount {
        self.variant.fund.balance()
    }
}
