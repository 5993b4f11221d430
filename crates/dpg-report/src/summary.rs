use dpg_settlement::{Event, EventRecord};
use dpg_types::{Amount, EpochIndex, Result};
use serde::{Deserialize, Serialize};

/// Totals of everything that happened while one epoch was current
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochSummary {
    pub epoch: EpochIndex,
    pub events: usize,
    pub deposited: Amount,
    pub refunded: Amount,
    pub destroyed_units: u64,
    pub accrued: Amount,
    pub purchases_reported: u64,
    pub donations_paid: Amount,
    pub rewards_paid: Amount,
    pub units_bought: u64,
    pub units_returned: u64,
    pub surcharges_collected: Amount,
    pub penalties_seized: Amount,
    pub penalties_withdrawn: Amount,
}

impl EpochSummary {
    /// Fold the records of `epoch`; records of other epochs are skipped
    pub fn from_records(epoch: EpochIndex, records: &[EventRecord]) -> Result<Self> {
        let mut summary = EpochSummary {
            epoch,
            ..Default::default()
        };

        for record in records.iter().filter(|r| r.epoch == epoch) {
            summary.events += 1;
            match &record.event {
                Event::EpochAdvanced { .. } => {}
                Event::Deposited { value, .. } => {
                    summary.deposited = summary.deposited.checked_add(*value)?;
                }
                Event::Refunded { value, .. } => {
                    summary.refunded = summary.refunded.checked_add(*value)?;
                }
                Event::DestroyedReported { count, accrued, .. } => {
                    summary.destroyed_units += count;
                    summary.accrued = summary.accrued.checked_add(*accrued)?;
                }
                Event::DonationClaimed { amount, .. } => {
                    summary.donations_paid = summary.donations_paid.checked_add(*amount)?;
                }
                Event::PurchaseReported { count, .. } => {
                    summary.purchases_reported += count;
                }
                Event::RewardClaimed { amount, .. } => {
                    summary.rewards_paid = summary.rewards_paid.checked_add(*amount)?;
                }
                Event::UnitsBought { ids, surcharge, .. } => {
                    summary.units_bought += ids.len() as u64;
                    summary.surcharges_collected =
                        summary.surcharges_collected.checked_add(*surcharge)?;
                }
                Event::UnitsReturned { ids, .. } => {
                    summary.units_returned += ids.len() as u64;
                }
                Event::UnitsThrownAway { ids, seized, .. } => {
                    summary.destroyed_units += ids.len() as u64;
                    summary.penalties_seized = summary.penalties_seized.checked_add(*seized)?;
                }
                Event::PenaltyWithdrawn { amount, .. }
                | Event::SeizedPenaltiesWithdrawn { amount, .. } => {
                    summary.penalties_withdrawn =
                        summary.penalties_withdrawn.checked_add(*amount)?;
                }
            }
        }

        Ok(summary)
    }
}
