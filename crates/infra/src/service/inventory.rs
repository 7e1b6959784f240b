use chrono::Utc;
use tracing::{info, instrument};

use bloodbank_core::BloodGroup;
use bloodbank_inventory::{BloodInventory, InventorySnapshot, LedgerEntry};

use super::BloodBankService;
use crate::error::ServiceResult;
use crate::ledger;

impl BloodBankService {
    /// Operator correction of one group's stock by `delta_units` (may be
    /// negative or zero). Rejected if stock would go below zero.
    #[instrument(skip(self, blood_group), fields(blood_group = %blood_group), err(level = "warn"))]
    pub async fn adjust_inventory(
        &self,
        blood_group: BloodGroup,
        delta_units: i64,
    ) -> ServiceResult<BloodInventory> {
        let mut uow = self.begin_write().await?;
        let stock = ledger::post(
            uow.conn(),
            LedgerEntry::adjustment(blood_group, delta_units),
            Utc::now(),
        )
        .await?;
        uow.commit().await?;

        info!(total_units = stock.total_units, "inventory adjusted");
        Ok(stock)
    }

    /// Units on hand for one group; 0 if it has never been stocked.
    #[instrument(skip(self, blood_group), fields(blood_group = %blood_group))]
    pub async fn inventory_units(&self, blood_group: BloodGroup) -> ServiceResult<i64> {
        let mut uow = self.begin().await?;
        let units = ledger::units(uow.conn(), blood_group).await?;
        uow.commit().await?;
        Ok(units)
    }

    /// Stock for all eight groups.
    #[instrument(skip(self))]
    pub async fn inventory_snapshot(&self) -> ServiceResult<InventorySnapshot> {
        let mut uow = self.begin().await?;
        let snapshot = ledger::snapshot(uow.conn()).await?;
        uow.commit().await?;
        Ok(snapshot)
    }

    /// Persisted inventory rows ordered by blood group.
    #[instrument(skip(self))]
    pub async fn inventory_rows(&self) -> ServiceResult<Vec<BloodInventory>> {
        let mut uow = self.begin().await?;
        let rows = ledger::rows(uow.conn()).await?;
        uow.commit().await?;
        Ok(rows)
    }
}
