use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::instrument;

use bloodbank_inventory::{BloodInventory, InventorySnapshot};

use super::BloodBankService;
use crate::error::ServiceResult;
use crate::ledger;
use crate::query::DonationListing;
use crate::repository::{donations, donors, recipients, requests};

/// Number of recent donations shown on the dashboard.
pub const RECENT_DONATIONS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total_donors: i64,
    pub total_recipients: i64,
    pub total_donations: i64,
    pub total_requests: i64,
}

/// Counts plus stock for every blood group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    #[serde(flatten)]
    pub counts: Counts,
    pub blood_inventory: InventorySnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub counts: Counts,
    pub recent_donations: Vec<DonationListing>,
    pub inventory: Vec<BloodInventory>,
}

async fn counts(conn: &mut SqliteConnection) -> ServiceResult<Counts> {
    Ok(Counts {
        total_donors: donors::count(conn).await?,
        total_recipients: recipients::count(conn).await?,
        total_donations: donations::count(conn).await?,
        total_requests: requests::count(conn).await?,
    })
}

impl BloodBankService {
    #[instrument(skip(self))]
    pub async fn stats(&self) -> ServiceResult<Stats> {
        let mut uow = self.begin().await?;
        let counts = counts(uow.conn()).await?;
        let blood_inventory = ledger::snapshot(uow.conn()).await?;
        uow.commit().await?;
        Ok(Stats {
            counts,
            blood_inventory,
        })
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> ServiceResult<Dashboard> {
        let mut uow = self.begin().await?;
        let counts = counts(uow.conn()).await?;
        let recent_donations = donations::recent(uow.conn(), RECENT_DONATIONS).await?;
        let inventory = ledger::rows(uow.conn()).await?;
        uow.commit().await?;
        Ok(Dashboard {
            counts,
            recent_donations,
            inventory,
        })
    }
}
