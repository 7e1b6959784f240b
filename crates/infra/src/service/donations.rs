use chrono::Utc;
use tracing::{info, instrument};

use bloodbank_core::{DomainError, DonationId, Entity};
use bloodbank_donors::{Donation, DonationDetails, Donor};
use bloodbank_inventory::LedgerEntry;

use super::{require_donor, unknown_reference, BloodBankService};
use crate::error::ServiceResult;
use crate::ledger;
use crate::query::{DonationListing, Page, PageRequest};
use crate::repository::{donations, donors};

impl BloodBankService {
    /// Record a donation, stamp the donor's last donation date and credit
    /// the donor's blood group, all in one transaction.
    #[instrument(
        skip(self, details),
        fields(donor_id = %details.donor_id, volume_ml = details.blood_volume_ml),
        err(level = "warn")
    )]
    pub async fn record_donation(&self, details: DonationDetails) -> ServiceResult<Donation> {
        let now = Utc::now();
        let donation = Donation::record(details, now)?;

        let mut uow = self.begin_write().await?;
        let mut donor = require_donor(uow.conn(), donation.donor_id).await?;

        donations::insert(uow.conn(), &donation).await?;

        donor.note_donation(donation.donation_date, now);
        donors::update(uow.conn(), &donor).await?;

        let entry = LedgerEntry::donation(donor.blood_group, donation.blood_volume_ml);
        let stock = ledger::post(uow.conn(), entry, now).await?;

        uow.commit().await?;

        info!(
            donation_id = %donation.id,
            blood_group = %donor.blood_group,
            credited_units = entry.delta_units(),
            total_units = stock.total_units,
            "donation recorded"
        );
        Ok(donation)
    }

    #[instrument(skip(self, id), fields(donation_id = %id))]
    pub async fn get_donation(&self, id: DonationId) -> ServiceResult<Donation> {
        let mut uow = self.begin().await?;
        let donation = donations::fetch(uow.conn(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(Donation::NAME, id))?;
        uow.commit().await?;
        Ok(donation)
    }

    /// Edit a donation. The inventory ledger is not re-credited.
    #[instrument(skip(self, id, details), fields(donation_id = %id), err(level = "warn"))]
    pub async fn update_donation(
        &self,
        id: DonationId,
        details: DonationDetails,
    ) -> ServiceResult<Donation> {
        let mut uow = self.begin_write().await?;
        let mut donation = donations::fetch(uow.conn(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(Donation::NAME, id))?;
        donation.update(details, Utc::now())?;

        if donors::fetch(uow.conn(), donation.donor_id).await?.is_none() {
            return Err(unknown_reference("donor_id", Donor::NAME, donation.donor_id).into());
        }

        donations::update(uow.conn(), &donation).await?;
        uow.commit().await?;

        info!("donation updated");
        Ok(donation)
    }

    /// Delete a donation. Units already credited stay in inventory.
    #[instrument(skip(self, id), fields(donation_id = %id), err(level = "warn"))]
    pub async fn delete_donation(&self, id: DonationId) -> ServiceResult<()> {
        let mut uow = self.begin_write().await?;
        if !donations::delete(uow.conn(), id).await? {
            return Err(DomainError::not_found(Donation::NAME, id).into());
        }
        uow.commit().await?;

        info!("donation deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_donations(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> ServiceResult<Page<DonationListing>> {
        let mut uow = self.begin().await?;
        let page = donations::list(uow.conn(), search, page).await?;
        uow.commit().await?;
        Ok(page)
    }
}
