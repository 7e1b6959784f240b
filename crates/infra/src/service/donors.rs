use chrono::Utc;
use tracing::{info, instrument, warn};

use bloodbank_core::{DomainError, DonorId};
use bloodbank_donors::{Donor, DonorDetails};

use super::{require_donor, BloodBankService};
use crate::error::ServiceResult;
use crate::query::{Page, PageRequest};
use crate::repository::{donations, donors};

impl BloodBankService {
    #[instrument(skip(self, details), fields(blood_group = %details.blood_group), err(level = "warn"))]
    pub async fn create_donor(&self, details: DonorDetails) -> ServiceResult<Donor> {
        let donor = Donor::register(details, Utc::now())?;

        let mut uow = self.begin_write().await?;
        donors::insert(uow.conn(), &donor).await?;
        uow.commit().await?;

        info!(donor_id = %donor.id, "donor registered");
        Ok(donor)
    }

    #[instrument(skip(self, id), fields(donor_id = %id))]
    pub async fn get_donor(&self, id: DonorId) -> ServiceResult<Donor> {
        let mut uow = self.begin().await?;
        let donor = require_donor(uow.conn(), id).await?;
        uow.commit().await?;
        Ok(donor)
    }

    #[instrument(skip(self, id, details), fields(donor_id = %id), err(level = "warn"))]
    pub async fn update_donor(&self, id: DonorId, details: DonorDetails) -> ServiceResult<Donor> {
        let mut uow = self.begin_write().await?;
        let mut donor = require_donor(uow.conn(), id).await?;
        donor.update(details, Utc::now())?;
        donors::update(uow.conn(), &donor).await?;
        uow.commit().await?;

        info!("donor updated");
        Ok(donor)
    }

    /// Remove a donor that has no recorded donations.
    #[instrument(skip(self, id), fields(donor_id = %id), err(level = "warn"))]
    pub async fn delete_donor(&self, id: DonorId) -> ServiceResult<()> {
        let mut uow = self.begin_write().await?;
        require_donor(uow.conn(), id).await?;

        let dependents = donations::count_for_donor(uow.conn(), id).await?;
        if dependents > 0 {
            warn!(dependents, "donor still referenced by donations");
            return Err(DomainError::conflict(format!(
                "donor {id} has dependent donations ({dependents})"
            ))
            .into());
        }

        donors::delete(uow.conn(), id).await?;
        uow.commit().await?;

        info!("donor deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_donors(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> ServiceResult<Page<Donor>> {
        let mut uow = self.begin().await?;
        let page = donors::list(uow.conn(), search, page).await?;
        uow.commit().await?;
        Ok(page)
    }
}
