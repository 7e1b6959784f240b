use chrono::Utc;
use tracing::{info, instrument, warn};

use bloodbank_core::{DomainError, RecipientId};
use bloodbank_recipients::{Recipient, RecipientDetails};

use super::{require_recipient, BloodBankService};
use crate::error::ServiceResult;
use crate::query::{Page, PageRequest};
use crate::repository::{recipients, requests};

impl BloodBankService {
    #[instrument(skip(self, details), fields(blood_group = %details.blood_group), err(level = "warn"))]
    pub async fn create_recipient(&self, details: RecipientDetails) -> ServiceResult<Recipient> {
        let recipient = Recipient::register(details, Utc::now())?;

        let mut uow = self.begin_write().await?;
        recipients::insert(uow.conn(), &recipient).await?;
        uow.commit().await?;

        info!(recipient_id = %recipient.id, "recipient registered");
        Ok(recipient)
    }

    #[instrument(skip(self, id), fields(recipient_id = %id))]
    pub async fn get_recipient(&self, id: RecipientId) -> ServiceResult<Recipient> {
        let mut uow = self.begin().await?;
        let recipient = require_recipient(uow.conn(), id).await?;
        uow.commit().await?;
        Ok(recipient)
    }

    #[instrument(skip(self, id, details), fields(recipient_id = %id), err(level = "warn"))]
    pub async fn update_recipient(
        &self,
        id: RecipientId,
        details: RecipientDetails,
    ) -> ServiceResult<Recipient> {
        let mut uow = self.begin_write().await?;
        let mut recipient = require_recipient(uow.conn(), id).await?;
        recipient.update(details, Utc::now())?;
        recipients::update(uow.conn(), &recipient).await?;
        uow.commit().await?;

        info!("recipient updated");
        Ok(recipient)
    }

    /// Remove a recipient that has no blood requests.
    #[instrument(skip(self, id), fields(recipient_id = %id), err(level = "warn"))]
    pub async fn delete_recipient(&self, id: RecipientId) -> ServiceResult<()> {
        let mut uow = self.begin_write().await?;
        require_recipient(uow.conn(), id).await?;

        let dependents = requests::count_for_recipient(uow.conn(), id).await?;
        if dependents > 0 {
            warn!(dependents, "recipient still referenced by blood requests");
            return Err(DomainError::conflict(format!(
                "recipient {id} has dependent blood requests ({dependents})"
            ))
            .into());
        }

        recipients::delete(uow.conn(), id).await?;
        uow.commit().await?;

        info!("recipient deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_recipients(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> ServiceResult<Page<Recipient>> {
        let mut uow = self.begin().await?;
        let page = recipients::list(uow.conn(), search, page).await?;
        uow.commit().await?;
        Ok(page)
    }
}
