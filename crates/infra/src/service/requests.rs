use chrono::Utc;
use tracing::{info, instrument};

use bloodbank_core::{BloodRequestId, DomainError, Entity};
use bloodbank_recipients::{BloodRequest, NewBloodRequest, Recipient, RequestStatus};

use super::{unknown_reference, BloodBankService};
use crate::error::ServiceResult;
use crate::query::{Page, PageRequest, RequestListing};
use crate::repository::{recipients, requests};

impl BloodBankService {
    /// File a request for blood. New requests start `Pending`.
    #[instrument(
        skip(self, new),
        fields(recipient_id = %new.recipient_id, blood_group = %new.blood_group),
        err(level = "warn")
    )]
    pub async fn create_request(&self, new: NewBloodRequest) -> ServiceResult<BloodRequest> {
        let request = BloodRequest::file(new, Utc::now())?;

        let mut uow = self.begin_write().await?;
        if recipients::fetch(uow.conn(), request.recipient_id).await?.is_none() {
            return Err(
                unknown_reference("recipient_id", Recipient::NAME, request.recipient_id).into(),
            );
        }
        requests::insert(uow.conn(), &request).await?;
        uow.commit().await?;

        info!(request_id = %request.id, quantity_ml = request.quantity_needed_ml, "blood request filed");
        Ok(request)
    }

    #[instrument(skip(self, id), fields(request_id = %id))]
    pub async fn get_request(&self, id: BloodRequestId) -> ServiceResult<BloodRequest> {
        let mut uow = self.begin().await?;
        let request = requests::fetch(uow.conn(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(BloodRequest::NAME, id))?;
        uow.commit().await?;
        Ok(request)
    }

    /// Move a request to `status`, which must be an exact status label.
    ///
    /// Status changes never touch inventory.
    #[instrument(skip(self, id), fields(request_id = %id), err(level = "warn"))]
    pub async fn set_request_status(
        &self,
        id: BloodRequestId,
        status: &str,
    ) -> ServiceResult<BloodRequest> {
        let status: RequestStatus = status.parse()?;

        let mut uow = self.begin_write().await?;
        let mut request = requests::fetch(uow.conn(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(BloodRequest::NAME, id))?;
        let previous = request.status;
        request.set_status(status, Utc::now());
        requests::update_status(uow.conn(), id, request.status, request.updated_at).await?;
        uow.commit().await?;

        info!(from = %previous, to = %status, "blood request status changed");
        Ok(request)
    }

    #[instrument(skip(self, id), fields(request_id = %id), err(level = "warn"))]
    pub async fn delete_request(&self, id: BloodRequestId) -> ServiceResult<()> {
        let mut uow = self.begin_write().await?;
        if !requests::delete(uow.conn(), id).await? {
            return Err(DomainError::not_found(BloodRequest::NAME, id).into());
        }
        uow.commit().await?;

        info!("blood request deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_requests(
        &self,
        status: Option<&str>,
        page: PageRequest,
    ) -> ServiceResult<Page<RequestListing>> {
        let mut uow = self.begin().await?;
        let page = requests::list(uow.conn(), status, page).await?;
        uow.commit().await?;
        Ok(page)
    }
}
