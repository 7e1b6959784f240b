use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bloodbank_core::{validate, BloodGroup, BloodRequestId, DomainResult, Entity, RecipientId};

use crate::status::RequestStatus;

pub const MIN_REQUEST_ML: i32 = 100;
pub const MAX_REQUEST_ML: i32 = 2000;

/// Payload for filing a blood request. New requests always start `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBloodRequest {
    pub recipient_id: RecipientId,
    pub blood_group: BloodGroup,
    pub quantity_needed_ml: i32,
}

impl NewBloodRequest {
    pub fn validate(&self) -> DomainResult<()> {
        validate::in_range(
            "quantity_needed_ml",
            self.quantity_needed_ml,
            MIN_REQUEST_ML,
            MAX_REQUEST_ML,
        )
    }
}

/// An outstanding request for blood on behalf of a recipient.
///
/// Requests track status only. Completing a request does not debit
/// inventory and a request is never linked to specific donations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodRequest {
    pub id: BloodRequestId,
    pub recipient_id: RecipientId,
    pub blood_group: BloodGroup,
    pub quantity_needed_ml: i32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BloodRequest {
    pub fn file(new: NewBloodRequest, now: DateTime<Utc>) -> DomainResult<Self> {
        new.validate()?;
        Ok(Self {
            id: BloodRequestId::new(),
            recipient_id: new.recipient_id,
            blood_group: new.blood_group,
            quantity_needed_ml: new.quantity_needed_ml,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_status(&mut self, status: RequestStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

impl Entity for BloodRequest {
    type Id = BloodRequestId;

    const NAME: &'static str = "blood request";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_request(quantity: i32) -> NewBloodRequest {
        NewBloodRequest {
            recipient_id: RecipientId::new(),
            blood_group: BloodGroup::AbPositive,
            quantity_needed_ml: quantity,
        }
    }

    #[test]
    fn new_requests_start_pending() {
        let request = BloodRequest::file(new_request(900), Utc::now()).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn quantity_bounds() {
        assert!(BloodRequest::file(new_request(100), Utc::now()).is_ok());
        assert!(BloodRequest::file(new_request(2000), Utc::now()).is_ok());
        for q in [99, 2001] {
            let err = BloodRequest::file(new_request(q), Utc::now()).unwrap_err();
            assert_eq!(err.field(), Some("quantity_needed_ml"));
        }
    }

    #[test]
    fn any_status_transition_is_allowed() {
        let mut request = BloodRequest::file(new_request(450), Utc::now()).unwrap();
        request.set_status(RequestStatus::Completed, Utc::now());
        request.set_status(RequestStatus::Pending, Utc::now());
        assert_eq!(request.status, RequestStatus::Pending);
    }
}
