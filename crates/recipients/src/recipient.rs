use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bloodbank_core::{validate, BloodGroup, DomainResult, Entity, Gender, RecipientId};

use crate::status::RequestStatus;

pub const MIN_RECIPIENT_AGE: i32 = 1;
pub const MAX_RECIPIENT_AGE: i32 = 120;

/// Editable attributes of a recipient (create and full-replacement update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientDetails {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub request_status: RequestStatus,
}

impl RecipientDetails {
    pub fn validate(&self) -> DomainResult<()> {
        validate::text_length("name", &self.name, 2, 100)?;
        validate::in_range("age", self.age, MIN_RECIPIENT_AGE, MAX_RECIPIENT_AGE)?;
        validate::text_length("phone", &self.phone, 10, 15)?;
        validate::email("email", &self.email)?;
        validate::required_text("address", &self.address, 500)?;
        Ok(())
    }
}

/// A patient registered to receive blood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: RecipientId,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub request_status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipient {
    pub fn register(details: RecipientDetails, now: DateTime<Utc>) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id: RecipientId::new(),
            name: details.name.trim().to_string(),
            age: details.age,
            gender: details.gender,
            blood_group: details.blood_group,
            phone: details.phone.trim().to_string(),
            email: details.email.trim().to_string(),
            address: details.address.trim().to_string(),
            request_status: details.request_status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace every editable attribute. On error the recipient is left untouched.
    pub fn update(&mut self, details: RecipientDetails, now: DateTime<Utc>) -> DomainResult<()> {
        details.validate()?;
        self.name = details.name.trim().to_string();
        self.age = details.age;
        self.gender = details.gender;
        self.blood_group = details.blood_group;
        self.phone = details.phone.trim().to_string();
        self.email = details.email.trim().to_string();
        self.address = details.address.trim().to_string();
        self.request_status = details.request_status;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Recipient {
    type Id = RecipientId;

    const NAME: &'static str = "recipient";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
