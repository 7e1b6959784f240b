use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bloodbank_core::{validate, BloodGroup, DomainResult, DonorId, Entity, Gender};

pub const MIN_DONOR_AGE: i32 = 18;
pub const MAX_DONOR_AGE: i32 = 100;

/// Editable attributes of a donor (create and full-replacement update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorDetails {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub last_donation_date: Option<NaiveDate>,
}

impl DonorDetails {
    pub fn validate(&self) -> DomainResult<()> {
        validate::text_length("name", &self.name, 2, 100)?;
        validate::in_range("age", self.age, MIN_DONOR_AGE, MAX_DONOR_AGE)?;
        validate::text_length("phone", &self.phone, 10, 15)?;
        validate::email("email", &self.email)?;
        validate::required_text("address", &self.address, 500)?;
        Ok(())
    }

    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            ..self
        }
    }
}

/// A registered blood donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    pub id: DonorId,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub last_donation_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donor {
    /// Validate `details` and build a new donor record.
    pub fn register(details: DonorDetails, now: DateTime<Utc>) -> DomainResult<Self> {
        details.validate()?;
        let d = details.normalized();
        Ok(Self {
            id: DonorId::new(),
            name: d.name,
            age: d.age,
            gender: d.gender,
            blood_group: d.blood_group,
            phone: d.phone,
            email: d.email,
            address: d.address,
            last_donation_date: d.last_donation_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace every editable attribute. On error the donor is left untouched.
    pub fn update(&mut self, details: DonorDetails, now: DateTime<Utc>) -> DomainResult<()> {
        details.validate()?;
        let d = details.normalized();
        self.name = d.name;
        self.age = d.age;
        self.gender = d.gender;
        self.blood_group = d.blood_group;
        self.phone = d.phone;
        self.email = d.email;
        self.address = d.address;
        self.last_donation_date = d.last_donation_date;
        self.updated_at = now;
        Ok(())
    }

    /// Record that this donor gave blood on `date`.
    ///
    /// The latest recorded donation wins, even if it is dated earlier than
    /// the current value.
    pub fn note_donation(&mut self, date: NaiveDate, now: DateTime<Utc>) {
        self.last_donation_date = Some(date);
        self.updated_at = now;
    }
}

impl Entity for Donor {
    type Id = DonorId;

    const NAME: &'static str = "donor";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
