use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bloodbank_core::{validate, DomainResult, DonationId, DonorId, Entity};

pub const MIN_DONATION_ML: i32 = 100;
pub const MAX_DONATION_ML: i32 = 500;

/// Editable attributes of a donation.
///
/// The donor reference is checked against storage by the caller; only the
/// field-level rules live here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationDetails {
    pub donor_id: DonorId,
    pub donation_date: NaiveDate,
    pub blood_volume_ml: i32,
    pub hospital: String,
}

impl DonationDetails {
    pub fn validate(&self) -> DomainResult<()> {
        validate::in_range(
            "blood_volume_ml",
            self.blood_volume_ml,
            MIN_DONATION_ML,
            MAX_DONATION_ML,
        )?;
        validate::required_text("hospital", &self.hospital, 100)?;
        Ok(())
    }
}

/// One recorded blood donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: DonationId,
    pub donor_id: DonorId,
    pub donation_date: NaiveDate,
    pub blood_volume_ml: i32,
    pub hospital: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    pub fn record(details: DonationDetails, now: DateTime<Utc>) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id: DonationId::new(),
            donor_id: details.donor_id,
            donation_date: details.donation_date,
            blood_volume_ml: details.blood_volume_ml,
            hospital: details.hospital.trim().to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable attributes. On error the donation is left untouched.
    pub fn update(&mut self, details: DonationDetails, now: DateTime<Utc>) -> DomainResult<()> {
        details.validate()?;
        self.donor_id = details.donor_id;
        self.donation_date = details.donation_date;
        self.blood_volume_ml = details.blood_volume_ml;
        self.hospital = details.hospital.trim().to_string();
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Donation {
    type Id = DonationId;

    const NAME: &'static str = "donation";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
