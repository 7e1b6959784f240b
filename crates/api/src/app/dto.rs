//! Request bodies and query strings.
//!
//! Enum labels, ids and dates arrive as strings and are parsed here, so a bad
//! value surfaces as a `validation_error` naming the field.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

use bloodbank_core::{BloodGroup, DomainError, DomainResult, DonorId, Gender, RecipientId};
use bloodbank_donors::{DonationDetails, DonorDetails};
use bloodbank_infra::PageRequest;
use bloodbank_recipients::{NewBloodRequest, RecipientDetails, RequestStatus};

fn parse<T>(raw: &str) -> DomainResult<T>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse()
}

fn parse_date(field: &str, raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::validation(field, format!("'{raw}' is not a YYYY-MM-DD date")))
}

#[derive(Debug, Deserialize)]
pub struct DonorRequest {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub blood_group: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub last_donation_date: Option<String>,
}

impl DonorRequest {
    pub fn into_details(self) -> DomainResult<DonorDetails> {
        let last_donation_date = match self.last_donation_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date("last_donation_date", raw)?),
        };
        Ok(DonorDetails {
            gender: parse::<Gender>(&self.gender)?,
            blood_group: parse::<BloodGroup>(&self.blood_group)?,
            name: self.name,
            age: self.age,
            phone: self.phone,
            email: self.email,
            address: self.address,
            last_donation_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RecipientRequest {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub blood_group: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub request_status: Option<String>,
}

impl RecipientRequest {
    pub fn into_details(self) -> DomainResult<RecipientDetails> {
        let request_status = match self.request_status.as_deref() {
            None => RequestStatus::default(),
            Some(raw) => parse::<RequestStatus>(raw).map_err(|_| {
                DomainError::validation("request_status", format!("'{raw}' is not a request status"))
            })?,
        };
        Ok(RecipientDetails {
            gender: parse::<Gender>(&self.gender)?,
            blood_group: parse::<BloodGroup>(&self.blood_group)?,
            name: self.name,
            age: self.age,
            phone: self.phone,
            email: self.email,
            address: self.address,
            request_status,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DonationRequest {
    pub donor_id: String,
    pub donation_date: String,
    pub blood_volume_ml: i32,
    pub hospital: String,
}

impl DonationRequest {
    pub fn into_details(self) -> DomainResult<DonationDetails> {
        Ok(DonationDetails {
            donor_id: parse::<DonorId>(&self.donor_id)?,
            donation_date: parse_date("donation_date", &self.donation_date)?,
            blood_volume_ml: self.blood_volume_ml,
            hospital: self.hospital,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBloodRequest {
    pub recipient_id: String,
    pub blood_group: String,
    pub quantity_needed_ml: i32,
}

impl CreateBloodRequest {
    pub fn into_new(self) -> DomainResult<NewBloodRequest> {
        Ok(NewBloodRequest {
            recipient_id: parse::<RecipientId>(&self.recipient_id)?,
            blood_group: parse::<BloodGroup>(&self.blood_group)?,
            quantity_needed_ml: self.quantity_needed_ml,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AdjustInventoryRequest {
    pub blood_group: String,
    pub delta_units: i64,
}

impl AdjustInventoryRequest {
    pub fn blood_group(&self) -> DomainResult<BloodGroup> {
        parse(&self.blood_group)
    }
}

/// `?search=&page=` on the donor, recipient and donation listings.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl SearchQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.page)
    }
}

/// `?status=&page=` on the request listing.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
}

impl StatusQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.page)
    }
}
