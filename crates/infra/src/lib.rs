//! Infrastructure layer: SQLite persistence, transactions and the service facade.

pub mod db;
pub mod error;
pub mod ledger;
pub mod query;
pub mod repository;
pub mod service;
pub mod unit_of_work;

pub use db::DatabaseConfig;
pub use error::{ServiceError, ServiceResult};
pub use query::{DonationListing, Page, PageRequest, RequestListing, PAGE_SIZE};
pub use service::{BloodBankService, Counts, Dashboard, Stats};
pub use unit_of_work::UnitOfWork;

#[cfg(test)]
mod integration_tests;
