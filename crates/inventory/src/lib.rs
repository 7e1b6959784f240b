//! Inventory Ledger domain module.
//!
//! Keeps `total_units` per blood group as the running sum of unit credits
//! from donations and manual adjustments. Pure decision logic; persistence
//! lives in `bloodbank-infra`.

pub mod ledger;
pub mod snapshot;

pub use ledger::{units_for_volume, BloodInventory, LedgerEntry, UNIT_VOLUME_ML};
pub use snapshot::InventorySnapshot;
