use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bloodbank_core::{BloodGroup, DomainError, DomainResult};

/// Reference volume of one accounting unit of blood.
pub const UNIT_VOLUME_ML: i32 = 450;

/// Whole units credited for a donation of `volume_ml`.
///
/// Integer division: any remainder below one unit is not credited
/// (449 ml -> 0, 450 ml -> 1, 899 ml -> 1, 900 ml -> 2).
pub fn units_for_volume(volume_ml: i32) -> i64 {
    i64::from(volume_ml.max(0)) / i64::from(UNIT_VOLUME_ML)
}

/// Stock row for one blood group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodInventory {
    pub blood_group: BloodGroup,
    pub total_units: i64,
    pub last_updated: DateTime<Utc>,
}

/// A change to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEntry {
    /// Credit from a recorded donation of the donor's blood group.
    DonationCredit {
        blood_group: BloodGroup,
        volume_ml: i32,
    },
    /// Operator correction; may be negative.
    ManualAdjustment {
        blood_group: BloodGroup,
        delta_units: i64,
    },
}

impl LedgerEntry {
    pub fn donation(blood_group: BloodGroup, volume_ml: i32) -> Self {
        Self::DonationCredit {
            blood_group,
            volume_ml,
        }
    }

    pub fn adjustment(blood_group: BloodGroup, delta_units: i64) -> Self {
        Self::ManualAdjustment {
            blood_group,
            delta_units,
        }
    }

    pub fn blood_group(&self) -> BloodGroup {
        match self {
            LedgerEntry::DonationCredit { blood_group, .. }
            | LedgerEntry::ManualAdjustment { blood_group, .. } => *blood_group,
        }
    }

    /// Signed change in units this entry applies.
    pub fn delta_units(&self) -> i64 {
        match self {
            LedgerEntry::DonationCredit { volume_ml, .. } => units_for_volume(*volume_ml),
            LedgerEntry::ManualAdjustment { delta_units, .. } => *delta_units,
        }
    }

    /// Decide the row that results from applying this entry to `current`.
    ///
    /// A missing row counts as zero stock and is created. Fails without
    /// side effects if the resulting total would be negative.
    pub fn apply(
        &self,
        current: Option<&BloodInventory>,
        now: DateTime<Utc>,
    ) -> DomainResult<BloodInventory> {
        let blood_group = self.blood_group();
        if let Some(row) = current {
            if row.blood_group != blood_group {
                return Err(DomainError::validation(
                    "blood_group",
                    format!("entry for {blood_group} applied to {} stock", row.blood_group),
                ));
            }
        }

        let on_hand = current.map(|row| row.total_units).unwrap_or(0);
        let delta = self.delta_units();
        let total_units = on_hand
            .checked_add(delta)
            .ok_or_else(|| DomainError::validation("delta_units", "adjustment overflows stock"))?;

        if total_units < 0 {
            return Err(DomainError::validation(
                "delta_units",
                format!(
                    "adjusting {blood_group} by {delta} would leave {total_units} units (on hand: {on_hand})"
                ),
            ));
        }

        Ok(BloodInventory {
            blood_group,
            total_units,
            last_updated: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn row(group: BloodGroup, units: i64) -> BloodInventory {
        BloodInventory {
            blood_group: group,
            total_units: units,
            last_updated: test_time(),
        }
    }

    #[test]
    fn unit_conversion_floors() {
        assert_eq!(units_for_volume(449), 0);
        assert_eq!(units_for_volume(450), 1);
        assert_eq!(units_for_volume(899), 1);
        assert_eq!(units_for_volume(900), 2);
        assert_eq!(units_for_volume(100), 0);
        assert_eq!(units_for_volume(500), 1);
    }

    #[test]
    fn first_credit_creates_row() {
        let entry = LedgerEntry::donation(BloodGroup::OPositive, 500);
        let next = entry.apply(None, test_time()).unwrap();
        assert_eq!(next.blood_group, BloodGroup::OPositive);
        assert_eq!(next.total_units, 1);
    }

    #[test]
    fn sub_unit_donation_creates_zero_row() {
        let next = LedgerEntry::donation(BloodGroup::ANegative, 449)
            .apply(None, test_time())
            .unwrap();
        assert_eq!(next.total_units, 0);
    }

    #[test]
    fn credit_adds_to_existing_row() {
        let current = row(BloodGroup::OPositive, 1);
        let next = LedgerEntry::donation(BloodGroup::OPositive, 500)
            .apply(Some(&current), test_time())
            .unwrap();
        assert_eq!(next.total_units, 2);
    }

    #[test]
    fn negative_adjustment_without_row_is_rejected() {
        let err = LedgerEntry::adjustment(BloodGroup::BPositive, -1)
            .apply(None, test_time())
            .unwrap_err();
        assert_eq!(err.field(), Some("delta_units"));
    }

    #[test]
    fn adjustment_below_zero_is_rejected() {
        let current = row(BloodGroup::BPositive, 3);
        assert!(LedgerEntry::adjustment(BloodGroup::BPositive, -4)
            .apply(Some(&current), test_time())
            .is_err());
        let drained = LedgerEntry::adjustment(BloodGroup::BPositive, -3)
            .apply(Some(&current), test_time())
            .unwrap();
        assert_eq!(drained.total_units, 0);
    }

    #[test]
    fn zero_adjustment_is_allowed() {
        let next = LedgerEntry::adjustment(BloodGroup::AbNegative, 0)
            .apply(None, test_time())
            .unwrap();
        assert_eq!(next.total_units, 0);
    }

    #[test]
    fn entry_for_other_group_is_rejected() {
        let current = row(BloodGroup::APositive, 3);
        let err = LedgerEntry::adjustment(BloodGroup::ONegative, 1)
            .apply(Some(&current), test_time())
            .unwrap_err();
        assert_eq!(err.field(), Some("blood_group"));
    }

    #[test]
    fn entries_serialize_with_kind_tag() {
        let json = serde_json::to_value(LedgerEntry::adjustment(BloodGroup::OPositive, -2)).unwrap();
        assert_eq!(json["kind"], "manual_adjustment");
        assert_eq!(json["blood_group"], "O+");
        assert_eq!(json["delta_units"], -2);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a donation credits exactly floor(v / 450) units.
        #[test]
        fn donation_credit_is_floor_of_volume(volume in 100i32..=500, on_hand in 0i64..10_000) {
            let current = row(BloodGroup::OPositive, on_hand);
            let next = LedgerEntry::donation(BloodGroup::OPositive, volume)
                .apply(Some(&current), test_time())
                .unwrap();
            prop_assert_eq!(next.total_units - on_hand, i64::from(volume / 450));
        }

        /// Property: replaying arbitrary adjustments never yields negative
        /// stock, and the total equals the sum of the accepted deltas.
        #[test]
        fn adjustments_never_drive_stock_negative(
            deltas in prop::collection::vec(-20i64..20i64, 1..50)
        ) {
            let mut current: Option<BloodInventory> = None;
            let mut accepted: i64 = 0;

            for delta in deltas {
                let entry = LedgerEntry::adjustment(BloodGroup::AbPositive, delta);
                match entry.apply(current.as_ref(), test_time()) {
                    Ok(next) => {
                        accepted += delta;
                        current = Some(next);
                    }
                    Err(_) => {
                        let on_hand = current.as_ref().map(|r| r.total_units).unwrap_or(0);
                        prop_assert!(on_hand + delta < 0);
                    }
                }
            }

            let total = current.map(|r| r.total_units).unwrap_or(0);
            prop_assert!(total >= 0);
            prop_assert_eq!(total, accepted);
        }
    }
}
