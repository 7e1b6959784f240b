use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bloodbank_core::BloodGroup;

use crate::ledger::BloodInventory;

/// Current stock per blood group, covering all eight groups.
///
/// Groups that have never been credited or adjusted report 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventorySnapshot(BTreeMap<BloodGroup, i64>);

impl InventorySnapshot {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a BloodInventory>) -> Self {
        let mut units: BTreeMap<BloodGroup, i64> =
            BloodGroup::ALL.into_iter().map(|g| (g, 0)).collect();
        for row in rows {
            units.insert(row.blood_group, row.total_units);
        }
        Self(units)
    }

    pub fn units(&self, blood_group: BloodGroup) -> i64 {
        self.0.get(&blood_group).copied().unwrap_or(0)
    }

    pub fn total_units(&self) -> i64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BloodGroup, i64)> + '_ {
        self.0.iter().map(|(g, u)| (*g, *u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn missing_groups_report_zero() {
        let rows = vec![BloodInventory {
            blood_group: BloodGroup::OPositive,
            total_units: 2,
            last_updated: Utc::now(),
        }];
        let snapshot = InventorySnapshot::from_rows(&rows);

        assert_eq!(snapshot.iter().count(), 8);
        assert_eq!(snapshot.units(BloodGroup::OPositive), 2);
        assert_eq!(snapshot.units(BloodGroup::ONegative), 0);
        assert_eq!(snapshot.total_units(), 2);
    }

    #[test]
    fn serializes_as_label_map() {
        let snapshot = InventorySnapshot::from_rows(&[]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["AB-"], 0);
        assert_eq!(json.as_object().unwrap().len(), 8);
    }
}
