//! Service-level tests against in-memory and temp-file SQLite stores.
//!
//! Verifies:
//! - Donations credit the ledger with whole units only
//! - Rejected commands leave stored state untouched
//! - Deletes are blocked by dependent rows
//! - Concurrent ledger postings do not lose updates
//! - Listings page, filter and order newest first

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use bloodbank_core::{
        BloodGroup, BloodRequestId, DomainError, DonationId, DonorId, Gender, RecipientId,
    };
    use bloodbank_donors::{DonationDetails, Donor, DonorDetails};
    use bloodbank_recipients::{NewBloodRequest, RecipientDetails, RequestStatus};

    use crate::db::DatabaseConfig;
    use crate::error::ServiceError;
    use crate::query::PageRequest;
    use crate::service::BloodBankService;

    async fn service() -> BloodBankService {
        BloodBankService::open(&DatabaseConfig::in_memory())
            .await
            .expect("in-memory store")
    }

    fn donor_details(name: &str, blood_group: BloodGroup) -> DonorDetails {
        DonorDetails {
            name: name.to_string(),
            age: 30,
            gender: Gender::Female,
            blood_group,
            phone: "5551234567".to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            address: "12 Harbour Road".to_string(),
            last_donation_date: None,
        }
    }

    fn recipient_details(name: &str) -> RecipientDetails {
        RecipientDetails {
            name: name.to_string(),
            age: 52,
            gender: Gender::Male,
            blood_group: BloodGroup::ONegative,
            phone: "5559876543".to_string(),
            email: "ward7@example.com".to_string(),
            address: "City Hospital, Ward 7".to_string(),
            request_status: RequestStatus::Pending,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn donation(donor_id: DonorId, volume_ml: i32, day: u32) -> DonationDetails {
        DonationDetails {
            donor_id,
            donation_date: date(day),
            blood_volume_ml: volume_ml,
            hospital: "General Hospital".to_string(),
        }
    }

    async fn donor(svc: &BloodBankService, name: &str, group: BloodGroup) -> Donor {
        svc.create_donor(donor_details(name, group)).await.unwrap()
    }

    fn validation_field(err: &ServiceError) -> Option<&str> {
        match err.domain() {
            Some(e @ DomainError::Validation { .. }) => e.field(),
            _ => None,
        }
    }

    #[tokio::test]
    async fn donation_credits_whole_units_of_donor_group() {
        let svc = service().await;
        let d = donor(&svc, "Ana Silva", BloodGroup::OPositive).await;

        svc.record_donation(donation(d.id, 500, 1)).await.unwrap();
        svc.record_donation(donation(d.id, 500, 2)).await.unwrap();

        assert_eq!(svc.inventory_units(BloodGroup::OPositive).await.unwrap(), 2);
        assert_eq!(svc.inventory_units(BloodGroup::ONegative).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sub_unit_donation_credits_nothing() {
        let svc = service().await;
        let d = donor(&svc, "Ben Okafor", BloodGroup::APositive).await;

        svc.record_donation(donation(d.id, 449, 1)).await.unwrap();
        assert_eq!(svc.inventory_units(BloodGroup::APositive).await.unwrap(), 0);

        svc.record_donation(donation(d.id, 450, 2)).await.unwrap();
        assert_eq!(svc.inventory_units(BloodGroup::APositive).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn donation_stamps_last_donation_date() {
        let svc = service().await;
        let d = donor(&svc, "Chen Wei", BloodGroup::BPositive).await;

        svc.record_donation(donation(d.id, 450, 9)).await.unwrap();
        svc.record_donation(donation(d.id, 450, 4)).await.unwrap();

        let stored = svc.get_donor(d.id).await.unwrap();
        assert_eq!(stored.last_donation_date, Some(date(4)));
    }

    #[tokio::test]
    async fn donation_out_of_range_is_rejected_without_writes() {
        let svc = service().await;
        let d = donor(&svc, "Dana Cruz", BloodGroup::AbNegative).await;

        let err = svc.record_donation(donation(d.id, 600, 1)).await.unwrap_err();
        assert_eq!(validation_field(&err), Some("blood_volume_ml"));

        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.counts.total_donations, 0);
        assert_eq!(svc.get_donor(d.id).await.unwrap().last_donation_date, None);
    }

    #[tokio::test]
    async fn donation_for_unknown_donor_is_not_found() {
        let svc = service().await;

        let err = svc
            .record_donation(donation(DonorId::new(), 450, 1))
            .await
            .unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::NotFound { .. })));
        assert!(svc.inventory_rows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn negative_adjustment_beyond_stock_leaves_total_unchanged() {
        let svc = service().await;
        svc.adjust_inventory(BloodGroup::BNegative, 3).await.unwrap();

        let err = svc
            .adjust_inventory(BloodGroup::BNegative, -4)
            .await
            .unwrap_err();
        assert_eq!(validation_field(&err), Some("delta_units"));
        assert_eq!(svc.inventory_units(BloodGroup::BNegative).await.unwrap(), 3);

        let row = svc.adjust_inventory(BloodGroup::BNegative, -3).await.unwrap();
        assert_eq!(row.total_units, 0);
    }

    #[tokio::test]
    async fn negative_adjustment_of_unstocked_group_fails() {
        let svc = service().await;

        let err = svc.adjust_inventory(BloodGroup::ANegative, -1).await;
        assert!(err.is_err());
        assert!(svc.inventory_rows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_adjustment_creates_empty_row() {
        let svc = service().await;
        let row = svc.adjust_inventory(BloodGroup::AbPositive, 0).await.unwrap();
        assert_eq!(row.total_units, 0);
        assert_eq!(svc.inventory_rows().await.unwrap().len(), 1);
    }

    /// File-backed store with several pooled connections, so concurrent
    /// commands really race for the SQLite write lock.
    async fn shared_file_service(dir: &TempDir) -> BloodBankService {
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", dir.path().join("bank.db").display()),
            max_connections: 4,
        };
        BloodBankService::open(&config).await.expect("file store")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adjustments_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let svc = Arc::new(shared_file_service(&dir).await);
        svc.adjust_inventory(BloodGroup::OPositive, 1).await.unwrap();

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { svc.adjust_inventory(BloodGroup::OPositive, 1).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(svc.inventory_units(BloodGroup::OPositive).await.unwrap(), 26);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_donations_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let svc = Arc::new(shared_file_service(&dir).await);
        let d = donor(&svc, "Eve Adams", BloodGroup::ONegative).await;

        let handles: Vec<_> = (1..=10)
            .map(|day| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { svc.record_donation(donation(d.id, 450, day)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(svc.inventory_units(BloodGroup::ONegative).await.unwrap(), 10);
        let page = svc.list_donations(None, PageRequest::new(Some(1))).await.unwrap();
        assert_eq!(page.total, 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn mixed_postings_and_reads_apply_every_delta() {
        let dir = TempDir::new().unwrap();
        let svc = Arc::new(shared_file_service(&dir).await);
        let donor_id = donor(&svc, "Gil Moreno", BloodGroup::BNegative).await.id;

        let mut handles = Vec::new();
        for day in 1..=8 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                svc.record_donation(donation(donor_id, 900, day)).await.map(|_| ())
            }));
        }
        for _ in 0..8 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                svc.adjust_inventory(BloodGroup::BNegative, 3).await.map(|_| ())
            }));
        }
        for _ in 0..8 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                let snapshot = svc.inventory_snapshot().await?;
                assert!(snapshot.units(BloodGroup::BNegative) >= 0);
                Ok::<(), ServiceError>(())
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // 8 donations of 2 units plus 8 adjustments of 3 units.
        let snapshot = svc.inventory_snapshot().await.unwrap();
        assert_eq!(snapshot.units(BloodGroup::BNegative), 40);
        assert_eq!(snapshot.total_units(), 40);
    }

    #[tokio::test]
    async fn unknown_ids_name_their_entity() {
        let svc = service().await;

        let err = svc.get_donor(DonorId::new()).await.unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::NotFound { entity: "donor", .. })));

        let err = svc.get_recipient(RecipientId::new()).await.unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::NotFound { entity: "recipient", .. })));

        let err = svc.delete_donation(DonationId::new()).await.unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::NotFound { entity: "donation", .. })));

        let err = svc.set_request_status(BloodRequestId::new(), "Approved").await.unwrap_err();
        assert!(matches!(
            err.domain(),
            Some(DomainError::NotFound { entity: "blood request", .. })
        ));
    }

    #[tokio::test]
    async fn donor_with_donations_cannot_be_deleted() {
        let svc = service().await;
        let d = donor(&svc, "Farah Khan", BloodGroup::APositive).await;
        svc.record_donation(donation(d.id, 450, 1)).await.unwrap();

        let err = svc.delete_donor(d.id).await.unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::Conflict(_))));
        assert!(err.to_string().contains("has dependent donations"));
        assert!(svc.get_donor(d.id).await.is_ok());
    }

    #[tokio::test]
    async fn donor_without_donations_is_deleted() {
        let svc = service().await;
        let d = donor(&svc, "Gus Lind", BloodGroup::BPositive).await;

        svc.delete_donor(d.id).await.unwrap();

        let page = svc.list_donors(None, PageRequest::default()).await.unwrap();
        assert!(page.items.is_empty());
        let err = svc.delete_donor(d.id).await.unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn deleting_a_donation_keeps_credited_units() {
        let svc = service().await;
        let d = donor(&svc, "Hana Sato", BloodGroup::AbPositive).await;
        let gift = svc.record_donation(donation(d.id, 450, 1)).await.unwrap();

        svc.delete_donation(gift.id).await.unwrap();

        assert_eq!(svc.inventory_units(BloodGroup::AbPositive).await.unwrap(), 1);
        svc.delete_donor(d.id).await.unwrap();
    }

    #[tokio::test]
    async fn updating_a_donation_to_unknown_donor_is_rejected() {
        let svc = service().await;
        let d = donor(&svc, "Ivan Petrov", BloodGroup::OPositive).await;
        let gift = svc.record_donation(donation(d.id, 450, 1)).await.unwrap();

        let err = svc
            .update_donation(gift.id, donation(DonorId::new(), 450, 1))
            .await
            .unwrap_err();
        assert_eq!(validation_field(&err), Some("donor_id"));
        assert_eq!(svc.get_donation(gift.id).await.unwrap(), gift);
    }

    #[tokio::test]
    async fn recipient_with_requests_cannot_be_deleted() {
        let svc = service().await;
        let r = svc.create_recipient(recipient_details("Jon Bell")).await.unwrap();
        let request = svc
            .create_request(NewBloodRequest {
                recipient_id: r.id,
                blood_group: BloodGroup::ONegative,
                quantity_needed_ml: 900,
            })
            .await
            .unwrap();

        let err = svc.delete_recipient(r.id).await.unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::Conflict(_))));

        svc.delete_request(request.id).await.unwrap();
        svc.delete_recipient(r.id).await.unwrap();
    }

    #[tokio::test]
    async fn request_for_unknown_recipient_is_rejected() {
        let svc = service().await;
        let err = svc
            .create_request(NewBloodRequest {
                recipient_id: RecipientId::new(),
                blood_group: BloodGroup::APositive,
                quantity_needed_ml: 450,
            })
            .await
            .unwrap_err();
        assert_eq!(validation_field(&err), Some("recipient_id"));
    }

    #[tokio::test]
    async fn request_status_changes_do_not_touch_inventory() {
        let svc = service().await;
        svc.adjust_inventory(BloodGroup::ONegative, 4).await.unwrap();
        let r = svc.create_recipient(recipient_details("Kai Moss")).await.unwrap();
        let request = svc
            .create_request(NewBloodRequest {
                recipient_id: r.id,
                blood_group: BloodGroup::ONegative,
                quantity_needed_ml: 900,
            })
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);

        let done = svc.set_request_status(request.id, "Completed").await.unwrap();
        assert_eq!(done.status, RequestStatus::Completed);
        assert_eq!(svc.get_request(request.id).await.unwrap().status, RequestStatus::Completed);
        assert_eq!(svc.inventory_units(BloodGroup::ONegative).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn unknown_request_status_is_rejected() {
        let svc = service().await;
        let r = svc.create_recipient(recipient_details("Lia Frost")).await.unwrap();
        let request = svc
            .create_request(NewBloodRequest {
                recipient_id: r.id,
                blood_group: BloodGroup::BPositive,
                quantity_needed_ml: 450,
            })
            .await
            .unwrap();

        let err = svc.set_request_status(request.id, "Shipped").await.unwrap_err();
        assert_eq!(validation_field(&err), Some("status"));
        assert_eq!(svc.get_request(request.id).await.unwrap().status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn listings_page_newest_first() {
        let svc = service().await;
        for i in 0..12 {
            donor(&svc, &format!("Donor {i:02}"), BloodGroup::APositive).await;
        }

        let first = svc.list_donors(None, PageRequest::new(Some(1))).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 12);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items[0].name, "Donor 11");

        let second = svc.list_donors(None, PageRequest::new(Some(2))).await.unwrap();
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.items[1].name, "Donor 00");

        let beyond = svc.list_donors(None, PageRequest::new(Some(100))).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 12);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let svc = service().await;
        donor(&svc, "Maria Lopez", BloodGroup::AbNegative).await;
        donor(&svc, "Noah Brown", BloodGroup::OPositive).await;

        let hits = svc.list_donors(Some("LOPEZ"), PageRequest::default()).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].name, "Maria Lopez");

        let by_group = svc.list_donors(Some("ab-"), PageRequest::default()).await.unwrap();
        assert_eq!(by_group.total, 1);

        let none = svc.list_donors(Some("zzz"), PageRequest::default()).await.unwrap();
        assert!(none.items.is_empty());
        assert_eq!(none.total, 0);

        let wildcard = svc.list_donors(Some("%"), PageRequest::default()).await.unwrap();
        assert_eq!(wildcard.total, 0);
    }

    #[tokio::test]
    async fn donation_listing_joins_donor() {
        let svc = service().await;
        let d = donor(&svc, "Olga Ivanova", BloodGroup::BNegative).await;
        svc.record_donation(donation(d.id, 450, 1)).await.unwrap();

        let page = svc.list_donations(Some("olga"), PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].donor_name, "Olga Ivanova");
        assert_eq!(page.items[0].donor_blood_group, BloodGroup::BNegative);
    }

    #[tokio::test]
    async fn request_listing_filters_by_exact_status() {
        let svc = service().await;
        let r = svc.create_recipient(recipient_details("Pia Holm")).await.unwrap();
        for _ in 0..3 {
            svc.create_request(NewBloodRequest {
                recipient_id: r.id,
                blood_group: BloodGroup::APositive,
                quantity_needed_ml: 450,
            })
            .await
            .unwrap();
        }
        let all = svc.list_requests(None, PageRequest::default()).await.unwrap();
        svc.set_request_status(all.items[0].request.id, "Approved")
            .await
            .unwrap();

        let approved = svc
            .list_requests(Some("Approved"), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(approved.total, 1);
        assert_eq!(approved.items[0].recipient_name, "Pia Holm");

        let partial = svc.list_requests(Some("Pend"), PageRequest::default()).await.unwrap();
        assert_eq!(partial.total, 0);
    }

    #[tokio::test]
    async fn stats_and_dashboard_summarise_the_store() {
        let svc = service().await;
        let d = donor(&svc, "Quinn Park", BloodGroup::OPositive).await;
        for day in 1..=6 {
            svc.record_donation(donation(d.id, 450, day)).await.unwrap();
        }
        svc.create_recipient(recipient_details("Rosa Diaz")).await.unwrap();

        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.counts.total_donors, 1);
        assert_eq!(stats.counts.total_recipients, 1);
        assert_eq!(stats.counts.total_donations, 6);
        assert_eq!(stats.counts.total_requests, 0);
        assert_eq!(stats.blood_inventory.iter().count(), 8);
        assert_eq!(stats.blood_inventory.units(BloodGroup::OPositive), 6);

        let dashboard = svc.dashboard().await.unwrap();
        assert_eq!(dashboard.recent_donations.len(), 5);
        assert_eq!(dashboard.recent_donations[0].donation.donation_date, date(6));
        assert_eq!(dashboard.inventory.len(), 1);
    }
}
