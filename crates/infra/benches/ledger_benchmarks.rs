use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bloodbank_core::{BloodGroup, Gender};
use bloodbank_donors::{DonationDetails, DonorDetails};
use bloodbank_infra::{BloodBankService, DatabaseConfig, PageRequest};
use bloodbank_inventory::{BloodInventory, LedgerEntry};
use chrono::{NaiveDate, Utc};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn seeded_service(rt: &Runtime, donors: usize) -> BloodBankService {
    rt.block_on(async {
        let svc = BloodBankService::open(&DatabaseConfig::in_memory()).await.unwrap();
        for i in 0..donors {
            svc.create_donor(DonorDetails {
                name: format!("Bench Donor {i}"),
                age: 35,
                gender: Gender::Other,
                blood_group: BloodGroup::ALL[i % BloodGroup::ALL.len()],
                phone: "5550001111".to_string(),
                email: format!("donor{i}@bench.test"),
                address: "1 Bench Street".to_string(),
                last_donation_date: None,
            })
            .await
            .unwrap();
        }
        svc
    })
}

/// Pure ledger arithmetic, no IO.
fn bench_ledger_apply(c: &mut Criterion) {
    let now = Utc::now();
    let row = BloodInventory {
        blood_group: BloodGroup::OPositive,
        total_units: 1_000,
        last_updated: now,
    };
    let credit = LedgerEntry::donation(BloodGroup::OPositive, 450);
    let debit = LedgerEntry::adjustment(BloodGroup::OPositive, -3);

    let mut group = c.benchmark_group("ledger_apply");
    group.bench_function("donation_credit", |b| {
        b.iter(|| black_box(credit.apply(Some(black_box(&row)), now)))
    });
    group.bench_function("manual_debit", |b| {
        b.iter(|| black_box(debit.apply(Some(black_box(&row)), now)))
    });
    group.finish();
}

/// Full command path: transaction, donor lookup, insert, ledger upsert, commit.
fn bench_record_donation(c: &mut Criterion) {
    let rt = runtime();
    let svc = seeded_service(&rt, 1);
    let donor_id = rt
        .block_on(svc.list_donors(None, PageRequest::default()))
        .unwrap()
        .items[0]
        .id;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let mut group = c.benchmark_group("record_donation");
    group.throughput(Throughput::Elements(1));
    group.bench_function("sqlite_memory", |b| {
        b.iter(|| {
            rt.block_on(svc.record_donation(DonationDetails {
                donor_id,
                donation_date: date,
                blood_volume_ml: 450,
                hospital: "Bench Hospital".to_string(),
            }))
            .unwrap()
        })
    });
    group.finish();
}

fn bench_list_donors(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("list_donors");

    for donors in [10usize, 100, 1_000] {
        let svc = seeded_service(&rt, donors);
        group.bench_with_input(BenchmarkId::new("search", donors), &donors, |b, _| {
            b.iter(|| {
                rt.block_on(svc.list_donors(Some(black_box("donor 9")), PageRequest::default()))
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ledger_apply,
    bench_record_donation,
    bench_list_donors
);
criterion_main!(benches);
