//! Benchmarks for the booking engines
//!
//! Run with: cargo bench --package ubud-services
//!
//! Measures the pure engines and report assembly; no database involved.

use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use std::collections::HashMap;
use ubud_core::models::{
    Booking, BookingContext, BookingStatus, DiscountType, Promo, Reservation,
};
use ubud_services::reports::{booking_rows, build_csv, summarize, ReportKind};
use ubud_services::{day_status_for_month, evaluate_promo, is_range_available};
use uuid::Uuid;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Back-to-back stays of 3 nights, every fifth one cancelled
fn create_reservations(count: i64) -> Vec<Reservation> {
    (0..count)
        .map(|i| {
            let check_in = base_date() + Duration::days(i * 3);
            let status = match i % 5 {
                0 => BookingStatus::Cancelled,
                1 | 2 => BookingStatus::Pending,
                _ => BookingStatus::Confirmed,
            };
            Reservation::new(check_in, check_in + Duration::days(3), status)
        })
        .collect()
}

fn create_booking(i: i64, villa_id: Uuid) -> Booking {
    let check_in = base_date() + Duration::days(i % 300);
    let now = Utc::now();
    Booking {
        id: Uuid::new_v4(),
        villa_id,
        guest_name: format!("Guest \"{}\", Ubud", i),
        guest_email: format!("guest{}@example.com", i),
        guest_phone: if i % 2 == 0 { Some("+62 812 0000 0000".to_string()) } else { None },
        check_in,
        check_out: check_in + Duration::days(3),
        total_guests: 2,
        total_price: Decimal::new(3_000_000 + i, 0),
        status: BookingStatus::Confirmed,
        special_requests: None,
        promo_code: None,
        created_at: now,
        updated_at: now,
    }
}

fn create_promo() -> Promo {
    Promo {
        code: "UBUD10".to_string(),
        discount_type: DiscountType::Percentage,
        discount_value: Decimal::new(10, 0),
        min_stay_nights: 2,
        max_discount_amount: Some(Decimal::new(500_000, 0)),
        usage_limit: Some(100),
        used_count: 42,
        valid_from: base_date(),
        valid_until: Some(base_date() + Duration::days(365)),
        is_active: true,
        ..Default::default()
    }
}

fn bench_range_availability(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_range_available");

    for size in [10, 100, 1_000].iter() {
        let reservations = create_reservations(*size);
        // Lands after every reservation, so all are scanned
        let check_in = base_date() + Duration::days(size * 3);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                is_range_available(
                    black_box(&reservations),
                    check_in,
                    check_in + Duration::days(7),
                )
            });
        });
    }

    group.finish();
}

fn bench_month_calendar(c: &mut Criterion) {
    let mut group = c.benchmark_group("day_status_for_month");

    for size in [10, 100, 1_000].iter() {
        let reservations = create_reservations(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| day_status_for_month(black_box(&reservations), 2024, 2, base_date()));
        });
    }

    group.finish();
}

fn bench_promo_evaluation(c: &mut Criterion) {
    let promo = create_promo();
    let ctx = BookingContext::new(3, Decimal::new(3_000_000, 0)).for_villa(Uuid::new_v4());
    let today = base_date() + Duration::days(150);

    c.bench_function("evaluate_promo", |b| {
        b.iter(|| evaluate_promo(black_box(&promo), black_box(&ctx), today));
    });
}

fn bench_report_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_assembly");

    for size in [100, 1_000, 10_000].iter() {
        let villas: Vec<Uuid> = (0..20).map(|_| Uuid::new_v4()).collect();
        let names: HashMap<Uuid, String> = villas
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, format!("Villa {}", i)))
            .collect();
        let bookings: Vec<Booking> = (0..*size)
            .map(|i| create_booking(i, villas[(i % 20) as usize]))
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("bookings_csv", size), size, |b, _| {
            b.iter(|| {
                let rows = booking_rows(black_box(&bookings), &names);
                build_csv(ReportKind::Bookings.headers(), &rows)
            });
        });
        group.bench_with_input(BenchmarkId::new("summarize", size), size, |b, _| {
            b.iter(|| summarize(black_box(&bookings), &names, 20, 5));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_range_availability,
    bench_month_calendar,
    bench_promo_evaluation,
    bench_report_assembly,
);

criterion_main!(benches);
