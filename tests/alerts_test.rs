mod common;

use chrono::NaiveDate;
use labcal::services::ServiceTrack;
use labcal::services::alerts::{AlertPriority, get_alert_summary, get_alerts};
use labcal::services::due::DueStatus;

use common::{MachineSeed, date, insert_calibration_org, insert_machine, setup_db};

fn today() -> NaiveDate {
    date(2026, 8, 28)
}

#[tokio::test]
async fn alerts_partition_expired_and_expiring_and_skip_the_rest() {
    let db = setup_db().await;
    let org = insert_calibration_org(&db, "Metrology AG").await;

    // next due 2025-08-28: expired 365 days.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-EXP",
            last_calibration_date: Some(date(2024, 8, 28)),
            calibration_org_id: Some(org.id),
            ..Default::default()
        },
    )
    .await;
    // next due 2026-09-07: expiring in 10 days.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-SOON",
            last_calibration_date: Some(date(2025, 9, 7)),
            calibration_org_id: Some(org.id),
            ..Default::default()
        },
    )
    .await;
    // next due 2027-08-28: nothing to report.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-OK",
            last_calibration_date: Some(today()),
            ..Default::default()
        },
    )
    .await;
    // No calibration on record: flagged for review, never alerted.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-NEW",
            ..Default::default()
        },
    )
    .await;

    let summary = get_alerts(&db, ServiceTrack::Calibration, today())
        .await
        .unwrap();

    assert_eq!(summary.alerts.len(), 2);
    assert_eq!(summary.total_expired, 1);
    assert_eq!(summary.total_expiring_soon, 1);
    assert!(summary.has_alerts);

    let expired = &summary.alerts[0];
    assert_eq!(expired.serial_number, "SN-EXP");
    assert_eq!(expired.status, DueStatus::Expired);
    assert_eq!(expired.priority, AlertPriority::Critical);
    assert_eq!(expired.next_due, date(2025, 8, 28));
    assert_eq!(expired.days_overdue, Some(365));
    assert_eq!(expired.days_remaining, None);
    assert_eq!(expired.org_name.as_deref(), Some("Metrology AG"));
    assert!(expired.org_phone.is_some());

    let soon = &summary.alerts[1];
    assert_eq!(soon.serial_number, "SN-SOON");
    assert_eq!(soon.status, DueStatus::ExpiringSoon);
    assert_eq!(soon.days_remaining, Some(10));
    assert_eq!(soon.days_overdue, None);
}

#[tokio::test]
async fn alerts_sort_critical_by_overdue_then_warning_by_remaining() {
    let db = setup_db().await;

    // Overdue 365 days.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-A",
            last_calibration_date: Some(date(2024, 8, 28)),
            ..Default::default()
        },
    )
    .await;
    // Overdue 730 days.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-B",
            last_calibration_date: Some(date(2023, 8, 28)),
            ..Default::default()
        },
    )
    .await;
    // Due in 30 days, the warning-window boundary.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-C",
            last_calibration_date: Some(date(2025, 9, 27)),
            ..Default::default()
        },
    )
    .await;
    // Due in 2 days.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-D",
            last_calibration_date: Some(date(2025, 8, 30)),
            ..Default::default()
        },
    )
    .await;
    // Due in 31 days: one day past the window, no alert.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-E",
            last_calibration_date: Some(date(2025, 9, 28)),
            ..Default::default()
        },
    )
    .await;

    let summary = get_alerts(&db, ServiceTrack::Calibration, today())
        .await
        .unwrap();

    let order: Vec<_> = summary
        .alerts
        .iter()
        .map(|a| a.serial_number.as_str())
        .collect();
    assert_eq!(order, vec!["SN-B", "SN-A", "SN-D", "SN-C"]);
    assert_eq!(summary.alerts[3].days_remaining, Some(30));
}

#[tokio::test]
async fn maintenance_track_uses_its_own_dates() {
    let db = setup_db().await;

    // Calibration fine, maintenance overdue: only the maintenance track alerts.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-M",
            last_calibration_date: Some(today()),
            last_maintenance_date: Some(date(2024, 1, 1)),
            maintenance_interval: 2,
            ..Default::default()
        },
    )
    .await;

    let cal = get_alerts(&db, ServiceTrack::Calibration, today())
        .await
        .unwrap();
    assert!(cal.alerts.is_empty());
    assert!(!cal.has_alerts);

    let maint = get_alerts(&db, ServiceTrack::Maintenance, today())
        .await
        .unwrap();
    assert_eq!(maint.alerts.len(), 1);
    assert_eq!(maint.alerts[0].track, ServiceTrack::Maintenance);
    assert_eq!(maint.alerts[0].next_due, date(2026, 1, 1));
}

#[tokio::test]
async fn summary_counts_match_both_track_lists() {
    let db = setup_db().await;

    // One machine expired on both tracks, one expiring on calibration only.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-1",
            last_calibration_date: Some(date(2024, 8, 28)),
            last_maintenance_date: Some(date(2024, 8, 28)),
            ..Default::default()
        },
    )
    .await;
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-2",
            last_calibration_date: Some(date(2025, 9, 10)),
            last_maintenance_date: Some(today()),
            ..Default::default()
        },
    )
    .await;

    let counts = get_alert_summary(&db, today()).await.unwrap();
    assert_eq!(counts.total_expired, 2);
    assert_eq!(counts.total_expiring_soon, 1);
    assert!(counts.has_alerts);

    let cal = get_alerts(&db, ServiceTrack::Calibration, today())
        .await
        .unwrap();
    let maint = get_alerts(&db, ServiceTrack::Maintenance, today())
        .await
        .unwrap();
    assert_eq!(
        counts.total_expired,
        cal.total_expired + maint.total_expired
    );
    assert_eq!(
        counts.total_expiring_soon,
        cal.total_expiring_soon + maint.total_expiring_soon
    );
}

#[tokio::test]
async fn empty_inventory_yields_no_alerts() {
    let db = setup_db().await;

    let summary = get_alerts(&db, ServiceTrack::Calibration, today())
        .await
        .unwrap();
    assert!(summary.alerts.is_empty());
    assert!(!summary.has_alerts);

    let counts = get_alert_summary(&db, today()).await.unwrap();
    assert_eq!(counts.total_expired, 0);
    assert_eq!(counts.total_expiring_soon, 0);
    assert!(!counts.has_alerts);
}

#[tokio::test]
async fn out_of_range_interval_rows_are_skipped_not_fatal() {
    let db = setup_db().await;

    // Row inserted outside the API's validation gate, as a bad import would
    // be. It must neither panic the computation nor show up as expired.
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-BAD",
            last_calibration_date: Some(date(2020, 1, 1)),
            calibration_interval: 300_000,
            ..Default::default()
        },
    )
    .await;
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-EXP",
            last_calibration_date: Some(date(2024, 8, 28)),
            ..Default::default()
        },
    )
    .await;

    let summary = get_alerts(&db, ServiceTrack::Calibration, today())
        .await
        .unwrap();
    assert_eq!(summary.alerts.len(), 1);
    assert_eq!(summary.alerts[0].serial_number, "SN-EXP");

    let counts = get_alert_summary(&db, today()).await.unwrap();
    assert_eq!(counts.total_expired, 1);
    assert_eq!(counts.total_expiring_soon, 0);
}

#[tokio::test]
async fn repeated_alert_reads_are_identical() {
    let db = setup_db().await;
    insert_machine(
        &db,
        MachineSeed {
            serial: "SN-R",
            last_calibration_date: Some(date(2024, 8, 28)),
            ..Default::default()
        },
    )
    .await;

    let first = get_alerts(&db, ServiceTrack::Calibration, today())
        .await
        .unwrap();
    let second = get_alerts(&db, ServiceTrack::Calibration, today())
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}
