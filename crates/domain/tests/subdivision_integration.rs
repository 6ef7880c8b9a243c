//! Integration tests for license activation and usage metering.

use chrono::Duration;
use common::{SubdivisionId, TenantId};
use domain::{
    DomainError, DomainEvent, License, LicensePolicy, LicenseStatus, LicenseType, LicensingEvent,
    StatisticRow, Subdivision, WorkStatus,
};

fn subdivision_with_license(license_type: LicenseType, cap: u64) -> (Subdivision, License) {
    let mut subdivision = Subdivision::make("Warehouse", "Riga", TenantId::new());
    let license = subdivision
        .add_license("plan", "usage plan", license_type, cap, &LicensePolicy::default())
        .clone();
    (subdivision, license)
}

fn activation_of(subdivision: &Subdivision) -> chrono::DateTime<chrono::Utc> {
    subdivision
        .active_license()
        .and_then(License::activated)
        .expect("subdivision has an active license")
}

fn row(subdivision: &Subdivision, offset_ms: i64, count: u64) -> StatisticRow {
    StatisticRow::observed_at(
        activation_of(subdivision) + Duration::milliseconds(offset_ms),
        count,
        subdivision.id(),
    )
}

fn event_types(events: &[LicensingEvent]) -> Vec<&'static str> {
    events.iter().map(DomainEvent::event_type).collect()
}

mod factories {
    use super::*;

    #[test]
    fn license_make_is_always_inactive() {
        for (license_type, cap) in [(LicenseType::ByCount, 0), (LicenseType::ByTime, 500)] {
            let license = License::make("l", "", license_type, SubdivisionId::new(), cap);
            assert_eq!(license.status(), LicenseStatus::Inactive);
        }
    }

    #[test]
    fn subdivision_make_is_inactive_and_empty() {
        let subdivision = Subdivision::make("s", "l", TenantId::new());
        assert_eq!(subdivision.work_status(), WorkStatus::Inactive);
        assert!(subdivision.licenses().is_empty());
        assert!(subdivision.statistics().is_empty());
    }

    #[test]
    fn make_from_persistence_keeps_work_status() {
        let (source, _) = subdivision_with_license(LicenseType::ByCount, 10);
        let restored = Subdivision::make_from_persistence(
            source.id(),
            source.name().to_owned(),
            source.location().to_owned(),
            source.tenant_id(),
            WorkStatus::Active,
            None,
            source.licenses().to_vec(),
            Vec::new(),
        );

        // Restored as active even though no license is active.
        assert!(restored.is_active());
        assert!(restored.active_license().is_none());
    }
}

mod metering {
    use super::*;

    #[test]
    fn single_row_over_cap_deactivates_everything() {
        let (mut subdivision, license) = subdivision_with_license(LicenseType::ByCount, 10);
        subdivision.activate_license(license.id()).unwrap();
        assert!(subdivision.is_active());

        let events = subdivision
            .save_day_statistic(row(&subdivision, 1, 15))
            .unwrap();

        assert!(!subdivision.license(license.id()).unwrap().is_active());
        assert!(!subdivision.is_active());
        assert_eq!(subdivision.statistics().len(), 1);
        assert_eq!(event_types(&events), vec!["LicenseDeactivated", "StatisticRowAdded"]);
    }

    #[test]
    fn rows_below_cap_keep_everything_active() {
        let (mut subdivision, license) = subdivision_with_license(LicenseType::ByCount, 10);
        subdivision.activate_license(license.id()).unwrap();

        let mut events = subdivision.save_day_statistic(row(&subdivision, 1, 5)).unwrap();
        events.extend(subdivision.save_day_statistic(row(&subdivision, 2, 4)).unwrap());

        assert_eq!(subdivision.statistics().len(), 2);
        assert!(subdivision.is_active());
        assert!(subdivision.license(license.id()).unwrap().is_active());
        assert_eq!(event_types(&events), vec!["StatisticRowAdded", "StatisticRowAdded"]);
    }

    #[test]
    fn cumulative_usage_reaching_cap_deactivates() {
        let (mut subdivision, license) = subdivision_with_license(LicenseType::ByCount, 10);
        subdivision.activate_license(license.id()).unwrap();

        subdivision.save_day_statistic(row(&subdivision, 1, 6)).unwrap();
        let events = subdivision.save_day_statistic(row(&subdivision, 2, 4)).unwrap();

        assert_eq!(event_types(&events), vec!["LicenseDeactivated", "StatisticRowAdded"]);
        assert!(!subdivision.is_active());
    }

    #[test]
    fn usage_before_activation_does_not_count() {
        let (mut subdivision, license) = subdivision_with_license(LicenseType::ByCount, 10);
        subdivision.activate_license(license.id()).unwrap();

        let earlier = StatisticRow::observed_at(
            activation_of(&subdivision) - Duration::seconds(10),
            9,
            subdivision.id(),
        );
        subdivision.save_day_statistic(earlier).unwrap();
        assert_eq!(subdivision.total_count_requests(), 0);

        let events = subdivision.save_day_statistic(row(&subdivision, 1, 9)).unwrap();
        assert_eq!(event_types(&events), vec!["StatisticRowAdded"]);
        assert_eq!(subdivision.total_count_requests(), 9);
    }

    #[test]
    fn reactivation_opens_a_new_window() {
        let (mut subdivision, license) = subdivision_with_license(LicenseType::ByCount, 10);
        subdivision.activate_license(license.id()).unwrap();
        subdivision.save_day_statistic(row(&subdivision, 1, 9)).unwrap();
        assert_eq!(subdivision.total_count_requests(), 9);
        subdivision.deactivate_license(license.id()).unwrap();

        // Let the recorded row fall behind the next activation stamp.
        std::thread::sleep(std::time::Duration::from_millis(10));
        let events = subdivision.activate_license(license.id()).unwrap();

        assert_eq!(event_types(&events), vec!["LicenseActivated"]);
        assert_eq!(subdivision.total_count_requests(), 0);
        assert!(subdivision.is_active());

        let events = subdivision.save_day_statistic(row(&subdivision, 1, 9)).unwrap();
        assert_eq!(event_types(&events), vec!["StatisticRowAdded"]);
    }

    #[test]
    fn duplicate_row_is_rejected() {
        let (mut subdivision, license) = subdivision_with_license(LicenseType::ByCount, 100);
        subdivision.activate_license(license.id()).unwrap();
        let row = row(&subdivision, 1, 1);

        subdivision.save_day_statistic(row.clone()).unwrap();

        assert_eq!(
            subdivision.save_day_statistic(row),
            Err(DomainError::StatisticAlreadyExists(subdivision.id()))
        );
        assert_eq!(subdivision.statistics().len(), 1);
    }

    #[test]
    fn inactive_subdivision_rejects_usage_regardless_of_license() {
        let (mut subdivision, license) = subdivision_with_license(LicenseType::ByCount, 10);
        subdivision.activate_license(license.id()).unwrap();
        subdivision.deactivate();

        let row = row(&subdivision, 1, 1);
        assert_eq!(
            subdivision.save_day_statistic(row),
            Err(DomainError::SubdivisionInactive(subdivision.id()))
        );
    }

    #[test]
    fn active_subdivision_without_license_rejects_usage() {
        let (mut subdivision, _) = subdivision_with_license(LicenseType::ByCount, 10);
        subdivision.update("Warehouse", "Riga", None, WorkStatus::Active);

        let row = StatisticRow::make(1, subdivision.id());
        assert_eq!(
            subdivision.save_day_statistic(row),
            Err(DomainError::LicenseInactive(subdivision.id()))
        );
    }

    #[test]
    fn time_license_is_also_stopped_by_request_cap() {
        let (mut subdivision, license) = subdivision_with_license(LicenseType::ByTime, 10);
        subdivision.activate_license(license.id()).unwrap();

        let events = subdivision
            .save_day_statistic(row(&subdivision, 1, 15))
            .unwrap();

        assert_eq!(
            event_types(&events),
            vec!["LicenseDeactivated", "StatisticRowAdded"]
        );
        assert!(!subdivision.is_active());
        assert_eq!(subdivision.work_status(), WorkStatus::Inactive);
        assert_eq!(subdivision.licenses()[0].status(), LicenseStatus::Inactive);
    }
}

mod single_active_license {
    use super::*;

    #[test]
    fn activating_second_license_deactivates_first() {
        let (mut subdivision, first) = subdivision_with_license(LicenseType::ByCount, 10);
        let second = subdivision
            .add_license("backup", "", LicenseType::ByCount, 20, &LicensePolicy::default())
            .id();

        subdivision.activate_license(first.id()).unwrap();
        let events = subdivision.activate_license(second).unwrap();

        assert_eq!(event_types(&events), vec!["LicenseDeactivated", "LicenseActivated"]);
        assert_eq!(
            subdivision.licenses().iter().filter(|l| l.is_active()).count(),
            1
        );
        assert_eq!(subdivision.active_license().map(License::id), Some(second));
    }
}
