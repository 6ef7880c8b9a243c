//! End-to-end dispatch of licensing commands through the message bus.

use std::sync::Arc;

use chrono::Utc;
use common::{SubdivisionId, TenantId, UserId};
use domain::{
    ActivateSubdivisionLicense, AddStatisticRow, CreateLicense, CreateSubdivision, CreateTenant,
    CreateUser, DeleteTenant, LicenseStatus, LicenseType, LicensePolicy, LicensingCommand,
    WorkStatus,
};
use licensing::{
    Collaborators, ErrorKind, InMemoryPublisher, InMemoryUserDirectory, Licensing,
    PublisherConfig, UserContacts, bootstrap,
};
use messagebus::{Bootstrap, MessageBus};
use projections::{ActiveLicensesView, ProjectionProcessor, SubdivisionUsageView};
use storage::InMemoryStore;

struct Harness {
    bootstrap: Bootstrap<Licensing>,
    store: InMemoryStore,
    publisher: InMemoryPublisher,
    directory: InMemoryUserDirectory,
    active: ActiveLicensesView,
    usage: SubdivisionUsageView,
}

impl Harness {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let publisher = InMemoryPublisher::new();
        let directory = InMemoryUserDirectory::new();
        let active = ActiveLicensesView::new();
        let usage = SubdivisionUsageView::new();
        let processor = ProjectionProcessor::new()
            .with(active.clone())
            .with(usage.clone());

        let collaborators = Collaborators {
            unit_of_work: Arc::new(store.clone()),
            publisher: Arc::new(publisher.clone()),
            user_directory: Arc::new(directory.clone()),
            projections: Arc::new(processor),
            policy: LicensePolicy::default(),
            publisher_config: PublisherConfig {
                topic: "licensing-test".to_string(),
            },
        };

        Self {
            bootstrap: bootstrap(collaborators.into_dependencies()),
            store,
            publisher,
            directory,
            active,
            usage,
        }
    }

    fn bus(&self) -> MessageBus<Licensing> {
        self.bootstrap.messagebus().unwrap()
    }

    async fn dispatch(
        &self,
        command: impl Into<LicensingCommand>,
    ) -> Result<licensing::CommandOutput, licensing::LicensingError> {
        self.bus().dispatch(command.into()).await
    }

    async fn tenant(&self) -> TenantId {
        self.dispatch(CreateTenant {
            user_id: UserId::new(),
            name: "Acme".to_string(),
            address: "Main st 1".to_string(),
            email: "ops@acme.io".to_string(),
            phone: "555".to_string(),
        })
        .await
        .unwrap()
        .into_tenant()
        .unwrap()
        .id()
    }

    /// Tenant, subdivision and an active BY_COUNT license with cap `cap`.
    async fn metered_subdivision(&self, cap: u64) -> SubdivisionId {
        let tenant_id = self.tenant().await;
        let subdivision_id = self
            .dispatch(CreateSubdivision::new("North", "Oslo", tenant_id))
            .await
            .unwrap()
            .into_subdivision()
            .unwrap()
            .id();
        let license_id = self
            .dispatch(CreateLicense::new(
                subdivision_id,
                "pro",
                LicenseType::ByCount,
                cap,
            ))
            .await
            .unwrap()
            .into_license()
            .unwrap()
            .id();
        let subdivision = self
            .dispatch(ActivateSubdivisionLicense {
                subdivision_id,
                license_id,
            })
            .await
            .unwrap()
            .into_subdivision()
            .unwrap();
        assert_eq!(subdivision.work_status(), WorkStatus::Active);
        subdivision_id
    }
}

#[tokio::test]
async fn exhausting_submission_stops_subdivision() {
    let harness = Harness::new();
    let subdivision_id = harness.metered_subdivision(10).await;
    let published_before = harness.publisher.len().await;

    let subdivision = harness
        .dispatch(AddStatisticRow::now(subdivision_id, 15))
        .await
        .unwrap()
        .into_subdivision()
        .unwrap();

    assert_eq!(subdivision.work_status(), WorkStatus::Inactive);
    assert_eq!(subdivision.statistics().len(), 1);
    assert_eq!(subdivision.licenses()[0].status(), LicenseStatus::Inactive);

    let published = harness.publisher.event_types().await;
    assert_eq!(
        &published[published_before..],
        &[
            "LicenseDeactivated",
            "StatisticRowAdded",
            "SubdivisionLicenseExpired"
        ]
    );
    assert!(harness.active.get(subdivision_id).await.is_none());

    let usage = harness.usage.get(subdivision_id).await.unwrap();
    assert_eq!(usage.total_requests, 15);
    assert_eq!(usage.exhaustions, 1);
}

#[tokio::test]
async fn submissions_below_cap_keep_subdivision_running() {
    let harness = Harness::new();
    let subdivision_id = harness.metered_subdivision(10).await;
    let published_before = harness.publisher.len().await;

    for count in [5, 4] {
        harness
            .dispatch(AddStatisticRow::now(subdivision_id, count))
            .await
            .unwrap();
    }

    let stored = harness.store.subdivision(subdivision_id).await.unwrap();
    assert!(stored.is_active());
    assert_eq!(stored.total_count_requests(), 9);
    assert!(stored.statistics().iter().all(|row| row.id().is_some()));

    let published = harness.publisher.event_types().await;
    assert_eq!(
        &published[published_before..],
        &["StatisticRowAdded", "StatisticRowAdded"]
    );
    assert!(harness.active.get(subdivision_id).await.is_some());
}

#[tokio::test]
async fn duplicate_submission_is_rejected() {
    let harness = Harness::new();
    let subdivision_id = harness.metered_subdivision(100).await;
    let row = AddStatisticRow {
        subdivision_id,
        created: Utc::now(),
        count_requests: 7,
    };

    harness.dispatch(row.clone()).await.unwrap();
    let err = harness.dispatch(row).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    let stored = harness.store.subdivision(subdivision_id).await.unwrap();
    assert_eq!(stored.statistics().len(), 1);
}

#[tokio::test]
async fn submission_to_inactive_subdivision_is_rejected() {
    let harness = Harness::new();
    let tenant_id = harness.tenant().await;
    let subdivision_id = harness
        .dispatch(CreateSubdivision::new("North", "Oslo", tenant_id))
        .await
        .unwrap()
        .into_subdivision()
        .unwrap()
        .id();

    let err = harness
        .dispatch(AddStatisticRow::now(subdivision_id, 1))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.kind().status_code(), 422);
}

#[tokio::test]
async fn activating_second_license_retires_first() {
    let harness = Harness::new();
    let subdivision_id = harness.metered_subdivision(10).await;
    let second = harness
        .dispatch(CreateLicense::new(
            subdivision_id,
            "monthly",
            LicenseType::ByTime,
            0,
        ))
        .await
        .unwrap()
        .into_license()
        .unwrap();
    let published_before = harness.publisher.len().await;

    harness
        .dispatch(ActivateSubdivisionLicense {
            subdivision_id,
            license_id: second.id(),
        })
        .await
        .unwrap();

    let stored = harness.store.subdivision(subdivision_id).await.unwrap();
    let active: Vec<_> = stored.licenses().iter().filter(|l| l.is_active()).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id(), second.id());

    let published = harness.publisher.event_types().await;
    assert_eq!(
        &published[published_before..],
        &["LicenseDeactivated", "LicenseActivated"]
    );
    let summary = harness.active.get(subdivision_id).await.unwrap();
    assert_eq!(summary.license_id, second.id());
}

#[tokio::test]
async fn new_users_are_enriched_from_directory() {
    let harness = Harness::new();
    let user_id = UserId::new();
    harness
        .directory
        .insert(user_id, UserContacts::new("jane@acme.io", "4242"))
        .await;

    harness.dispatch(CreateUser { user_id }).await.unwrap();

    let user = harness.store.user(user_id).await.unwrap();
    assert_eq!(user.email(), Some("jane@acme.io"));
    assert_eq!(user.chat_id(), Some("4242"));
    assert_eq!(
        harness.publisher.event_types().await,
        vec!["UserCreated", "UserUpdated"]
    );
}

#[tokio::test]
async fn unknown_users_are_left_as_created() {
    let harness = Harness::new();
    let user_id = UserId::new();

    harness.dispatch(CreateUser { user_id }).await.unwrap();

    let user = harness.store.user(user_id).await.unwrap();
    assert!(user.email().is_none());
    assert_eq!(harness.publisher.event_types().await, vec!["UserCreated"]);
}

#[tokio::test]
async fn deleting_tenant_removes_its_subdivisions() {
    let harness = Harness::new();
    let subdivision_id = harness.metered_subdivision(10).await;
    let tenant_id = harness
        .store
        .subdivision(subdivision_id)
        .await
        .unwrap()
        .tenant_id();

    let tenant = harness
        .dispatch(DeleteTenant { id: tenant_id })
        .await
        .unwrap()
        .into_tenant()
        .unwrap();

    assert_eq!(tenant.subdivisions().len(), 1);
    assert!(harness.store.subdivision(subdivision_id).await.is_none());
    assert!(harness.active.for_tenant(tenant_id).await.is_empty());

    let err = harness
        .dispatch(DeleteTenant { id: tenant_id })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn publisher_failure_aborts_dispatch_after_commit() {
    let harness = Harness::new();
    let tenant_id = harness.tenant().await;
    harness.publisher.set_fail_on_publish(true).await;

    let err = harness
        .dispatch(CreateSubdivision::new("North", "Oslo", tenant_id))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    let tenant = harness.store.tenant(tenant_id).await.unwrap();
    assert_eq!(tenant.subdivisions().len(), 1);
}
