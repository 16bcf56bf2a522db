use bindzone::db::{init_memory_db, user_repo, zone_repo::SqliteZoneRepository};
use bindzone::error::AppError;
use bindzone::repository::ZoneRepository;
use bindzone::zone::{RecordKind, RecordTemplate, ZoneTemplate};

fn dc1() -> ZoneTemplate {
    ZoneTemplate::new("DC1", 3600)
        .with_record(RecordTemplate::new(RecordKind::Soa, "%ZONE%", "ns1.%ZONE% admin.%ZONE%"))
        .with_record(RecordTemplate::new(RecordKind::Ns, "%ZONE%", "ns1.%ZONE%"))
        .with_record(RecordTemplate::new(RecordKind::Ns, "%ZONE%", "ns2.%ZONE%"))
        .with_record(
            RecordTemplate::new(RecordKind::Mx, "%ZONE%", "mx.%ZONE%")
                .with_priority(10)
                .with_ttl(600),
        )
}

async fn repo() -> SqliteZoneRepository {
    SqliteZoneRepository::new(init_memory_db().await.unwrap())
}

#[tokio::test]
async fn template_round_trip_keeps_record_order() {
    let repo = repo().await;
    let id = repo.save_zone_template(&dc1()).await.unwrap();

    let stored = repo.find_zone_template_by_name("DC1").await.unwrap().unwrap();
    assert_eq!(stored.id, Some(id));
    assert_eq!(stored.ttl, Some(3600));
    assert_eq!(stored.user, None);
    assert_eq!(stored.record_templates, dc1().record_templates);

    let by_id = repo.find_zone_template_by_id(id).await.unwrap().unwrap();
    assert_eq!(by_id, stored);

    assert!(repo.find_zone_template_by_name("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_template_name_is_a_constraint_violation() {
    let repo = repo().await;
    repo.save_zone_template(&dc1()).await.unwrap();

    let err = repo.save_zone_template(&dc1()).await.unwrap_err();
    assert!(matches!(err, AppError::ConstraintViolation(_)), "{err:?}");

    // nothing from the failed insert is left behind
    let all = repo.list_zone_templates().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].record_templates.len(), 4);
}

#[tokio::test]
async fn update_replaces_record_templates() {
    let repo = repo().await;
    let id = repo.save_zone_template(&dc1()).await.unwrap();

    let mut template = repo.find_zone_template_by_id(id).await.unwrap().unwrap();
    template.ttl = Some(60);
    template.record_templates.truncate(1);
    assert_eq!(repo.save_zone_template(&template).await.unwrap(), id);

    let stored = repo.find_zone_template_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.ttl, Some(60));
    assert_eq!(stored.record_templates.len(), 1);

    let mut ghost = template.clone();
    ghost.id = Some(id + 100);
    ghost.name = "ghost".into();
    assert!(matches!(
        repo.save_zone_template(&ghost).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_cascades_to_record_templates() {
    let db = init_memory_db().await.unwrap();
    let repo = SqliteZoneRepository::new(db.clone());
    let id = repo.save_zone_template(&dc1()).await.unwrap();

    assert!(repo.delete_zone_template(id).await.unwrap());
    assert!(!repo.delete_zone_template(id).await.unwrap());

    let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM record_templates")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(left, 0);
}

#[tokio::test]
async fn list_groups_records_per_template() {
    let db = init_memory_db().await.unwrap();
    let repo = SqliteZoneRepository::new(db.clone());
    let owner = user_repo::insert(&db, "alice", false).await.unwrap();

    repo.save_zone_template(&dc1()).await.unwrap();
    repo.save_zone_template(
        &ZoneTemplate::new("alice-web", 300)
            .owned_by(owner)
            .with_record(RecordTemplate::new(RecordKind::A, "www.%ZONE%", "192.0.2.1")),
    )
    .await
    .unwrap();
    repo.save_zone_template(&ZoneTemplate::new("bare", 300)).await.unwrap();

    let all = repo.list_zone_templates().await.unwrap();
    let summary: Vec<(&str, usize, Option<i64>)> = all
        .iter()
        .map(|t| (t.name.as_str(), t.record_templates.len(), t.user))
        .collect();
    assert_eq!(
        summary,
        [("DC1", 4, None), ("alice-web", 1, Some(owner)), ("bare", 0, None)]
    );
}

#[tokio::test]
async fn unknown_owner_is_a_constraint_violation() {
    let repo = repo().await;
    let err = repo
        .save_zone_template(&ZoneTemplate::new("orphan", 60).owned_by(42))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConstraintViolation(_)), "{err:?}");
}

#[tokio::test]
async fn domain_round_trip() {
    let repo = repo().await;
    let domain = dc1().build("example.org", None).unwrap();

    let id = repo.save_domain(&domain).await.unwrap();
    let stored = repo.find_domain_by_name("example.org").await.unwrap().unwrap();

    assert_eq!(stored.id, Some(id));
    assert_eq!(stored.records, domain.records);
    assert_eq!(
        stored.soa_record().and_then(|r| r.primary_ns()),
        Some("ns1.example.org")
    );

    let err = repo.save_domain(&domain).await.unwrap_err();
    assert!(matches!(err, AppError::ConstraintViolation(_)), "{err:?}");
    assert!(repo.find_domain_by_name("example.net").await.unwrap().is_none());
}
