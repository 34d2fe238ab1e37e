//! End-to-end catalog flows over the in-process row store.

use showtrack::config::Config;
use showtrack::constants::tables;
use showtrack::domain::{ShowId, ShowRef, SyncStep};
use showtrack::error::ErrorKind;
use showtrack::models::{ShowDraft, ShowPatch, TeamMemberInput};
use showtrack::services::CatalogService;
use showtrack::store::{MemoryRowStore, RowStore};
use std::sync::Arc;

async fn catalog() -> (Arc<MemoryRowStore>, Arc<dyn CatalogService>) {
    let store = Arc::new(MemoryRowStore::with_catalog_schema());
    let service = showtrack::build_catalog(store.clone(), &Config::default())
        .await
        .expect("failed to build catalog");
    (store, service)
}

fn names(team: &[showtrack::models::TeamMember]) -> Vec<&str> {
    team.iter().map(|m| m.name.as_str()).collect()
}

async fn create(service: &dyn CatalogService, title: &str) -> ShowId {
    service
        .create_show(ShowDraft::new(title, "HBO", &["A24"]))
        .await
        .expect("failed to create show")
}

#[tokio::test]
async fn create_resolves_studio_alias_and_unknown_studio() {
    let (_, service) = catalog().await;
    let id = service
        .create_show(ShowDraft::new(
            "The Bear",
            "FX",
            &["20th Century Fox TV", "Acme Films"],
        ))
        .await
        .unwrap();

    let show = service.get_show(id).await.unwrap();
    assert_eq!(show.studios, vec!["20th Television", "Other: Acme Films"]);
}

#[tokio::test]
async fn create_without_team_projects_sentinel() {
    let (_, service) = catalog().await;
    let id = create(service.as_ref(), "Pilot").await;

    let show = service.get_show(id).await.unwrap();
    assert_eq!(show.key_creatives, "No team members announced");
    service.verify_show(id).await.unwrap();
}

#[tokio::test]
async fn create_with_team_projects_by_order() {
    let (_, service) = catalog().await;
    let draft = ShowDraft::new("Severance", "Apple TV+", &["Apple Studios"]).with_team(vec![
        TeamMemberInput::new("Ann").with_roles(&["Writer"]).with_order(2),
        TeamMemberInput::new("Bo").with_roles(&["Director"]).with_order(1),
    ]);
    let id = service.create_show(draft).await.unwrap();

    let show = service.get_show(id).await.unwrap();
    assert_eq!(show.key_creatives, "Bo (Director), Ann (Writer)");
}

#[tokio::test]
async fn key_creatives_follow_every_team_mutation() {
    let (_, service) = catalog().await;
    let id = create(service.as_ref(), "Shogun").await;
    let show = ShowRef::Id(id);

    service
        .add_team_member(&show, TeamMemberInput::new("Ann").with_roles(&["Writer"]))
        .await
        .unwrap();
    service.verify_show(id).await.unwrap();

    service.add_role(&show, "Ann", "EP").await.unwrap();
    assert_eq!(
        service.get_show(id).await.unwrap().key_creatives,
        "Ann (Writer, Executive Producer)"
    );

    service
        .add_team_member(&show, TeamMemberInput::new("Bo").with_roles(&["Dir"]))
        .await
        .unwrap();
    service.remove_role(&show, "Ann", "Writer").await.unwrap();
    service.verify_show(id).await.unwrap();
    assert_eq!(
        service.get_show(id).await.unwrap().key_creatives,
        "Ann (Executive Producer), Bo (Director)"
    );

    service.remove_team_member(&show, "ann").await.unwrap();
    service.remove_team_member(&show, "Bo").await.unwrap();
    assert_eq!(
        service.get_show(id).await.unwrap().key_creatives,
        "No team members announced"
    );
}

#[tokio::test]
async fn removing_only_role_removes_member() {
    let (_, service) = catalog().await;
    let id = create(service.as_ref(), "Pilot").await;
    let show = ShowRef::Id(id);
    service
        .add_team_member(&show, TeamMemberInput::new("Ann").with_roles(&["Writer"]))
        .await
        .unwrap();

    let team = service.remove_role(&show, "Ann", "Writer").await.unwrap();
    assert!(team.is_empty());
    assert!(service.list_team(&show).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_member_name_is_rejected_case_insensitively() {
    let (_, service) = catalog().await;
    let id = create(service.as_ref(), "Pilot").await;
    let show = ShowRef::Id(id);
    service
        .add_team_member(&show, TeamMemberInput::new("Ann").with_roles(&["Writer"]))
        .await
        .unwrap();

    let err = service
        .add_team_member(&show, TeamMemberInput::new("ann"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateName);
    assert_eq!(err.step(), Some(SyncStep::SyncTeam));
    assert_eq!(service.list_team(&show).await.unwrap().len(), 1);
}

#[tokio::test]
async fn title_references_resolve_case_insensitively() {
    let (_, service) = catalog().await;
    create(service.as_ref(), "The Bear").await;

    let team = service
        .add_team_member(
            &ShowRef::parse("the bear"),
            TeamMemberInput::new("Ann").with_roles(&["Writer"]),
        )
        .await
        .unwrap();
    assert_eq!(names(&team), vec!["Ann"]);

    let err = service
        .list_team(&ShowRef::parse("Missing Show"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn rename_keeps_team_attached() {
    let (_, service) = catalog().await;
    let id = create(service.as_ref(), "Working Title").await;
    service
        .add_team_member(
            &ShowRef::Id(id),
            TeamMemberInput::new("Ann").with_roles(&["Writer"]),
        )
        .await
        .unwrap();

    service.rename_show(id, "Final Title").await.unwrap();

    let team = service
        .list_team(&ShowRef::parse("final title"))
        .await
        .unwrap();
    assert_eq!(names(&team), vec!["Ann"]);
    assert!(
        service
            .list_team(&ShowRef::parse("Working Title"))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn update_replaces_team_and_renames() {
    let (_, service) = catalog().await;
    let draft = ShowDraft::new("Alpha", "HBO", &["A24"]).with_team(vec![
        TeamMemberInput::new("Ann").with_roles(&["Writer"]),
        TeamMemberInput::new("Bo").with_roles(&["Director"]),
    ]);
    let id = service.create_show(draft).await.unwrap();

    let patch = ShowPatch {
        title: Some("Beta".to_string()),
        status: Some("Series Order".to_string()),
        team: Some(vec![
            TeamMemberInput::new("Cy").with_roles(&["Creator"]),
            TeamMemberInput::new("Ann").with_roles(&["Writer", "EP"]),
        ]),
        ..ShowPatch::default()
    };
    let show = service.update_show(id, patch).await.unwrap();

    assert_eq!(show.title, "Beta");
    assert_eq!(show.status.as_deref(), Some("Series Order"));
    assert_eq!(
        show.key_creatives,
        "Cy (Creator), Ann (Writer, Executive Producer)"
    );
    let team = service.list_team(&ShowRef::Id(id)).await.unwrap();
    assert_eq!(names(&team), vec!["Cy", "Ann"]);
}

#[tokio::test]
async fn update_without_team_leaves_team_alone() {
    let (_, service) = catalog().await;
    let draft = ShowDraft::new("Alpha", "HBO", &["A24"])
        .with_team(vec![TeamMemberInput::new("Ann").with_roles(&["Writer"])]);
    let id = service.create_show(draft).await.unwrap();

    let patch = ShowPatch {
        genre: Some("Drama".to_string()),
        ..ShowPatch::default()
    };
    service.update_show(id, patch).await.unwrap();
    assert_eq!(service.list_team(&ShowRef::Id(id)).await.unwrap().len(), 1);

    let clear = ShowPatch {
        team: Some(Vec::new()),
        ..ShowPatch::default()
    };
    let show = service.update_show(id, clear).await.unwrap();
    assert_eq!(show.key_creatives, "No team members announced");
}

#[tokio::test]
async fn invalid_team_is_rejected_before_writing() {
    let (store, service) = catalog().await;
    let draft = ShowDraft::new("Alpha", "HBO", &["A24"])
        .with_team(vec![TeamMemberInput::new("Ann")]);

    let err = service.create_show(draft).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.step(), Some(SyncStep::ValidateInput));
    assert!(store.read_all(tables::SHOWS).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_team_write_rolls_back_the_show() {
    let (store, service) = catalog().await;
    store.fail_next_write(tables::TEAM).unwrap();

    let draft = ShowDraft::new("Alpha", "HBO", &["A24"])
        .with_team(vec![TeamMemberInput::new("Ann").with_roles(&["Writer"])]);
    let err = service.create_show(draft).await.unwrap_err();

    assert_eq!(err.step(), Some(SyncStep::SyncTeam));
    assert!(err.is_incident());
    assert!(service.list_shows().await.unwrap().is_empty());
    assert!(store.read_all(tables::TEAM).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_team_table_is_a_schema_error_at_sync_team() {
    let (store, service) = catalog().await;
    store.drop_table(tables::TEAM).unwrap();

    let draft = ShowDraft::new("Alpha", "HBO", &["A24"])
        .with_team(vec![TeamMemberInput::new("Ann").with_roles(&["Writer"])]);
    let err = service.create_show(draft).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(err.step(), Some(SyncStep::SyncTeam));
    assert!(service.list_shows().await.unwrap().is_empty());
    assert!(store.read_all(tables::SHOWS).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_projection_rolls_back_team_change() {
    let (store, service) = catalog().await;
    let id = create(service.as_ref(), "Alpha").await;
    store.fail_next_write(tables::SHOWS).unwrap();

    let err = service
        .add_team_member(
            &ShowRef::Id(id),
            TeamMemberInput::new("Ann").with_roles(&["Writer"]),
        )
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(SyncStep::ProjectKeyCreatives));
    assert!(service.list_team(&ShowRef::Id(id)).await.unwrap().is_empty());
    service.verify_show(id).await.unwrap();
}

#[tokio::test]
async fn delete_removes_show_and_team_only() {
    let (store, service) = catalog().await;
    let keep = create(service.as_ref(), "Keep").await;
    let gone = create(service.as_ref(), "Drop").await;
    for id in [keep, gone] {
        service
            .add_team_member(
                &ShowRef::Id(id),
                TeamMemberInput::new("Ann").with_roles(&["Writer"]),
            )
            .await
            .unwrap();
    }

    service.delete_show(gone).await.unwrap();

    assert_eq!(service.get_show(gone).await.unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(store.read_all(tables::TEAM).await.unwrap().len(), 1);
    assert_eq!(service.list_team(&ShowRef::Id(keep)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn audit_finds_and_resync_fixes_stale_key_creatives() {
    let (store, service) = catalog().await;
    let id = create(service.as_ref(), "Alpha").await;
    create(service.as_ref(), "Beta").await;

    // Simulate an outside edit to the team table.
    store
        .append_row(
            tables::TEAM,
            vec![
                id.to_string(),
                "Ann".to_string(),
                "Writer".to_string(),
                "1".to_string(),
                String::new(),
            ],
        )
        .await
        .unwrap();

    let divergences = service.audit().await.unwrap();
    assert_eq!(divergences.len(), 1);
    assert_eq!(divergences[0].kind(), ErrorKind::SyncInconsistency);

    assert_eq!(service.resync_all().await.unwrap(), 1);
    assert!(service.audit().await.unwrap().is_empty());
    assert_eq!(service.get_show(id).await.unwrap().key_creatives, "Ann (Writer)");
}

#[tokio::test]
async fn search_is_bounded_and_ignores_short_queries() {
    let (_, service) = catalog().await;
    for i in 0..55 {
        create(service.as_ref(), &format!("Pilot {i}")).await;
    }

    assert!(service.search_shows("p").await.unwrap().is_empty());
    assert_eq!(service.search_shows("pilot").await.unwrap().len(), 50);
    assert_eq!(service.search_shows("Pilot 54").await.unwrap().len(), 1);
}

#[tokio::test]
async fn resolution_preview_marks_unknown_names() {
    let (_, service) = catalog().await;

    let studios = service.resolve_studios("WBTV, Acme Films");
    assert_eq!(studios[0].value(), "Warner Bros. Television");
    assert!(studios[0].is_canonical());
    assert!(!studios[1].is_canonical());

    let roles = service.resolve_roles("EP");
    assert_eq!(roles[0].value(), "Executive Producer");

    let marked = service.resolve_studios("Other: WBTV");
    assert_eq!(marked[0].value(), "Warner Bros. Television");
    assert!(marked[0].is_canonical());
}

#[tokio::test]
async fn concurrent_mutations_are_serialized() {
    let (_, service) = catalog().await;
    let id = create(service.as_ref(), "Alpha").await;

    let tasks: Vec<_> = (0..10)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .add_team_member(
                        &ShowRef::Id(id),
                        TeamMemberInput::new(format!("Member {i}")).with_roles(&["Writer"]),
                    )
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let team = service.list_team(&ShowRef::Id(id)).await.unwrap();
    assert_eq!(team.len(), 10);
    service.verify_show(id).await.unwrap();
}
