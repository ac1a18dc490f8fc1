// Request lifecycle and screen flow tests, driven through the reducer with a
// scripted backend standing in for the REST calls.

use blog_admin::action::Action;
use blog_admin::effect::Effect;
use blog_admin::form::{Field, REQUIRED};
use blog_admin::model::{Blog, BlogEntry, Tag};
use blog_admin::reducer::reducer;
use blog_admin::routes::Route;
use blog_admin::state::AppState;
use blog_admin_core::testing::TestHarness;
use blog_admin_core::{
    assert_emitted, assert_not_emitted, EntityAction, EntityState, ErrorPayload, ListQuery, Page,
    RemoteCall,
};

type Harness = TestHarness<AppState, Action, Effect>;

fn harness() -> Harness {
    TestHarness::new(AppState::default(), reducer)
}

fn entry(id: i64, title: &str) -> BlogEntry {
    BlogEntry {
        id: Some(id),
        title: title.into(),
        content: format!("{} body", title),
        ..Default::default()
    }
}

/// Answer every pending effect the way a healthy backend holding `stored`
/// would, then dispatch the answers.
fn serve(h: &mut Harness, stored: &[BlogEntry]) -> Vec<Effect> {
    let effects = h.drain_effects();
    for effect in &effects {
        let answer = match effect {
            Effect::Entries(RemoteCall::List(_)) => Action::Entry(EntityAction::ListDidLoad(
                Page::new(stored.to_vec(), "", stored.len().to_string()),
            )),
            Effect::Entries(RemoteCall::Get(id)) => {
                match stored.iter().find(|e| e.id == Some(*id)) {
                    Some(e) => Action::Entry(EntityAction::GetDidLoad(e.clone())),
                    None => Action::Entry(EntityAction::GetDidError(
                        ErrorPayload::new("Not Found").with_status(404),
                    )),
                }
            }
            Effect::Entries(RemoteCall::Create(e)) => {
                Action::Entry(EntityAction::CreateDidSucceed(BlogEntry {
                    id: Some(100),
                    ..e.clone()
                }))
            }
            Effect::Entries(RemoteCall::Update(e)) => {
                Action::Entry(EntityAction::UpdateDidSucceed(e.clone()))
            }
            Effect::Entries(RemoteCall::Delete(id)) => {
                Action::Entry(EntityAction::DeleteDidSucceed(*id))
            }
            Effect::Blogs(_) => Action::Blog(EntityAction::ListDidLoad(Page::new(
                vec![Blog {
                    name: Some("tech".into()),
                    ..Blog::reference(1)
                }],
                "",
                "1",
            ))),
            Effect::Tags(_) => Action::Tag(EntityAction::ListDidLoad(Page::new(
                vec![Tag::reference(3), Tag::reference(5)],
                "",
                "2",
            ))),
            Effect::ReadImage { .. } => Action::FormImageDidLoad {
                data: "R0lGODlh".into(),
                content_type: "image/gif".into(),
            },
        };
        h.emit(answer);
    }
    h.process_emitted();
    effects
}

// ── Container properties ────────────────────────────────────────────

#[test]
fn test_list_success_populates_entities() {
    let mut entries: EntityState<BlogEntry> = EntityState::initial();
    entries.reduce(EntityAction::ListFetch(ListQuery::new(0, 20)));
    entries.reduce(EntityAction::ListDidLoad(Page::new(
        vec![BlogEntry {
            id: Some(1),
            title: "A".into(),
            ..Default::default()
        }],
        "",
        "1",
    )));

    assert_eq!(entries.entities.len(), 1);
    assert_eq!(entries.entities[0].id, Some(1));
    assert_eq!(entries.entities[0].title, "A");
    assert_eq!(entries.total_items, 1);
    assert!(!entries.loading);
}

#[test]
fn test_last_success_wins() {
    let mut entries: EntityState<BlogEntry> = EntityState::initial();
    entries.reduce(EntityAction::GetFetch(1));
    entries.reduce(EntityAction::GetFetch(2));
    entries.reduce(EntityAction::GetDidLoad(entry(2, "second")));
    entries.reduce(EntityAction::GetDidLoad(entry(1, "first")));

    // no cancellation: the late answer for 1 lands last
    assert!(!entries.loading);
    assert_eq!(entries.entity, entry(1, "first"));
}

#[test]
fn test_every_failure_clears_flags() {
    let failures: Vec<fn(ErrorPayload) -> EntityAction<BlogEntry>> = vec![
        EntityAction::ListDidError,
        EntityAction::GetDidError,
        EntityAction::CreateDidError,
        EntityAction::UpdateDidError,
        EntityAction::DeleteDidError,
    ];
    for failure in failures {
        let mut entries: EntityState<BlogEntry> = EntityState::initial();
        entries.reduce(EntityAction::Create(entry(1, "x")));
        entries.reduce(EntityAction::ListFetch(ListQuery::new(0, 20)));
        entries.reduce(failure(ErrorPayload::new("boom").with_status(500)));

        assert!(!entries.loading);
        assert!(!entries.updating);
        assert!(!entries.update_success);
        assert!(entries.error_message.is_some());
    }
}

#[test]
fn test_reset_restores_initial_state() {
    let mut entries: EntityState<BlogEntry> = EntityState::initial();
    entries.reduce(EntityAction::ListDidLoad(Page::new(
        vec![entry(1, "A")],
        "",
        "1",
    )));
    entries.reduce(EntityAction::Update(entry(1, "B")));
    entries.reduce(EntityAction::Reset);
    assert_eq!(entries, EntityState::initial());
}

#[test]
fn test_create_success_keeps_server_representation() {
    let mut entries: EntityState<BlogEntry> = EntityState::initial();
    entries.reduce(EntityAction::Create(entry(0, "new")));
    let saved = entry(12, "new");
    entries.reduce(EntityAction::CreateDidSucceed(saved.clone()));

    assert!(entries.update_success);
    assert!(!entries.updating);
    assert_eq!(entries.entity, saved);
}

#[test]
fn test_set_blob_touches_only_image_fields() {
    let mut entries: EntityState<BlogEntry> = EntityState::initial();
    entries.reduce(EntityAction::GetDidLoad(entry(3, "pic")));
    let before = entries.clone();

    entries.reduce(EntityAction::SetBlob {
        name: "image".into(),
        data: Some("iVBORw0KGgo=".into()),
        content_type: Some("image/png".into()),
    });

    assert_eq!(entries.entity.image.as_deref(), Some("iVBORw0KGgo="));
    assert_eq!(entries.entity.image_content_type.as_deref(), Some("image/png"));
    assert_eq!(
        BlogEntry {
            image: None,
            image_content_type: None,
            ..entries.entity.clone()
        },
        before.entity
    );
    assert_eq!(entries.loading, before.loading);
    assert_eq!(entries.entities, before.entities);
}

// ── Screen flows ────────────────────────────────────────────────────

#[test]
fn test_create_flow_returns_to_list() {
    let stored = vec![entry(1, "A")];
    let mut h = harness();

    h.dispatch(Action::RouteNavigate(Route::List));
    serve(&mut h, &stored);
    assert_eq!(h.state.entries.entities, stored);

    h.dispatch(Action::RouteNavigate(Route::New));
    let effects = serve(&mut h, &stored);
    assert_eq!(effects.len(), 2);
    assert_eq!(h.state.blog_options(), vec!["(none)", "tech"]);

    h.dispatch_all([
        Action::FormTitle("Hello".into()),
        Action::FormContent("World".into()),
        Action::FormDate("2024-03-01 10:30".into()),
        Action::FormBlogSelect(1),
        Action::FormTagToggle(1),
        Action::FormImagePath("cat.gif".into()),
        Action::FormImageAttach,
    ]);
    serve(&mut h, &stored);
    assert_eq!(h.state.entries.entity.image.as_deref(), Some("R0lGODlh"));

    h.dispatch(Action::FormSave);
    let effects = serve(&mut h, &stored);
    let [Effect::Entries(RemoteCall::Create(sent))] = effects.as_slice() else {
        panic!("expected a single create, got {effects:?}");
    };
    assert_eq!(sent.blog, Some(Blog::reference(1)));
    assert_eq!(sent.tags, vec![Tag::reference(5)]);
    assert_eq!(sent.image_content_type.as_deref(), Some("image/gif"));

    // success navigated back to a freshly loading list
    assert_eq!(h.state.route(), &Route::List);
    let effects = h.drain_effects();
    assert_eq!(
        effects,
        vec![Effect::Entries(RemoteCall::List(
            ListQuery::new(0, 20).sorted("id,asc")
        ))]
    );
    assert!(h.state.entries.loading);
}

#[test]
fn test_missing_required_field_issues_no_request() {
    let mut h = harness();
    h.dispatch(Action::RouteNavigate(Route::New));
    h.drain_effects();

    h.dispatch_all([
        Action::FormContent("Body".into()),
        Action::FormDate("2024-03-01 10:30".into()),
        Action::FormSave,
    ]);

    assert!(h.drain_effects().is_empty());
    assert_eq!(h.state.form.error_for(Field::Title), Some(REQUIRED));
    assert_eq!(h.state.route(), &Route::New);

    // typing clears the error
    h.dispatch(Action::FormTitle("T".into()));
    assert_eq!(h.state.form.error_for(Field::Title), None);
}

#[test]
fn test_edit_flow_populates_and_updates() {
    let stored = vec![BlogEntry {
        date: blog_admin::dates::to_server("2024-01-02 08:00"),
        tags: vec![Tag::reference(3)],
        ..entry(4, "Old")
    }];
    let mut h = harness();

    h.dispatch(Action::RouteNavigate(Route::Edit(4)));
    serve(&mut h, &stored);
    assert!(h.state.form.populated);
    assert_eq!(h.state.form.title, "Old");
    assert_eq!(h.state.tag_checks(), vec![true, false]);

    h.dispatch(Action::FormTitle("New".into()));
    h.dispatch(Action::FormSave);
    let effects = serve(&mut h, &stored);
    assert!(matches!(
        effects.as_slice(),
        [Effect::Entries(RemoteCall::Update(e))]
            if e.id == Some(4) && e.title == "New" && e.date == stored[0].date
    ));
    assert_eq!(h.state.route(), &Route::List);
}

#[test]
fn test_delete_flow_and_back() {
    let stored = vec![entry(1, "A"), entry(2, "B")];
    let mut h = harness();

    h.dispatch(Action::RouteNavigate(Route::List));
    serve(&mut h, &stored);

    h.dispatch(Action::RouteNavigate(Route::Delete(2)));
    serve(&mut h, &stored);
    assert_eq!(h.state.entries.entity.title, "B");

    // cancelling goes back without deleting
    h.dispatch(Action::RouteBack);
    let effects = serve(&mut h, &stored);
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::Entries(RemoteCall::Delete(_)))));
    assert_eq!(h.state.route(), &Route::List);

    h.dispatch(Action::RouteNavigate(Route::Delete(2)));
    serve(&mut h, &stored);
    h.dispatch(Action::DeleteConfirm);
    let effects = serve(&mut h, &stored);
    assert_eq!(effects, vec![Effect::Entries(RemoteCall::Delete(2))]);
    assert_eq!(h.state.route(), &Route::List);
    assert_eq!(h.state.history.depth(), 1);
}

#[test]
fn test_detail_of_missing_entry_shows_error() {
    let mut h = harness();
    h.dispatch(Action::RouteNavigate(Route::Detail(99)));
    serve(&mut h, &[]);

    let error = h.state.entries.error_message.clone().unwrap();
    assert_eq!(error.status, Some(404));
    assert!(!h.state.entries.loading);
}

#[test]
fn test_emitted_results_are_reduced_in_arrival_order() {
    let mut h = harness();
    h.dispatch(Action::RouteNavigate(Route::Detail(1)));
    h.drain_effects();

    h.emit(Action::Entry(EntityAction::GetDidLoad(entry(1, "first"))));
    h.emit(Action::Entry(EntityAction::GetDidLoad(entry(1, "second"))));
    let emitted = h.drain_emitted();
    assert_emitted!(emitted, Action::Entry(EntityAction::GetDidLoad(e)) if e.title == "first");
    assert_not_emitted!(emitted, Action::Entry(EntityAction::GetDidError(_)));

    h.dispatch_all(emitted);
    assert_eq!(h.state.entries.entity.title, "second");
}
