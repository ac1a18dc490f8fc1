//! Reducer: `(state, action) -> DispatchResult<Effect>`
//!
//! All state transitions happen here. Entity lifecycle actions go to their
//! container first; intents among them also declare the remote call that
//! fulfils them. Navigation decides what each screen needs on entry.

use std::path::PathBuf;

use blog_admin_core::{DispatchResult, EntityAction, ListQuery};
use tracing::{debug, info};

use crate::action::Action;
use crate::effect::Effect;
use crate::form::{EntryForm, Field};
use crate::model::BlogEntry;
use crate::routes::Route;
use crate::state::{toggle_sort, AppState, REFERENCE_PAGE_SIZE};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Entity containers =====
        Action::Entry(action) => reduce_entries(state, action),

        Action::Blog(action) => {
            let effect = action.remote_call().map(Effect::Blogs);
            DispatchResult::from_changed(state.blogs.reduce(action)).with_opt(effect)
        }

        Action::Tag(action) => {
            let effect = action.remote_call().map(Effect::Tags);
            DispatchResult::from_changed(state.tags.reduce(action)).with_opt(effect)
        }

        // ===== Navigation =====
        Action::RouteNavigate(route) => {
            info!(route = %route, "navigate");
            state.history.push(route.clone());
            enter_route(state, route)
        }

        Action::RouteBack => {
            let route = state.history.back().clone();
            info!(route = %route, "back");
            enter_route(state, route)
        }

        // ===== Entry list =====
        Action::ListSelect(index) => {
            let last = state.entries.entities.len().saturating_sub(1);
            let index = index.min(last);
            if index == state.selected {
                return DispatchResult::unchanged();
            }
            state.selected = index;
            DispatchResult::changed()
        }

        Action::ListLoadMore => {
            if !state.can_load_more() {
                return DispatchResult::unchanged();
            }
            state.page += 1;
            debug!(page = state.page, "load more");
            let query = state.list_query(state.page);
            reduce_entries(state, EntityAction::ListFetch(query))
        }

        Action::ListSortToggle => {
            state.sort = toggle_sort(&state.sort);
            enter_list(state)
        }

        Action::ListRefresh => enter_list(state),

        // ===== Update form =====
        Action::FormTitle(value) => set_field(state, Field::Title, |form| form.title = value),
        Action::FormContent(value) => {
            set_field(state, Field::Content, |form| form.content = value)
        }
        Action::FormDate(value) => set_field(state, Field::Date, |form| form.date = value),
        Action::FormImagePath(value) => {
            state.form.image_path = value;
            DispatchResult::changed()
        }

        Action::FormFocus(field) => {
            if state.form.focus == field {
                return DispatchResult::unchanged();
            }
            state.form.focus = field;
            DispatchResult::changed()
        }
        Action::FormFocusNext => {
            state.form.focus = state.form.focus.next();
            DispatchResult::changed()
        }
        Action::FormFocusPrev => {
            state.form.focus = state.form.focus.prev();
            DispatchResult::changed()
        }

        Action::FormBlogSelect(index) => {
            let blog_id = match index {
                0 => None,
                i => state.blogs.entities.get(i - 1).and_then(|b| b.id),
            };
            let changed = state.form.blog_id != blog_id;
            state.form.blog_id = blog_id;
            DispatchResult::from_changed(changed)
        }

        Action::FormTagCursor(index) => {
            state.form.tag_cursor = index.min(state.tags.entities.len().saturating_sub(1));
            DispatchResult::changed()
        }

        Action::FormTagToggle(index) => {
            match state.tags.entities.get(index).and_then(|t| t.id) {
                Some(id) => {
                    state.form.toggle_tag(id);
                    DispatchResult::changed()
                }
                None => DispatchResult::unchanged(),
            }
        }

        Action::FormImageAttach => {
            let path = state.form.image_path.trim();
            if path.is_empty() {
                state.form.status = Some("Type the image file path first.".to_string());
                return DispatchResult::changed();
            }
            let path = PathBuf::from(path);
            state.form.status = None;
            DispatchResult::changed_with(Effect::ReadImage { path })
        }

        Action::FormImageDidLoad { data, content_type } => {
            state.form.status = Some(format!("Attached {}.", content_type));
            reduce_entries(
                state,
                EntityAction::SetBlob {
                    name: "image".to_string(),
                    data: Some(data),
                    content_type: Some(content_type),
                },
            )
            .mark_changed()
        }

        Action::FormImageDidError(message) => {
            state.form.status = Some(message);
            DispatchResult::changed()
        }

        Action::FormImageClear => {
            state.form.status = None;
            state.form.image_path.clear();
            reduce_entries(
                state,
                EntityAction::SetBlob {
                    name: "image".to_string(),
                    data: None,
                    content_type: None,
                },
            )
            .mark_changed()
        }

        Action::FormSave => {
            if state.entries.updating || !state.route().is_form() {
                return DispatchResult::unchanged();
            }
            // an edit saves only on top of its own loaded entity
            let base_ready = state.form.is_new() || state.entries.entity.id == state.form.id;
            if !state.form.populated || state.entries.loading || !base_ready {
                debug!(id = ?state.form.id, "entry not loaded yet, save ignored");
                return DispatchResult::unchanged();
            }
            match state.form.build(&state.entries.entity) {
                Ok(entry) => {
                    state.form.errors.clear();
                    let action = if state.form.is_new() {
                        EntityAction::Create(entry)
                    } else {
                        EntityAction::Update(entry)
                    };
                    reduce_entries(state, action)
                }
                Err(errors) => {
                    debug!(fields = errors.len(), "form has missing fields");
                    if let Some(first) = errors.keys().next() {
                        state.form.focus = *first;
                    }
                    state.form.errors = errors;
                    DispatchResult::changed()
                }
            }
        }

        // ===== Delete dialog =====
        Action::DeleteConfirm => match state.route().clone() {
            Route::Delete(id) if !state.entries.updating => {
                reduce_entries(state, EntityAction::Delete(id))
            }
            _ => DispatchResult::unchanged(),
        },

        // ===== Global =====
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Reduce an entry lifecycle action, then react to what it means for the
/// current screen.
fn reduce_entries(state: &mut AppState, action: EntityAction<BlogEntry>) -> DispatchResult<Effect> {
    let effect = action.remote_call().map(Effect::Entries);
    let loaded_id = match &action {
        EntityAction::GetDidLoad(entry) => entry.id,
        _ => None,
    };
    let was_success = state.entries.update_success;

    let mut result = DispatchResult::from_changed(state.entries.reduce(action)).with_opt(effect);

    if let Some(id) = loaded_id {
        if state.form.id == Some(id) && !state.form.populated && state.route().is_form() {
            let entry = state.entries.entity.clone();
            state.form.populate(&entry);
        }
    }

    // A finished write closes the form or dialog that issued it
    if !was_success && state.entries.update_success {
        let route = state.route();
        if route.is_form() || matches!(route, Route::Delete(_)) {
            info!(from = %route, "write succeeded, back to list");
            state.history.reset_to(Route::List);
            result = result.merge(enter_list(state));
        }
    }

    result
}

fn enter_route(state: &mut AppState, route: Route) -> DispatchResult<Effect> {
    match route {
        Route::List => enter_list(state),

        Route::Detail(id) | Route::Delete(id) => {
            reduce_entries(state, EntityAction::GetFetch(id)).mark_changed()
        }

        Route::New => {
            state.form = EntryForm::create();
            state.entries.reduce(EntityAction::Reset);
            fetch_references(state)
        }

        Route::Edit(id) => {
            state.form = EntryForm::edit(id);
            state.entries.reduce(EntityAction::Reset);
            reduce_entries(state, EntityAction::GetFetch(id)).merge(fetch_references(state))
        }

        Route::NotFound(_) => DispatchResult::changed(),
    }
}

/// Reset the entry container and fetch the first page.
fn enter_list(state: &mut AppState) -> DispatchResult<Effect> {
    state.entries.reduce(EntityAction::Reset);
    state.page = 0;
    state.selected = 0;
    let query = state.list_query(0);
    reduce_entries(state, EntityAction::ListFetch(query)).mark_changed()
}

/// Refresh the blog and tag lists the form's selectors offer.
fn fetch_references(state: &mut AppState) -> DispatchResult<Effect> {
    let query = ListQuery::new(0, REFERENCE_PAGE_SIZE);
    state.blogs.reduce(EntityAction::Reset);
    state.tags.reduce(EntityAction::Reset);
    reducer(state, Action::Blog(EntityAction::ListFetch(query.clone())))
        .merge(reducer(state, Action::Tag(EntityAction::ListFetch(query))))
        .mark_changed()
}

fn set_field(
    state: &mut AppState,
    field: Field,
    update: impl FnOnce(&mut EntryForm),
) -> DispatchResult<Effect> {
    update(&mut state.form);
    state.form.errors.remove(&field);
    DispatchResult::changed()
}
