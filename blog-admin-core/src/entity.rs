//! Entity CRUD state container
//!
//! One [`EntityState`] exists per resource type. It is mutated only by
//! [`EntityAction`]s: an intent (`ListFetch`, `GetFetch`, `Create`, `Update`,
//! `Delete`) opens a request, a `*DidLoad` / `*DidSucceed` / `*DidError`
//! result closes it. Two extra actions exist: `SetBlob` stages a binary field
//! on the selected entity and `Reset` returns to the initial state.
//!
//! The container never performs I/O. [`EntityAction::remote_call`] names the
//! remote operation an intent stands for, and the application turns that into
//! an effect.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::pagination::{merge_page, parse_link_header, parse_total_count, PageLinks};

/// A resource managed through the REST backend.
pub trait Entity:
    Clone + fmt::Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Resource path relative to the API root, e.g. `api/blog-entries`.
    const RESOURCE: &'static str;

    /// Backend-assigned identifier, `None` until created.
    fn id(&self) -> Option<i64>;

    /// Stage binary data on the field called `name` together with its
    /// content type. `None` for both clears the field.
    ///
    /// Returns `false` when the entity has no binary field of that name.
    fn set_blob(
        &mut self,
        name: &str,
        data: Option<String>,
        content_type: Option<String>,
    ) -> bool {
        let _ = (name, data, content_type);
        false
    }
}

/// Failure payload recorded by a container, as received at the transport
/// boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    pub message: String,
    /// Raw response body, when there was one.
    pub body: Option<String>,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            body: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Paging parameters of a list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    /// `property,direction`, e.g. `id,asc`
    pub sort: Option<String>,
}

impl ListQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// Raw pagination headers of a list response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageHeaders {
    /// `Link` header, empty when absent
    pub link: String,
    /// `X-Total-Count` header, empty when absent
    pub total_count: String,
}

/// One fetched page: the items in server order plus the raw headers.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub headers: PageHeaders,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, link: impl Into<String>, total_count: impl Into<String>) -> Self {
        Self {
            data,
            headers: PageHeaders {
                link: link.into(),
                total_count: total_count.into(),
            },
        }
    }
}

/// A remote operation requested by an intent action.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteCall<T> {
    List(ListQuery),
    Get(i64),
    Create(T),
    Update(T),
    Delete(i64),
}

impl<T> RemoteCall<T> {
    pub fn name(&self) -> &'static str {
        match self {
            RemoteCall::List(_) => "list",
            RemoteCall::Get(_) => "get",
            RemoteCall::Create(_) => "create",
            RemoteCall::Update(_) => "update",
            RemoteCall::Delete(_) => "delete",
        }
    }
}

/// Request lifecycle actions for one entity container.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityAction<T> {
    ListFetch(ListQuery),
    ListDidLoad(Page<T>),
    ListDidError(ErrorPayload),

    GetFetch(i64),
    GetDidLoad(T),
    GetDidError(ErrorPayload),

    Create(T),
    CreateDidSucceed(T),
    CreateDidError(ErrorPayload),

    Update(T),
    UpdateDidSucceed(T),
    UpdateDidError(ErrorPayload),

    Delete(i64),
    DeleteDidSucceed(i64),
    DeleteDidError(ErrorPayload),

    /// Stage (or clear, with `None`s) a binary field on the selected entity
    SetBlob {
        name: String,
        data: Option<String>,
        content_type: Option<String>,
    },

    Reset,
}

impl<T> EntityAction<T> {
    pub fn name(&self) -> &'static str {
        match self {
            EntityAction::ListFetch(_) => "ListFetch",
            EntityAction::ListDidLoad(_) => "ListDidLoad",
            EntityAction::ListDidError(_) => "ListDidError",
            EntityAction::GetFetch(_) => "GetFetch",
            EntityAction::GetDidLoad(_) => "GetDidLoad",
            EntityAction::GetDidError(_) => "GetDidError",
            EntityAction::Create(_) => "Create",
            EntityAction::CreateDidSucceed(_) => "CreateDidSucceed",
            EntityAction::CreateDidError(_) => "CreateDidError",
            EntityAction::Update(_) => "Update",
            EntityAction::UpdateDidSucceed(_) => "UpdateDidSucceed",
            EntityAction::UpdateDidError(_) => "UpdateDidError",
            EntityAction::Delete(_) => "Delete",
            EntityAction::DeleteDidSucceed(_) => "DeleteDidSucceed",
            EntityAction::DeleteDidError(_) => "DeleteDidError",
            EntityAction::SetBlob { .. } => "SetBlob",
            EntityAction::Reset => "Reset",
        }
    }

    /// The error payload of a failed result action.
    pub fn error(&self) -> Option<&ErrorPayload> {
        match self {
            EntityAction::ListDidError(e)
            | EntityAction::GetDidError(e)
            | EntityAction::CreateDidError(e)
            | EntityAction::UpdateDidError(e)
            | EntityAction::DeleteDidError(e) => Some(e),
            _ => None,
        }
    }
}

impl<T: Clone> EntityAction<T> {
    /// The remote call an intent action stands for. Result actions, `SetBlob`
    /// and `Reset` need none.
    pub fn remote_call(&self) -> Option<RemoteCall<T>> {
        match self {
            EntityAction::ListFetch(query) => Some(RemoteCall::List(query.clone())),
            EntityAction::GetFetch(id) => Some(RemoteCall::Get(*id)),
            EntityAction::Create(entity) => Some(RemoteCall::Create(entity.clone())),
            EntityAction::Update(entity) => Some(RemoteCall::Update(entity.clone())),
            EntityAction::Delete(id) => Some(RemoteCall::Delete(*id)),
            _ => None,
        }
    }
}

/// Per-resource state: fetched list, selected entity and lifecycle flags.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityState<T> {
    /// Fetched items in server order, extended by "load more"
    pub entities: Vec<T>,
    /// Selected / edited entity, `T::default()` when none
    pub entity: T,
    /// A list or get request is in flight
    pub loading: bool,
    /// A create, update or delete request is in flight
    pub updating: bool,
    /// The last write succeeded; cleared by every new request
    pub update_success: bool,
    pub error_message: Option<ErrorPayload>,
    pub links: PageLinks,
    pub total_items: u64,
}

impl<T: Entity> Default for EntityState<T> {
    fn default() -> Self {
        Self::initial()
    }
}

impl<T: Entity> EntityState<T> {
    pub fn initial() -> Self {
        Self {
            entities: Vec::new(),
            entity: T::default(),
            loading: false,
            updating: false,
            update_success: false,
            error_message: None,
            links: PageLinks::initial(),
            total_items: 0,
        }
    }

    /// Apply one lifecycle action. Returns `true` if the state changed.
    pub fn reduce(&mut self, action: EntityAction<T>) -> bool {
        match action {
            EntityAction::ListFetch(_) | EntityAction::GetFetch(_) => {
                self.error_message = None;
                self.update_success = false;
                self.loading = true;
                true
            }

            EntityAction::Create(_) | EntityAction::Update(_) | EntityAction::Delete(_) => {
                self.error_message = None;
                self.update_success = false;
                self.updating = true;
                true
            }

            EntityAction::ListDidError(error)
            | EntityAction::GetDidError(error)
            | EntityAction::CreateDidError(error)
            | EntityAction::UpdateDidError(error)
            | EntityAction::DeleteDidError(error) => {
                self.loading = false;
                self.updating = false;
                self.update_success = false;
                self.error_message = Some(error);
                true
            }

            EntityAction::ListDidLoad(page) => {
                let links = parse_link_header(&page.headers.link);
                let current = std::mem::take(&mut self.entities);
                self.entities = merge_page(current, page.data, &links);
                self.total_items = parse_total_count(&page.headers.total_count);
                self.links = links;
                self.loading = false;
                true
            }

            EntityAction::GetDidLoad(entity) => {
                self.loading = false;
                self.entity = entity;
                true
            }

            EntityAction::CreateDidSucceed(entity) | EntityAction::UpdateDidSucceed(entity) => {
                self.updating = false;
                self.update_success = true;
                self.entity = entity;
                true
            }

            EntityAction::DeleteDidSucceed(_) => {
                self.updating = false;
                self.update_success = true;
                self.entity = T::default();
                true
            }

            EntityAction::SetBlob {
                name,
                data,
                content_type,
            } => self.entity.set_blob(&name, data, content_type),

            EntityAction::Reset => {
                *self = Self::initial();
                true
            }
        }
    }

    /// Whether any request is in flight.
    pub fn is_busy(&self) -> bool {
        self.loading || self.updating
    }

    /// Look up a fetched entity by id.
    pub fn find(&self, id: i64) -> Option<&T> {
        self.entities.iter().find(|e| e.id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Option<i64>,
        title: String,
        image: Option<String>,
        image_content_type: Option<String>,
    }

    impl Entity for Note {
        const RESOURCE: &'static str = "api/notes";

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_blob(
            &mut self,
            name: &str,
            data: Option<String>,
            content_type: Option<String>,
        ) -> bool {
            match name {
                "image" => {
                    self.image = data;
                    self.image_content_type = content_type;
                    true
                }
                _ => false,
            }
        }
    }

    fn note(id: i64, title: &str) -> Note {
        Note {
            id: Some(id),
            title: title.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fetch_sets_loading_and_clears_flags() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.update_success = true;
        state.error_message = Some(ErrorPayload::new("old"));

        assert!(state.reduce(EntityAction::GetFetch(1)));
        assert!(state.loading);
        assert!(!state.update_success);
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn test_write_sets_updating() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.reduce(EntityAction::Delete(3));
        assert!(state.updating);
        assert!(!state.loading);
    }

    #[test]
    fn test_list_success_replaces_on_single_page() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.reduce(EntityAction::ListFetch(ListQuery::new(0, 20)));
        state.reduce(EntityAction::ListDidLoad(Page::new(vec![note(1, "A")], "", "1")));

        assert_eq!(state.entities, vec![note(1, "A")]);
        assert_eq!(state.total_items, 1);
        assert!(!state.loading);
        assert!(state.links.is_empty());
    }

    #[test]
    fn test_list_success_appends_next_page() {
        let link = "</api/notes?page=1&size=1>; rel=\"next\",</api/notes?page=1&size=1>; rel=\"last\",</api/notes?page=0&size=1>; rel=\"first\"";
        let mut state: EntityState<Note> = EntityState::initial();
        state.reduce(EntityAction::ListDidLoad(Page::new(vec![note(1, "A")], link, "2")));
        state.reduce(EntityAction::ListDidLoad(Page::new(vec![note(2, "B")], link, "2")));

        assert_eq!(state.entities, vec![note(1, "A"), note(2, "B")]);
        assert_eq!(state.links.next(), Some(1));
        assert_eq!(state.total_items, 2);
    }

    #[test]
    fn test_failure_records_payload() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.reduce(EntityAction::Update(note(1, "A")));
        let error = ErrorPayload::new("boom").with_status(500);
        state.reduce(EntityAction::UpdateDidError(error.clone()));

        assert!(!state.loading);
        assert!(!state.updating);
        assert!(!state.update_success);
        assert_eq!(state.error_message, Some(error));
    }

    #[test]
    fn test_write_success_sets_update_success() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.reduce(EntityAction::Create(note(0, "A")));
        state.reduce(EntityAction::CreateDidSucceed(note(7, "A")));

        assert!(!state.updating);
        assert!(state.update_success);
        assert_eq!(state.entity, note(7, "A"));
    }

    #[test]
    fn test_delete_success_clears_entity() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.entity = note(7, "A");
        state.reduce(EntityAction::Delete(7));
        state.reduce(EntityAction::DeleteDidSucceed(7));

        assert!(state.update_success);
        assert_eq!(state.entity, Note::default());
    }

    #[test]
    fn test_set_blob_touches_only_named_field() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.entity = note(1, "A");

        let changed = state.reduce(EntityAction::SetBlob {
            name: "image".into(),
            data: Some("aGVsbG8=".into()),
            content_type: Some("image/png".into()),
        });

        assert!(changed);
        assert_eq!(state.entity.title, "A");
        assert_eq!(state.entity.id, Some(1));
        assert_eq!(state.entity.image.as_deref(), Some("aGVsbG8="));
        assert_eq!(state.entity.image_content_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_set_blob_unknown_field_is_identity() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.entity = note(1, "A");
        let before = state.clone();

        let changed = state.reduce(EntityAction::SetBlob {
            name: "avatar".into(),
            data: Some("x".into()),
            content_type: None,
        });

        assert!(!changed);
        assert_eq!(state, before);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.reduce(EntityAction::ListDidLoad(Page::new(vec![note(1, "A")], "", "1")));
        state.reduce(EntityAction::Update(note(1, "B")));
        state.reduce(EntityAction::UpdateDidError(ErrorPayload::new("x")));

        state.reduce(EntityAction::Reset);
        assert_eq!(state, EntityState::initial());
        assert_eq!(state.links.next(), Some(0));
    }

    #[test]
    fn test_remote_call_mapping() {
        let query = ListQuery::new(2, 20).sorted("id,desc");
        assert_eq!(
            EntityAction::<Note>::ListFetch(query.clone()).remote_call(),
            Some(RemoteCall::List(query))
        );
        assert_eq!(
            EntityAction::<Note>::Delete(4).remote_call(),
            Some(RemoteCall::Delete(4))
        );
        assert_eq!(EntityAction::<Note>::Reset.remote_call(), None);
        assert_eq!(
            EntityAction::<Note>::GetDidLoad(note(1, "A")).remote_call(),
            None
        );
    }

    #[test]
    fn test_find_by_id() {
        let mut state: EntityState<Note> = EntityState::initial();
        state.entities = vec![note(1, "A"), note(2, "B")];
        assert_eq!(state.find(2).map(|n| n.title.as_str()), Some("B"));
        assert!(state.find(9).is_none());
    }
}
