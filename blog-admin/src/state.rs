//! Application state

use blog_admin_core::{EntityState, ListQuery};

use crate::config::{AdminConfig, DEFAULT_PAGE_SIZE, DEFAULT_SORT};
use crate::form::EntryForm;
use crate::model::{Blog, BlogEntry, Tag};
use crate::routes::{History, Route};

/// Reference lists (blogs, tags) are fetched in one page of this size.
pub const REFERENCE_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug)]
pub struct AppState {
    pub entries: EntityState<BlogEntry>,
    pub blogs: EntityState<Blog>,
    pub tags: EntityState<Tag>,

    pub history: History,

    /// Last page fetched into the entry list
    pub page: u32,
    pub page_size: u32,
    /// `property,direction`
    pub sort: String,
    /// Highlighted row of the entry list
    pub selected: usize,

    pub form: EntryForm,

    pub terminal_size: (u16, u16),
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            entries: EntityState::initial(),
            blogs: EntityState::initial(),
            tags: EntityState::initial(),
            history: History::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_SORT.to_string(),
            selected: 0,
            form: EntryForm::create(),
            terminal_size: (80, 24),
        }
    }
}

impl AppState {
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            page_size: config.page_size,
            sort: config.sort.clone(),
            ..Self::default()
        }
    }

    pub fn route(&self) -> &Route {
        self.history.current()
    }

    /// Query for page `page` of the entry list with the current sort.
    pub fn list_query(&self, page: u32) -> ListQuery {
        ListQuery::new(page, self.page_size).sorted(self.sort.clone())
    }

    /// The highlighted entry, if the list has any.
    pub fn selected_entry(&self) -> Option<&BlogEntry> {
        self.entries.entities.get(self.selected)
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected_entry().and_then(|e| e.id)
    }

    /// Whether "load more" would fetch anything.
    pub fn can_load_more(&self) -> bool {
        !self.entries.loading && self.entries.links.has_more(self.page)
    }

    /// Index of the entry's blog among the form's blog options, where 0 is
    /// "none".
    pub fn blog_option_index(&self) -> usize {
        self.form
            .blog_id
            .and_then(|id| self.blogs.entities.iter().position(|b| b.id == Some(id)))
            .map_or(0, |i| i + 1)
    }

    /// Labels of the blog options: "(none)" followed by every fetched blog.
    pub fn blog_options(&self) -> Vec<String> {
        std::iter::once("(none)".to_string())
            .chain(self.blogs.entities.iter().map(Blog::label))
            .collect()
    }

    pub fn tag_options(&self) -> Vec<String> {
        self.tags.entities.iter().map(Tag::label).collect()
    }

    /// Checked flags parallel to [`tag_options`](Self::tag_options).
    pub fn tag_checks(&self) -> Vec<bool> {
        self.tags
            .entities
            .iter()
            .map(|t| t.id.is_some_and(|id| self.form.tag_ids.contains(&id)))
            .collect()
    }
}

/// Flip a sort key between ascending and descending.
pub fn toggle_sort(sort: &str) -> String {
    match sort.rsplit_once(',') {
        Some((property, "asc")) => format!("{},desc", property),
        Some((property, _)) => format!("{},asc", property),
        None => format!("{},desc", sort),
    }
}
