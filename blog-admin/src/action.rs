//! Application actions
//!
//! Entity lifecycle actions are wrapped per container (`Entry`, `Blog`,
//! `Tag`). Everything else follows the `<Area><Verb>` naming: `Route*` for
//! navigation, `List*` for the entry list, `Form*` for the update form.
//! A `Did` in the name marks the result of a background task.

use blog_admin_core::{Action as ActionTrait, ActionSummary, EntityAction};

use crate::form::Field;
use crate::model::{Blog, BlogEntry, Tag};
use crate::routes::Route;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // ===== Entity containers =====
    Entry(EntityAction<BlogEntry>),
    Blog(EntityAction<Blog>),
    Tag(EntityAction<Tag>),

    // ===== Navigation =====
    /// Show a route, pushing it onto the history
    RouteNavigate(Route),
    RouteBack,

    // ===== Entry list =====
    ListSelect(usize),
    /// Fetch the next page and append it
    ListLoadMore,
    ListSortToggle,
    ListRefresh,

    // ===== Update form =====
    FormTitle(String),
    FormContent(String),
    FormDate(String),
    FormImagePath(String),
    FormFocus(Field),
    FormFocusNext,
    FormFocusPrev,
    /// Index into the blog options, 0 being "none"
    FormBlogSelect(usize),
    FormTagCursor(usize),
    FormTagToggle(usize),
    /// Read the file named by the image path field
    FormImageAttach,
    FormImageDidLoad {
        data: String,
        content_type: String,
    },
    FormImageDidError(String),
    FormImageClear,
    FormSave,

    // ===== Delete dialog =====
    DeleteConfirm,

    // ===== Global =====
    UiTerminalResize(u16, u16),
    Quit,
}

impl ActionTrait for Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Entry(a) => a.name(),
            Action::Blog(a) => a.name(),
            Action::Tag(a) => a.name(),
            Action::RouteNavigate(_) => "RouteNavigate",
            Action::RouteBack => "RouteBack",
            Action::ListSelect(_) => "ListSelect",
            Action::ListLoadMore => "ListLoadMore",
            Action::ListSortToggle => "ListSortToggle",
            Action::ListRefresh => "ListRefresh",
            Action::FormTitle(_) => "FormTitle",
            Action::FormContent(_) => "FormContent",
            Action::FormDate(_) => "FormDate",
            Action::FormImagePath(_) => "FormImagePath",
            Action::FormFocus(_) => "FormFocus",
            Action::FormFocusNext => "FormFocusNext",
            Action::FormFocusPrev => "FormFocusPrev",
            Action::FormBlogSelect(_) => "FormBlogSelect",
            Action::FormTagCursor(_) => "FormTagCursor",
            Action::FormTagToggle(_) => "FormTagToggle",
            Action::FormImageAttach => "FormImageAttach",
            Action::FormImageDidLoad { .. } => "FormImageDidLoad",
            Action::FormImageDidError(_) => "FormImageDidError",
            Action::FormImageClear => "FormImageClear",
            Action::FormSave => "FormSave",
            Action::DeleteConfirm => "DeleteConfirm",
            Action::UiTerminalResize(..) => "UiTerminalResize",
            Action::Quit => "Quit",
        }
    }
}

/// Log lines stay short: pages and image payloads are summarized.
impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            Action::Entry(a) => format!("Entry::{}", entity_summary(a)),
            Action::Blog(a) => format!("Blog::{}", entity_summary(a)),
            Action::Tag(a) => format!("Tag::{}", entity_summary(a)),
            Action::FormImageDidLoad { data, content_type } => format!(
                "FormImageDidLoad {{ content_type: {:?}, base64_len: {} }}",
                content_type,
                data.len()
            ),
            _ => format!("{:?}", self),
        }
    }
}

fn entity_summary<T: std::fmt::Debug>(action: &EntityAction<T>) -> String {
    match action {
        EntityAction::ListDidLoad(page) => format!(
            "ListDidLoad {{ items: {}, total: {:?} }}",
            page.data.len(),
            page.headers.total_count
        ),
        EntityAction::SetBlob {
            name,
            data,
            content_type,
        } => format!(
            "SetBlob {{ name: {:?}, content_type: {:?}, base64_len: {} }}",
            name,
            content_type,
            data.as_ref().map_or(0, String::len)
        ),
        EntityAction::GetDidLoad(_)
        | EntityAction::CreateDidSucceed(_)
        | EntityAction::UpdateDidSucceed(_)
        | EntityAction::Create(_)
        | EntityAction::Update(_) => action.name().to_string(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_admin_core::Page;

    #[test]
    fn test_name_delegates_to_container_action() {
        assert_eq!(Action::Entry(EntityAction::GetFetch(1)).name(), "GetFetch");
        assert_eq!(Action::RouteBack.name(), "RouteBack");
    }

    #[test]
    fn test_summary_hides_payloads() {
        let page = Page::new(vec![BlogEntry::default(); 3], "", "42");
        let summary = Action::Entry(EntityAction::ListDidLoad(page)).summary();
        assert_eq!(summary, "Entry::ListDidLoad { items: 3, total: \"42\" }");

        let blob = Action::Entry(EntityAction::SetBlob {
            name: "image".into(),
            data: Some("A".repeat(4096)),
            content_type: Some("image/png".into()),
        });
        assert!(blob.summary().contains("base64_len: 4096"));
        assert!(!blob.summary().contains("AAAA"));
    }
}
