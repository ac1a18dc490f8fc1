//! Keybinding contexts and the default key map

use blog_admin_core::{BindingContext, Keybindings};
use crossterm::event::KeyEvent;

use crate::routes::Route;

/// Which bindings are active: one context per kind of screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteContext {
    List,
    Detail,
    Form,
    DeleteDialog,
    NotFound,
}

impl BindingContext for RouteContext {
    fn name(&self) -> &'static str {
        match self {
            RouteContext::List => "list",
            RouteContext::Detail => "detail",
            RouteContext::Form => "form",
            RouteContext::DeleteDialog => "delete",
            RouteContext::NotFound => "not_found",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    fn all() -> &'static [Self] {
        &[
            RouteContext::List,
            RouteContext::Detail,
            RouteContext::Form,
            RouteContext::DeleteDialog,
            RouteContext::NotFound,
        ]
    }
}

impl From<&Route> for RouteContext {
    fn from(route: &Route) -> Self {
        match route {
            Route::List => RouteContext::List,
            Route::Detail(_) => RouteContext::Detail,
            Route::New | Route::Edit(_) => RouteContext::Form,
            Route::Delete(_) => RouteContext::DeleteDialog,
            Route::NotFound(_) => RouteContext::NotFound,
        }
    }
}

/// Named commands keys can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Back,
    EntryNew,
    EntryView,
    EntryEdit,
    EntryDelete,
    ListDown,
    ListUp,
    ListMore,
    ListSort,
    ListRefresh,
    FormSave,
    FormCancel,
    FormNext,
    FormPrev,
    FormAttach,
    FormClearImage,
    DeleteConfirm,
    DeleteCancel,
}

impl Command {
    const ALL: &'static [Command] = &[
        Command::Quit,
        Command::Back,
        Command::EntryNew,
        Command::EntryView,
        Command::EntryEdit,
        Command::EntryDelete,
        Command::ListDown,
        Command::ListUp,
        Command::ListMore,
        Command::ListSort,
        Command::ListRefresh,
        Command::FormSave,
        Command::FormCancel,
        Command::FormNext,
        Command::FormPrev,
        Command::FormAttach,
        Command::FormClearImage,
        Command::DeleteConfirm,
        Command::DeleteCancel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::Back => "back",
            Command::EntryNew => "entry.new",
            Command::EntryView => "entry.view",
            Command::EntryEdit => "entry.edit",
            Command::EntryDelete => "entry.delete",
            Command::ListDown => "list.down",
            Command::ListUp => "list.up",
            Command::ListMore => "list.more",
            Command::ListSort => "list.sort",
            Command::ListRefresh => "list.refresh",
            Command::FormSave => "form.save",
            Command::FormCancel => "form.cancel",
            Command::FormNext => "form.next",
            Command::FormPrev => "form.prev",
            Command::FormAttach => "form.attach",
            Command::FormClearImage => "form.clear_image",
            Command::DeleteConfirm => "delete.confirm",
            Command::DeleteCancel => "delete.cancel",
        }
    }

    /// Short label for the help bar.
    pub fn label(self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::Back => "back",
            Command::EntryNew => "new",
            Command::EntryView => "view",
            Command::EntryEdit => "edit",
            Command::EntryDelete => "delete",
            Command::ListDown => "down",
            Command::ListUp => "up",
            Command::ListMore => "more",
            Command::ListSort => "sort",
            Command::ListRefresh => "refresh",
            Command::FormSave => "save",
            Command::FormCancel => "cancel",
            Command::FormNext => "next field",
            Command::FormPrev => "prev field",
            Command::FormAttach => "attach image",
            Command::FormClearImage => "clear image",
            Command::DeleteConfirm => "confirm",
            Command::DeleteCancel => "cancel",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Commands shown in the help bar for `context`, in display order.
    pub fn hints(context: RouteContext) -> &'static [Command] {
        match context {
            RouteContext::List => &[
                Command::EntryNew,
                Command::EntryView,
                Command::EntryEdit,
                Command::EntryDelete,
                Command::ListMore,
                Command::ListSort,
                Command::ListRefresh,
                Command::Quit,
            ],
            RouteContext::Detail => &[Command::EntryEdit, Command::Back, Command::Quit],
            RouteContext::Form => &[
                Command::FormSave,
                Command::FormNext,
                Command::FormAttach,
                Command::FormClearImage,
                Command::FormCancel,
            ],
            RouteContext::DeleteDialog => &[Command::DeleteConfirm, Command::DeleteCancel],
            RouteContext::NotFound => &[Command::Back, Command::Quit],
        }
    }
}

/// Look up the command bound to `key` in `context`.
pub fn command_for(
    bindings: &Keybindings<RouteContext>,
    key: &KeyEvent,
    context: RouteContext,
) -> Option<Command> {
    bindings
        .get_command(key, context)
        .and_then(Command::from_name)
}

/// The built-in key map. Plain letters are bound per context so they stay
/// free for typing in the form.
pub fn default_keybindings() -> Keybindings<RouteContext> {
    use RouteContext::*;

    let mut kb = Keybindings::new();
    kb.add_global(Command::Quit.name(), &["ctrl+c"]);

    kb.add(List, Command::Quit.name(), &["q"]);
    kb.add(List, Command::EntryNew.name(), &["n"]);
    kb.add(List, Command::EntryView.name(), &["enter", "v"]);
    kb.add(List, Command::EntryEdit.name(), &["e"]);
    kb.add(List, Command::EntryDelete.name(), &["d"]);
    kb.add(List, Command::ListDown.name(), &["j", "down"]);
    kb.add(List, Command::ListUp.name(), &["k", "up"]);
    kb.add(List, Command::ListMore.name(), &["m", "pagedown"]);
    kb.add(List, Command::ListSort.name(), &["s"]);
    kb.add(List, Command::ListRefresh.name(), &["r"]);

    kb.add(Detail, Command::Quit.name(), &["q"]);
    kb.add(Detail, Command::Back.name(), &["b", "esc"]);
    kb.add(Detail, Command::EntryEdit.name(), &["e"]);

    kb.add(Form, Command::FormSave.name(), &["ctrl+s"]);
    kb.add(Form, Command::FormCancel.name(), &["esc"]);
    kb.add(Form, Command::FormNext.name(), &["tab"]);
    kb.add(Form, Command::FormPrev.name(), &["shift+tab"]);
    kb.add(Form, Command::FormAttach.name(), &["ctrl+o"]);
    kb.add(Form, Command::FormClearImage.name(), &["ctrl+x"]);

    kb.add(DeleteDialog, Command::DeleteConfirm.name(), &["y", "enter"]);
    kb.add(DeleteDialog, Command::DeleteCancel.name(), &["n", "esc"]);

    kb.add(NotFound, Command::Quit.name(), &["q"]);
    kb.add(NotFound, Command::Back.name(), &["b", "esc"]);

    kb
}
