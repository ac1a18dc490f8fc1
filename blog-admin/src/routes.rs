//! Route table: URL-style paths ⇄ screens

use std::fmt;

pub const BASE_PATH: &str = "/entity/blog-entry";

/// A screen of the admin, addressed by path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Route {
    /// `/entity/blog-entry`
    #[default]
    List,
    /// `/entity/blog-entry/new`
    New,
    /// `/entity/blog-entry/:id/edit`
    Edit(i64),
    /// `/entity/blog-entry/:id/delete`
    Delete(i64),
    /// `/entity/blog-entry/:id`
    Detail(i64),
    NotFound(String),
}

impl Route {
    /// Resolve a path. Patterns are tried in order: `new`, `:id/edit`,
    /// `:id/delete`, `:id`, then the list itself (also `/` and `""`).
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] | ["entity", "blog-entry"] => Some(Route::List),
            ["entity", "blog-entry", "new"] => Some(Route::New),
            ["entity", "blog-entry", id, "edit"] => parse_id(id).map(Route::Edit),
            ["entity", "blog-entry", id, "delete"] => parse_id(id).map(Route::Delete),
            ["entity", "blog-entry", id] => parse_id(id).map(Route::Detail),
            _ => None,
        };
        route.unwrap_or_else(|| Route::NotFound(trimmed.to_string()))
    }

    /// The canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::List => BASE_PATH.to_string(),
            Route::New => format!("{}/new", BASE_PATH),
            Route::Edit(id) => format!("{}/{}/edit", BASE_PATH, id),
            Route::Delete(id) => format!("{}/{}/delete", BASE_PATH, id),
            Route::Detail(id) => format!("{}/{}", BASE_PATH, id),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Route::List => "Blog Entries".to_string(),
            Route::New => "Create a Blog Entry".to_string(),
            Route::Edit(id) => format!("Edit Blog Entry #{}", id),
            Route::Delete(id) => format!("Delete Blog Entry #{}", id),
            Route::Detail(id) => format!("Blog Entry #{}", id),
            Route::NotFound(_) => "Not Found".to_string(),
        }
    }

    /// Whether this route shows the update form.
    pub fn is_form(&self) -> bool {
        matches!(self, Route::New | Route::Edit(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn parse_id(segment: &str) -> Option<i64> {
    segment.parse::<i64>().ok().filter(|id| *id > 0)
}

/// Visited routes, most recent last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    stack: Vec<Route>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::List)
    }
}

impl History {
    pub fn new(start: Route) -> Self {
        Self { stack: vec![start] }
    }

    pub fn current(&self) -> &Route {
        // The stack is never empty: `back` keeps the first entry
        &self.stack[self.stack.len() - 1]
    }

    /// Visit `route`. Re-visiting the current route is a no-op.
    pub fn push(&mut self, route: Route) -> bool {
        if *self.current() == route {
            return false;
        }
        self.stack.push(route);
        true
    }

    /// Go back one step, or to the list when there is nothing to go back to.
    pub fn back(&mut self) -> &Route {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else if self.stack[0] != Route::List {
            self.stack[0] = Route::List;
        }
        self.current()
    }

    /// Forget everything and show `route`, used after a form or dialog
    /// completes so "back" never returns into it.
    pub fn reset_to(&mut self, route: Route) {
        self.stack.clear();
        self.stack.push(route);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
