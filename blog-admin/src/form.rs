//! Create / edit form state and required-field validation

use std::collections::BTreeMap;

use crate::dates;
use crate::model::{map_id_list, Blog, BlogEntry};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_DATE: &str = "Invalid date, expected YYYY-MM-DD HH:mm.";

/// Form fields in tab order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Content,
    Date,
    Blog,
    Tags,
    Image,
}

impl Field {
    pub const ORDER: [Field; 6] = [
        Field::Title,
        Field::Content,
        Field::Date,
        Field::Blog,
        Field::Tags,
        Field::Image,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Content => "Content",
            Field::Date => "Date",
            Field::Blog => "Blog",
            Field::Tags => "Tags",
            Field::Image => "Image",
        }
    }

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Field {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Field {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// Editable values of the entry being created or edited.
///
/// The staged image lives on the entry container's selected entity, where
/// `SetBlob` puts it; the form only keeps the path being typed.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryForm {
    /// `None` when creating
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    pub date: String,
    pub blog_id: Option<i64>,
    pub tag_ids: Vec<i64>,
    pub tag_cursor: usize,
    pub image_path: String,
    pub focus: Field,
    pub errors: BTreeMap<Field, &'static str>,
    /// Outcome of the last image attach, shown under the form
    pub status: Option<String>,
    /// Whether the edited entity has been copied into the form yet
    pub populated: bool,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self::create()
    }
}

impl EntryForm {
    /// An empty form for a new entry.
    pub fn create() -> Self {
        Self {
            id: None,
            title: String::new(),
            content: String::new(),
            date: String::new(),
            blog_id: None,
            tag_ids: Vec::new(),
            tag_cursor: 0,
            image_path: String::new(),
            focus: Field::Title,
            errors: BTreeMap::new(),
            status: None,
            populated: true,
        }
    }

    /// A form waiting for entry `id` to arrive.
    pub fn edit(id: i64) -> Self {
        Self {
            id: Some(id),
            populated: false,
            ..Self::create()
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Copy the fetched entity into the form fields.
    pub fn populate(&mut self, entry: &BlogEntry) {
        self.title = entry.title.clone();
        self.content = entry.content.clone();
        self.date = dates::from_server(entry.date);
        self.blog_id = entry.blog.as_ref().and_then(|b| b.id);
        self.tag_ids = entry.tag_ids();
        self.errors.clear();
        self.populated = true;
    }

    pub fn error_for(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn toggle_tag(&mut self, id: i64) {
        match self.tag_ids.iter().position(|t| *t == id) {
            Some(i) => {
                self.tag_ids.remove(i);
            }
            None => self.tag_ids.push(id),
        }
    }

    /// Check required fields and build the entity to send.
    ///
    /// `base` is the container's selected entity: it supplies the id and the
    /// staged image, which the form itself does not edit.
    pub fn build(&self, base: &BlogEntry) -> Result<BlogEntry, BTreeMap<Field, &'static str>> {
        let mut errors = BTreeMap::new();
        if self.title.trim().is_empty() {
            errors.insert(Field::Title, REQUIRED);
        }
        if self.content.trim().is_empty() {
            errors.insert(Field::Content, REQUIRED);
        }
        let date = if self.date.trim().is_empty() {
            errors.insert(Field::Date, REQUIRED);
            None
        } else {
            let parsed = dates::to_server(&self.date);
            if parsed.is_none() {
                errors.insert(Field::Date, INVALID_DATE);
            }
            parsed
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BlogEntry {
            id: if self.is_new() { None } else { self.id.or(base.id) },
            title: self.title.clone(),
            content: self.content.clone(),
            date,
            blog: self.blog_id.map(Blog::reference),
            tags: map_id_list(&self.tag_ids),
            ..base.clone()
        })
    }
}
