//! Form and list widgets for blog-admin
//!
//! Components implement [`blog_admin_core::Component`] and emit actions via
//! callback functions passed through Props. None of them own the values they
//! show: text, selection and checked flags come from application state.
//!
//! # Components
//!
//! - [`TextInput`] - Labelled single-line field with cursor and error slot
//! - [`SelectList`] - Scrollable single-choice list
//! - [`MultiSelect`] - Checkbox list
//! - [`render_modal`] - Overlay with dimmed background
//!
//! ```ignore
//! use blog_admin_components::{TextInput, TextInputProps};
//!
//! title_input.render(frame, area, TextInputProps {
//!     label: "Title",
//!     value: &form.title,
//!     placeholder: "",
//!     is_focused: form.focus == Field::Title,
//!     error: form.error_for(Field::Title),
//!     on_change: Action::FormTitle,
//! });
//! ```

mod modal;
mod multi_select;
mod select_list;
mod text_input;

pub use modal::{centered_rect, dim_buffer, render_modal, ModalStyle};
pub use multi_select::{MultiSelect, MultiSelectProps};
pub use select_list::{SelectList, SelectListProps};
pub use text_input::{TextInput, TextInputProps};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        centered_rect, render_modal, ModalStyle, MultiSelect, MultiSelectProps, SelectList,
        SelectListProps, TextInput, TextInputProps,
    };
}
