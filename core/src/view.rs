//! HTML rendering of the todo list.
//!
//! `render` is a pure function of the list: it partitions items by
//! `completed` (keeping list order inside each partition) and produces one
//! HTML fragment per container. The host replaces both containers' contents
//! with the fragments on every store change.
//!
//! Every interactive element carries `data-id` and a typed `data-command`, so
//! the host can turn a click back into a `Command` without looking at labels.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;

use crate::types::Todo;

/// Shown in the incomplete container when the list is empty.
pub const EMPTY_PLACEHOLDER: &str = r#"<li class="empty">no task to display</li>"#;

/// Action attached to a rendered control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Click on a display-mode title: flip `completed`.
    Toggle,
    /// Enter inline-edit mode.
    Edit,
    /// Commit the inline edit.
    Submit,
    Delete,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Toggle => "toggle",
            Command::Edit => "edit",
            Command::Submit => "submit",
            Command::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command: {0:?}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toggle" => Ok(Command::Toggle),
            "edit" => Ok(Command::Edit),
            "submit" => Ok(Command::Submit),
            "delete" => Ok(Command::Delete),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// Contents for the two list containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub incomplete: String,
    pub complete: String,
}

pub fn render(todos: &[Todo]) -> Rendered {
    let mut rendered = Rendered::default();
    if todos.is_empty() {
        rendered.incomplete.push_str(EMPTY_PLACEHOLDER);
        return rendered;
    }
    for todo in todos {
        let target = if todo.completed {
            &mut rendered.complete
        } else {
            &mut rendered.incomplete
        };
        render_item(target, todo);
    }
    rendered
}

fn render_item(out: &mut String, todo: &Todo) {
    let id = escape(&todo.id.to_string());
    let title = escape(&todo.title);
    out.push_str("<li>");
    // Writing into a String cannot fail.
    if todo.editable {
        let _ = write!(out, r#"<input type="text" data-id="{id}" value="{title}">"#);
        let _ = write!(
            out,
            r#"<button data-command="{}" data-id="{id}" class="btn--edit">Submit</button>"#,
            Command::Submit.as_str()
        );
    } else {
        let class = if todo.completed { r#" class="completed""# } else { "" };
        let _ = write!(
            out,
            r#"<span data-command="{}" data-id="{id}"{class}>{title}</span>"#,
            Command::Toggle.as_str()
        );
        let _ = write!(
            out,
            r#"<button data-command="{}" data-id="{id}" class="btn--edit">Edit</button>"#,
            Command::Edit.as_str()
        );
    }
    let _ = write!(
        out,
        r#"<button data-command="{}" data-id="{id}" class="btn--delete">remove</button>"#,
        Command::Delete.as_str()
    );
    out.push_str("</li>");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
