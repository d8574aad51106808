use std::fmt::Write;

use super::{escape, Page};
use crate::controller::respond::UiPaths;
use crate::model::Resource;

pub fn index<M: Resource>(paths: &UiPaths, items: &[M], error: Option<String>) -> String {
    let mut rows = String::new();
    for item in items {
        let label = escape(&item.label());
        match item.id() {
            Some(id) => {
                let _ = write!(
                    rows,
                    "<tr><td>{id}</td><td><a href=\"{href}\">{label}</a></td><td><a href=\"{edit}\">edit</a></td></tr>\n",
                    id = escape(&id),
                    href = escape(&paths.item(M::NAME, &id)),
                    edit = escape(&paths.edit_form(M::NAME, &id)),
                    label = label,
                );
            }
            None => {
                let _ = write!(rows, "<tr><td></td><td>{}</td><td></td></tr>\n", label);
            }
        }
    }

    Page::new(M::TITLE)
        .error(error)
        .heading(M::TITLE)
        .link(&paths.new_form(M::NAME), &format!("New {}", singular::<M>()))
        .raw(&format!("<table>\n{}</table>\n", rows))
        .render()
}

/// Show page; `model` is absent when the fetch failed
pub fn detail<M: Resource>(paths: &UiPaths, id: &str, model: Option<&M>, error: Option<String>) -> String {
    let title = model.map(|m| m.label()).unwrap_or_else(|| format!("{} {}", singular::<M>(), id));
    let mut page = Page::new(title.clone()).error(error).heading(&title);
    if let Some(model) = model {
        page = page.json(model);
    }
    page.link(&paths.edit_form(M::NAME, id), "Edit")
        .link(&paths.index(M::NAME), M::TITLE)
        .render()
}

/// New and edit forms, also used to re-render a rejected submission
pub fn form<M: Resource>(paths: &UiPaths, action: &str, json: &str, error: Option<String>) -> String {
    let title = if action == paths.index(M::NAME) {
        format!("New {}", singular::<M>())
    } else {
        format!("Edit {}", singular::<M>())
    };
    Page::new(title.clone())
        .error(error)
        .heading(&title)
        .json_form(action, json, "Save")
        .link(&paths.index(M::NAME), M::TITLE)
        .render()
}

/// Placeholder sign-in page; sessions are issued elsewhere
pub fn login(paths: &UiPaths) -> String {
    Page::new("Sign in")
        .heading("Sign in")
        .raw("<p>Your session is missing or has expired. Sign in again to continue.</p>\n")
        .link(paths.prefix(), "Home")
        .render()
}

fn singular<M: Resource>() -> String {
    M::TITLE.strip_suffix('s').unwrap_or(M::TITLE).to_lowercase()
}
