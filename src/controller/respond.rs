use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::{normalize_prefix, DEFAULT_UI_PREFIX};
use crate::types::{Action, Outcome};

// Characters that cannot appear raw inside one path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URL layout of the UI under its mount prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiPaths {
    prefix: String,
}

impl Default for UiPaths {
    fn default() -> Self {
        Self::new(DEFAULT_UI_PREFIX)
    }
}

impl UiPaths {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn index(&self, resource: &str) -> String {
        format!("{}/{}", self.prefix, resource)
    }

    pub fn new_form(&self, resource: &str) -> String {
        format!("{}/{}/new", self.prefix, resource)
    }

    /// `id` is percent-encoded as a single path segment
    pub fn item(&self, resource: &str, id: &str) -> String {
        format!("{}/{}/{}", self.prefix, resource, utf8_percent_encode(id, SEGMENT))
    }

    pub fn edit_form(&self, resource: &str, id: &str) -> String {
        format!("{}/{}/{}/edit", self.prefix, resource, utf8_percent_encode(id, SEGMENT))
    }

    /// Router pattern for item routes, capturing the id as `:id`
    pub fn item_route(&self, resource: &str) -> String {
        format!("{}/{}/:id", self.prefix, resource)
    }

    pub fn edit_route(&self, resource: &str) -> String {
        format!("{}/{}/:id/edit", self.prefix, resource)
    }

    pub fn login(&self) -> String {
        format!("{}/sessions/new", self.prefix)
    }

    /// The path a request for `action` arrived on
    pub fn request_path(&self, action: Action, target: &Target<'_>) -> String {
        match (action, target.id) {
            (Action::New, _) => self.new_form(target.resource),
            (Action::Edit, Some(id)) => self.edit_form(target.resource, id),
            (Action::Show | Action::Update, Some(id)) => self.item(target.resource, id),
            _ => self.index(target.resource),
        }
    }
}

/// Resource and optional path identifier a request addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'a> {
    pub resource: &'a str,
    pub id: Option<&'a str>,
}

impl<'a> Target<'a> {
    pub fn collection(resource: &'a str) -> Self {
        Self { resource, id: None }
    }

    pub fn item(resource: &'a str, id: &'a str) -> Self {
        Self {
            resource,
            id: Some(id),
        }
    }
}

/// What the UI answers: a See Other redirect, or a page rendered at `path` with `status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Redirect { location: String },
    Render { status: StatusCode, path: String },
}

impl Decision {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Decision::Redirect { .. })
    }

    /// Build the HTTP response; `page` receives the path being rendered and is only
    /// called for renders
    pub fn respond<F>(self, page: F) -> Response
    where
        F: FnOnce(&str) -> String,
    {
        match self {
            Decision::Redirect { location } => Redirect::to(&location).into_response(),
            Decision::Render { status, path } => (status, Html(page(&path))).into_response(),
        }
    }
}

/// Answer for a request without a usable session, whatever it asked for
pub fn unauthenticated(paths: &UiPaths) -> Decision {
    Decision::Redirect {
        location: paths.login(),
    }
}

/// The response routing table.
///
/// Unauthenticated requests always go to the login page. Reads render their own
/// path, with 404 only when the backend reported the entity missing. Writes
/// redirect to the index on success and otherwise re-render the path they were
/// posted to with 200.
pub fn decide(paths: &UiPaths, action: Action, target: &Target<'_>, outcome: Outcome) -> Decision {
    if outcome == Outcome::Unauthenticated {
        return unauthenticated(paths);
    }

    let path = paths.request_path(action, target);

    if action.is_write() {
        return match outcome {
            Outcome::Success => Decision::Redirect {
                location: paths.index(target.resource),
            },
            _ => Decision::Render {
                status: StatusCode::OK,
                path,
            },
        };
    }

    let status = match outcome {
        Outcome::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    Decision::Render { status, path }
}
