// handlers/resource.rs - session-gated CRUD pages for one resource type
//
// GET  /ui/:resource           index
// GET  /ui/:resource/new       new_form
// POST /ui/:resource           create     (form field json_input)
// GET  /ui/:resource/:id       show
// GET  /ui/:resource/:id/edit  edit_form
// POST /ui/:resource/:id       update     (form field json_input)
//
// Every handler runs behind middleware::require_session, so a Client is always present.

use axum::{
    body::Bytes,
    extract::{Extension, Path, State},
    http::HeaderMap,
    response::Response,
};

use crate::client::Client;
use crate::controller::{decide, decode_form, execute, Execution, Submission, Target, UiPaths};
use crate::model::Resource;
use crate::types::{Action, Outcome};
use crate::view;

const EMPTY_DOCUMENT: &str = "{\n}";

/// GET /ui/:resource
pub async fn index<M: Resource>(
    State(paths): State<UiPaths>,
    Extension(client): Extension<Client>,
) -> Response {
    let target = Target::collection(M::NAME);
    let result = execute::list::<M>(&client).await;
    if let Some(e) = result.error() {
        tracing::warn!(resource = M::NAME, "listing failed: {}", e);
    }

    decide(&paths, Action::List, &target, result.outcome()).respond(|_| {
        let error = result.error().map(ToString::to_string);
        let items = match result {
            Execution::Done(items) => items,
            _ => Vec::new(),
        };
        view::index(&paths, &items, error)
    })
}

/// GET /ui/:resource/new
pub async fn new_form<M: Resource>(State(paths): State<UiPaths>) -> Response {
    let target = Target::collection(M::NAME);
    decide(&paths, Action::New, &target, Outcome::Success)
        .respond(|_| view::form::<M>(&paths, &paths.index(M::NAME), EMPTY_DOCUMENT, None))
}

/// POST /ui/:resource
pub async fn create<M: Resource>(
    State(paths): State<UiPaths>,
    Extension(client): Extension<Client>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = Target::collection(M::NAME);
    let Submission { raw, model } = decode_form::<M>(&headers, &body);
    let raw = raw.unwrap_or_default();

    let model = match model {
        Ok(model) => model,
        Err(e) => {
            tracing::warn!(resource = M::NAME, action = Action::Create.as_str(), "rejected input: {}", e);
            return decide(&paths, Action::Create, &target, Outcome::DecodeError)
                .respond(|path| view::form::<M>(&paths, path, &raw, Some(e.to_string())));
        }
    };

    let result = execute::create(&client, &model).await;
    match result.error() {
        None => tracing::info!(resource = M::NAME, label = %model.label(), "created"),
        Some(e) => tracing::warn!(resource = M::NAME, "create failed: {}", e),
    }

    decide(&paths, Action::Create, &target, result.outcome()).respond(|path| {
        view::form::<M>(&paths, path, &raw, result.error().map(ToString::to_string))
    })
}

/// GET /ui/:resource/:id
pub async fn show<M: Resource>(
    State(paths): State<UiPaths>,
    Extension(client): Extension<Client>,
    Path(id): Path<String>,
) -> Response {
    let target = Target::item(M::NAME, &id);
    let result = execute::get::<M>(&client, &id).await;
    if let Some(e) = result.error() {
        tracing::warn!(resource = M::NAME, id = %id, "fetch failed: {}", e);
    }

    decide(&paths, Action::Show, &target, result.outcome()).respond(|_| {
        view::detail(&paths, &id, result.value(), result.error().map(ToString::to_string))
    })
}

/// GET /ui/:resource/:id/edit
pub async fn edit_form<M: Resource>(
    State(paths): State<UiPaths>,
    Extension(client): Extension<Client>,
    Path(id): Path<String>,
) -> Response {
    let target = Target::item(M::NAME, &id);
    let result = execute::get::<M>(&client, &id).await;
    if let Some(e) = result.error() {
        tracing::warn!(resource = M::NAME, id = %id, "fetch for edit failed: {}", e);
    }

    decide(&paths, Action::Edit, &target, result.outcome()).respond(|_| {
        let json = result
            .value()
            .and_then(|model| serde_json::to_string_pretty(model).ok())
            .unwrap_or_else(|| EMPTY_DOCUMENT.to_string());
        view::form::<M>(&paths, &paths.item(M::NAME, &id), &json, result.error().map(ToString::to_string))
    })
}

/// POST /ui/:resource/:id
pub async fn update<M: Resource>(
    State(paths): State<UiPaths>,
    Extension(client): Extension<Client>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = Target::item(M::NAME, &id);
    let Submission { raw, model } = decode_form::<M>(&headers, &body);
    let raw = raw.unwrap_or_default();

    let model = match model {
        Ok(model) => model,
        Err(e) => {
            tracing::warn!(resource = M::NAME, action = Action::Update.as_str(), id = %id, "rejected input: {}", e);
            return decide(&paths, Action::Update, &target, Outcome::DecodeError)
                .respond(|path| view::form::<M>(&paths, path, &raw, Some(e.to_string())));
        }
    };

    let result = execute::update(&client, &id, &model).await;
    match result.error() {
        None => tracing::info!(resource = M::NAME, id = %id, "updated"),
        Some(e) => tracing::warn!(resource = M::NAME, id = %id, "update failed: {}", e),
    }

    decide(&paths, Action::Update, &target, result.outcome()).respond(|path| {
        view::form::<M>(&paths, path, &raw, result.error().map(ToString::to_string))
    })
}
