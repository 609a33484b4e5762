//! Handlers for `/people` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/people` | Full roster |
//! | `POST` | `/people` | Body: [`NewPersonBody`]; returns 201 + created person |
//! | `GET`  | `/people/:id` | 404 if not found |
//! | `PUT`  | `/people/:id` | Whole-record replace; 404 if not found |
//! | `POST` | `/people/:id/meet` | Increment the meet counter; returns the updated person |
//! | `GET`  | `/people/by-tag/:tag_id` | Scan-match resolution, first match wins |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use meetchain_core::{
  person::{NewPerson, PLACEHOLDER_IMAGE, Person, Relationship},
  roster,
  store::RosterStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Persist the complete in-memory roster to the durable mirror.
async fn persist<S: RosterStore>(state: &ApiState<S>) -> Result<(), ApiError> {
  let snapshot = roster::lock(&state.roster).snapshot();
  state
    .store
    .save(&snapshot)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people`
pub async fn list<S: RosterStore>(
  State(state): State<ApiState<S>>,
) -> Json<Vec<Person>> {
  Json(roster::lock(&state.roster).snapshot())
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /people`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPersonBody {
  pub name:         String,
  pub relationship: Relationship,
  pub image_uri:    Option<String>,
  pub nfc_tag_id:   Option<String>,
  #[serde(default)]
  pub notes:        String,
}

/// `POST /people` — returns 201 + the created [`Person`].
pub async fn create<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewPersonBody>,
) -> Result<impl IntoResponse, ApiError> {
  let name = body.name.trim().to_owned();
  if name.is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }

  let person = Person::new(NewPerson {
    name,
    relationship: body.relationship,
    image_uri: body
      .image_uri
      .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_owned()),
    nfc_tag_id: body.nfc_tag_id,
    notes: body.notes.trim().to_owned(),
  });

  roster::lock(&state.roster).add(person.clone());
  persist(&state).await?;

  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/:id`
pub async fn get_one<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
  roster::lock(&state.roster)
    .get(id)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /people/:id` — whole-record replace.
///
/// The in-memory operation silently ignores unknown ids; the API surfaces
/// that as a 404 so remote callers are not left guessing.
pub async fn update_one<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(person): Json<Person>,
) -> Result<Json<Person>, ApiError> {
  if person.id != id {
    return Err(ApiError::BadRequest(
      "body id does not match the path".into(),
    ));
  }

  {
    let mut roster = roster::lock(&state.roster);
    if roster.get(id).is_none() {
      return Err(ApiError::NotFound(format!("person {id} not found")));
    }
    roster.update(person.clone());
  }
  persist(&state).await?;

  Ok(Json(person))
}

// ─── Meet ─────────────────────────────────────────────────────────────────────

/// `POST /people/:id/meet` — record a meet event and return the updated
/// person.
pub async fn meet_one<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
  let updated = roster::lock(&state.roster)
    .increment_meet_count(id)
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  persist(&state).await?;

  Ok(Json(updated))
}

// ─── By tag ───────────────────────────────────────────────────────────────────

/// `GET /people/by-tag/:tag_id` — resolve a scanned hardware UID the way
/// the scan flow does: first match in roster order.
pub async fn by_tag<S: RosterStore>(
  State(state): State<ApiState<S>>,
  Path(tag_id): Path<String>,
) -> Result<Json<Person>, ApiError> {
  roster::lock(&state.roster)
    .find_by_tag(&tag_id)
    .cloned()
    .map(Json)
    .ok_or_else(|| {
      ApiError::NotFound(format!("no person registered for tag {tag_id}"))
    })
}
