use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::Router;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use vows_core::models::palette::{Palette, UpdatePalette};
use vows_core::models::spark::{Spark, UpdateSpark};
use vows_planner::board::NewSpark;

use crate::error::ApiResult;
use crate::extract::{AuthSession, Json};
use crate::state::AppState;

#[derive(Deserialize)]
struct PaletteBody {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct PalettePatch {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SparkBody {
    image_url: String,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    palette_id: Option<Uuid>,
}

/// Absent `paletteId` leaves the spark where it is; `null` unfiles it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SparkPatch {
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    palette_id: Option<Option<Uuid>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SparkQuery {
    palette_id: Option<Uuid>,
}

async fn create_palette(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(body): Json<PaletteBody>,
) -> ApiResult<(StatusCode, Json<Palette>)> {
    let palette = state
        .board
        .create_palette(session.tenant_id, &body.name, body.description)
        .await?;
    Ok((StatusCode::CREATED, Json(palette)))
}

async fn list_palettes(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> ApiResult<Json<Vec<Palette>>> {
    Ok(Json(state.board.list_palettes(session.tenant_id).await?))
}

async fn update_palette(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(palette_id): Path<Uuid>,
    Json(body): Json<PalettePatch>,
) -> ApiResult<Json<Palette>> {
    let palette = state
        .board
        .update_palette(
            session.tenant_id,
            palette_id,
            UpdatePalette {
                name: body.name,
                description: body.description,
            },
        )
        .await?;
    Ok(Json(palette))
}

async fn delete_palette(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(palette_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .board
        .delete_palette(session.tenant_id, palette_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_spark(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(body): Json<SparkBody>,
) -> ApiResult<(StatusCode, Json<Spark>)> {
    let spark = state
        .board
        .create_spark(
            session.tenant_id,
            NewSpark {
                image_url: body.image_url,
                caption: body.caption,
                source_url: body.source_url,
                tags: body.tags,
                palette_id: body.palette_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(spark)))
}

async fn list_sparks(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Query(query): Query<SparkQuery>,
) -> ApiResult<Json<Vec<Spark>>> {
    let sparks = state
        .board
        .list_sparks(session.tenant_id, query.palette_id)
        .await?;
    Ok(Json(sparks))
}

async fn update_spark(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(spark_id): Path<Uuid>,
    Json(body): Json<SparkPatch>,
) -> ApiResult<Json<Spark>> {
    let spark = state
        .board
        .update_spark(
            session.tenant_id,
            spark_id,
            UpdateSpark {
                caption: body.caption,
                tags: body.tags,
                palette_id: body.palette_id,
            },
        )
        .await?;
    Ok(Json(spark))
}

async fn delete_spark(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(spark_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.board.delete_spark(session.tenant_id, spark_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/palettes", get(list_palettes).post(create_palette))
        .route(
            "/api/palettes/{id}",
            patch(update_palette).delete(delete_palette),
        )
        .route("/api/sparks", get(list_sparks).post(create_spark))
        .route(
            "/api/sparks/{id}",
            patch(update_spark).delete(delete_spark),
        )
}
