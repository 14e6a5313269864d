use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use super::super::AppState;
use super::super::error::ApiError;

pub async fn get_photo(
    Path(file): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let Some(bytes) = state.photos.read(&file).await? else {
        return Err(ApiError::not_found(format!("photo {file} not found")));
    };
    let mime = mime_guess::from_path(&file).first_or_octet_stream();
    Ok((
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        bytes,
    )
        .into_response())
}
