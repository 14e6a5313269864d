use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use std::collections::HashSet;
use tracing::{info, warn};

use super::super::AppState;
use super::super::error::ApiError;
use crate::core::avatars;
use crate::core::photos;
use crate::core::store::{Staff, StaffCreate, StaffUpdate, StoreError, Tristate};

struct Upload {
    bytes: Bytes,
    file_name: Option<String>,
    content_type: Option<String>,
}

impl Upload {
    fn extension(&self) -> String {
        photos::extension_for(self.file_name.as_deref(), self.content_type.as_deref())
    }

    fn mime_type(&self) -> String {
        self.content_type
            .clone()
            .filter(|ct| ct.starts_with("image/"))
            .unwrap_or_else(|| mime_for(&format!("x.{}", self.extension())))
    }
}

#[derive(Default)]
struct StaffForm {
    name: Option<String>,
    department: Option<String>,
    photo: Option<Upload>,
    generate_avatars: bool,
}

fn mime_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "image/png".to_string())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

async fn read_staff_form(mut multipart: Multipart) -> Result<StaffForm, ApiError> {
    let mut form = StaffForm::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "name" => form.name = Some(field.text().await?),
            "department" => form.department = Some(field.text().await?),
            "generate_avatars" => form.generate_avatars = parse_flag(&field.text().await?),
            "photo" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen.
                if !bytes.is_empty() {
                    form.photo = Some(Upload {
                        bytes,
                        file_name,
                        content_type,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Runs the four avatar calls and stores whatever comes back. Returns
/// `(quadrant, filename)` for each stored variant.
async fn generate_variants(
    state: &AppState,
    source: &[u8],
    mime_type: &str,
    staff_name: &str,
) -> Vec<(u8, String)> {
    let Some(generator) = &state.avatars else {
        info!("Avatar generation is not configured; skipping for {}", staff_name);
        return Vec::new();
    };
    let generated =
        avatars::generate_quadrant_avatars(generator.as_ref(), source, mime_type, staff_name)
            .await;

    let mut saved = Vec::new();
    for (quadrant, bytes) in generated.into_quadrants() {
        match state.photos.save(&bytes, "png").await {
            Ok(file) => saved.push((quadrant, file)),
            Err(e) => warn!(
                "Failed to store quadrant {} avatar for {}: {}",
                quadrant, staff_name, e
            ),
        }
    }
    saved
}

/// Drops freshly written files when the record they were meant for was
/// never stored.
async fn discard_on_rejection(state: &AppState, err: &StoreError, files: &[String]) {
    if !matches!(err, StoreError::PersistenceFailure { .. }) {
        state.photos.remove_all(files.iter().map(String::as_str)).await;
    }
}

pub async fn list_staff(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "staff": state.store.list_staff().await }))
}

pub async fn get_staff(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Staff>, ApiError> {
    Ok(Json(state.store.get_staff(id).await?))
}

pub async fn create_staff(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Staff>), ApiError> {
    let form = read_staff_form(multipart).await?;
    let name = form.name.as_deref().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "name is required",
        ));
    }

    let mut payload = StaffCreate::new(name.clone());
    if let Some(department) = form.department.filter(|d| !d.trim().is_empty()) {
        payload.department = Tristate::Set(department);
    }

    let mut written = Vec::new();
    if let Some(upload) = &form.photo {
        let file = state.photos.save(&upload.bytes, &upload.extension()).await?;
        payload.photo = Tristate::Set(file.clone());
        written.push(file);

        if form.generate_avatars {
            let variants =
                generate_variants(&state, &upload.bytes, &upload.mime_type(), &name).await;
            for (quadrant, file) in variants {
                payload.set_quadrant_photo(quadrant, file.clone());
                written.push(file);
            }
        }
    }

    match state.store.create_staff(payload).await {
        Ok(staff) => Ok((StatusCode::CREATED, Json(staff))),
        Err(e) => {
            discard_on_rejection(&state, &e, &written).await;
            Err(e.into())
        }
    }
}

/// Form fields that are not sent keep their current values. A new `photo`
/// replaces the base photo and resets the quadrant variants, which are
/// regenerated when `generate_avatars` is set. `generate_avatars` without a
/// new photo regenerates from the existing base photo.
pub async fn update_staff(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Staff>, ApiError> {
    let existing = state.store.get_staff(id).await?;
    let form = read_staff_form(multipart).await?;

    let mut patch = StaffUpdate::default();
    if let Some(name) = form.name {
        patch.name = Tristate::Set(name.trim().to_string());
    }
    if let Some(department) = form.department {
        patch.department = if department.trim().is_empty() {
            Tristate::Null
        } else {
            Tristate::Set(department)
        };
    }
    let staff_name = patch
        .name
        .as_option()
        .cloned()
        .unwrap_or_else(|| existing.name.clone());

    let mut written = Vec::new();
    if let Some(upload) = &form.photo {
        let file = state.photos.save(&upload.bytes, &upload.extension()).await?;
        patch.photo = Tristate::Set(file.clone());
        written.push(file);
        for quadrant in 1..=4 {
            patch.set_quadrant_photo(quadrant, Tristate::Null);
        }
        if form.generate_avatars {
            let variants =
                generate_variants(&state, &upload.bytes, &upload.mime_type(), &staff_name).await;
            for (quadrant, file) in variants {
                patch.set_quadrant_photo(quadrant, Tristate::Set(file.clone()));
                written.push(file);
            }
        }
    } else if form.generate_avatars {
        match existing.photo.as_option() {
            Some(base) => match state.photos.read(base).await? {
                Some(bytes) => {
                    let variants =
                        generate_variants(&state, &bytes, &mime_for(base), &staff_name).await;
                    for (quadrant, file) in variants {
                        patch.set_quadrant_photo(quadrant, Tristate::Set(file.clone()));
                        written.push(file);
                    }
                }
                None => warn!("Base photo {} for staff {} is missing", base, id),
            },
            None => info!("Staff {} has no base photo to generate avatars from", id),
        }
    }

    let (previous, updated) = match state.store.replace_staff(id, patch).await {
        Ok(pair) => pair,
        Err(e) => {
            discard_on_rejection(&state, &e, &written).await;
            return Err(e.into());
        }
    };

    // Diff against the record this merge replaced, not the copy read above;
    // another update may have landed in between.
    let kept: HashSet<&str> = updated.photo_files().into_iter().collect();
    let stale: Vec<&str> = previous
        .photo_files()
        .into_iter()
        .filter(|f| !kept.contains(f))
        .collect();
    state.photos.remove_all(stale).await;

    Ok(Json(updated))
}

/// Tasks owned by the removed record keep their `owner_id`.
pub async fn delete_staff(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let removed = state.store.delete_staff(id).await?;
    state.photos.remove_all(removed.photo_files()).await;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" ON "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn upload_mime_type_prefers_image_content_type() {
        let upload = Upload {
            bytes: Bytes::from_static(b"x"),
            file_name: Some("me.jpg".into()),
            content_type: Some("application/octet-stream".into()),
        };
        assert_eq!(upload.mime_type(), "image/jpeg");

        let upload = Upload {
            bytes: Bytes::from_static(b"x"),
            file_name: None,
            content_type: Some("image/webp".into()),
        };
        assert_eq!(upload.mime_type(), "image/webp");
    }
}
