// Image upload for teaser and story images

use std::path::Path;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, post, web};

use insight_common::{ActionTypes, INSIGHT_RESOURCE, InsightError};

use crate::{
    Secured,
    api::multipart::{self, UploadedFile},
    error::{AppError, FileError},
    model::{
        AppState,
        constants::{IMAGE_CONTENT_TYPES, IMAGE_EXTENSIONS},
        response::UploadResult,
    },
    secured,
};

const GENERIC_CONTENT_TYPE: &str = "application/octet-stream";

fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn image_content_type(content_type: &str) -> Option<&'static str> {
    IMAGE_CONTENT_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(content_type))
        .map(|(_, ext)| *ext)
}

fn unsupported(file: &UploadedFile) -> FileError {
    FileError::UnsupportedType(
        file.content_type
            .clone()
            .or_else(|| file.file_name.clone())
            .unwrap_or_default(),
    )
}

/// Extension the stored file gets.
///
/// A declared content type must be an image type; `application/octet-stream`
/// counts as undeclared. The original extension is kept when it is an
/// accepted image extension; otherwise the content type decides.
fn image_extension(file: &UploadedFile) -> Result<String, FileError> {
    let declared = file
        .content_type
        .as_deref()
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case(GENERIC_CONTENT_TYPE));
    let declared_ext = declared
        .map(|t| image_content_type(t).ok_or_else(|| unsupported(file)))
        .transpose()?;

    if let Some(ext) = file.file_name.as_deref().and_then(file_extension)
        && IMAGE_EXTENSIONS.contains(&ext.as_str())
    {
        return Ok(ext);
    }

    declared_ext
        .map(str::to_string)
        .ok_or_else(|| unsupported(file))
}

async fn store(dir: &Path, extension: &str, bytes: &[u8]) -> anyhow::Result<String> {
    tokio::fs::create_dir_all(dir).await?;

    let file_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);
    tokio::fs::write(dir.join(&file_name), bytes).await?;

    Ok(file_name)
}

#[post("/upload")]
pub async fn upload(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let user = secured!(
        Secured::builder(&req, &data, INSIGHT_RESOURCE)
            .action(ActionTypes::Write)
            .build()
    );

    let file = multipart::read_file(payload, data.configuration.upload_max_file_size())
        .await?
        .filter(|f| !f.bytes.is_empty())
        .ok_or(FileError::Missing)?;

    let extension = image_extension(&file)?;
    let file_name = store(&data.configuration.upload_dir(), &extension, &file.bytes).await?;

    tracing::info!(
        file_name = %file_name,
        size = file.bytes.len(),
        username = %user.username,
        "Image uploaded"
    );

    Ok(HttpResponse::Ok().json(UploadResult {
        url: format!("{}/{}", data.configuration.upload_url_prefix(), file_name),
    }))
}

/// Serve a previously uploaded image from the upload directory
pub async fn serve(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();

    let extension = file_extension(&name);
    let stem_is_uuid = Path::new(&name)
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok());

    let content_type = match extension.as_deref() {
        Some("png") if stem_is_uuid => "image/png",
        Some("jpg" | "jpeg") if stem_is_uuid => "image/jpeg",
        _ => return Err(InsightError::not_found(format!("image {}", name)).into()),
    };

    match tokio::fs::read(data.configuration.upload_dir().join(&name)).await {
        Ok(bytes) => Ok(HttpResponse::Ok().content_type(content_type).body(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(InsightError::not_found(format!("image {}", name)).into())
        }
        Err(e) => Err(anyhow::Error::from(e).into()),
    }
}
