use crate::core::report::ReportError;
use actix_multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;

/// Multipart field carrying the report file
const FILE_FIELD: &str = "file";
/// Optional multipart field overriding the batch target ACOS
const TARGET_FIELD: &str = "target_acos";
/// Upper bound for any non file field
const FORM_VALUE_LIMIT: usize = 1024;

/// Fields pulled out of an upload form
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub filename: String,
    pub bytes: Bytes,
    pub target_acos: Option<f64>,
}

/// Streams the multipart body into memory. The file may not exceed
/// `max_bytes`; the first `file` part wins and unknown parts are skipped.
pub async fn read_upload(mut payload: Multipart, max_bytes: usize) -> Result<UploadForm, ReportError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut target_acos = None;

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| ReportError::Multipart(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            FILE_FIELD if file.is_none() => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();

                let bytes = read_field(&mut field, max_bytes).await?;
                file = Some((filename, bytes));
            }
            TARGET_FIELD => {
                let raw = read_field(&mut field, FORM_VALUE_LIMIT)
                    .await
                    .map_err(|_| ReportError::InvalidTargetAcos("<oversized>".into()))?;

                target_acos = parse_target_acos(&String::from_utf8_lossy(&raw))?;
            }
            _ => {
                read_field(&mut field, max_bytes).await?;
            }
        }
    }

    let (filename, bytes) = file.ok_or(ReportError::NoFilePart)?;

    if filename.trim().is_empty() {
        return Err(ReportError::NoSelectedFile);
    }

    Ok(UploadForm {
        filename,
        bytes,
        target_acos,
    })
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Bytes, ReportError> {
    let mut buf = BytesMut::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| ReportError::Multipart(e.to_string()))?;

        if buf.len() + chunk.len() > limit {
            return Err(ReportError::TooLarge { limit });
        }

        buf.extend_from_slice(&chunk);
    }

    Ok(buf.freeze())
}

/// Blank means "use the default". Otherwise a finite, non negative number,
/// optionally written with a trailing `%`.
pub fn parse_target_acos(raw: &str) -> Result<Option<f64>, ReportError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.trim_end_matches('%').trim().parse::<f64>() {
        Ok(target) if target.is_finite() && target >= 0.0 => Ok(Some(target)),
        _ => Err(ReportError::InvalidTargetAcos(raw.to_string())),
    }
}
