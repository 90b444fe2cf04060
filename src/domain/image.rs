use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::domain::device::{DeviceClass, DisplaySize};

/// Envelope returned by the image service's list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListImagesResponse {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    pub result: Option<ListImagesResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListImagesResult {
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub variants: Vec<String>,
    pub meta: ImageMeta,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMeta {
    pub size: PixelSize,
    pub category: String,
    pub capture_event: CaptureEvent,
    pub exif: Exif,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureEvent {
    pub app_name: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Exif {
    #[serde(rename = "DateTimeOriginal")]
    pub date_time_original: String,
}

/// Per-request view model for one listed image.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayItem {
    pub signed_url: String,
    pub display_size: DisplaySize,
    pub device_class: DeviceClass,
    pub category: String,
    pub app_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub global_timestamp: OffsetDateTime,
    #[serde(serialize_with = "serialize_local_timestamp")]
    pub local_timestamp: PrimitiveDateTime,
}

const LOCAL_TIMESTAMP_FORMAT: &[time::format_description::FormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

fn format_local_timestamp(value: PrimitiveDateTime) -> String {
    value
        .format(LOCAL_TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}

fn serialize_local_timestamp<S>(value: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_local_timestamp(*value))
}
