use anyhow::{anyhow, Context, Result};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::app::signing::UrlSigner;
use crate::domain::device::DeviceClass;
use crate::domain::image::{DisplayItem, ImageRecord};
use crate::infra::images_api::ImagesApi;

type Format = &'static [time::format_description::FormatItem<'static>];

const EXIF_TIMESTAMP_FORMAT: Format =
    time::macros::format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

// Capture timestamps may use a space separator and may omit the offset.
const CAPTURE_OFFSET_SPACE_FORMAT: Format = time::macros::format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
);
const CAPTURE_NAIVE_FORMATS: [Format; 2] = [
    time::macros::format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
    time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"),
];
const CAPTURE_DATE_FORMAT: Format = time::macros::format_description!("[year]-[month]-[day]");

#[derive(Clone)]
pub struct GalleryService {
    images: ImagesApi,
    signer: UrlSigner,
}

impl GalleryService {
    pub fn new(images: ImagesApi, signer: UrlSigner) -> Self {
        Self { images, signer }
    }

    /// Single request to the image service; no pagination, no retry.
    pub async fn fetch(&self) -> Result<Vec<ImageRecord>> {
        self.images.list_images().await
    }

    /// Builds display items, keeping only `screen` when given.
    ///
    /// Any record that cannot be mapped fails the whole listing, including
    /// records the filter would have dropped.
    pub fn assemble(&self, records: &[ImageRecord], screen: Option<&str>) -> Result<Vec<DisplayItem>> {
        let now = OffsetDateTime::now_utc();
        let items = display_items(records, &self.signer, now, screen).collect::<Result<Vec<_>>>()?;

        tracing::info!(
            total = records.len(),
            count = items.len(),
            screen = screen.unwrap_or("all"),
            "assembled image listing"
        );
        Ok(items)
    }
}

pub fn display_items<'a>(
    records: &'a [ImageRecord],
    signer: &'a UrlSigner,
    now: OffsetDateTime,
    screen: Option<&'a str>,
) -> impl Iterator<Item = Result<DisplayItem>> + 'a {
    records
        .iter()
        .map(move |record| display_item(record, signer, now))
        .filter(move |item| match (item, screen) {
            (Ok(item), Some(screen)) => item.device_class.label() == screen,
            _ => true,
        })
}

pub fn display_item(record: &ImageRecord, signer: &UrlSigner, now: OffsetDateTime) -> Result<DisplayItem> {
    build_display_item(record, signer, now)
        .with_context(|| format!("failed to map image {}", record.id))
}

fn build_display_item(record: &ImageRecord, signer: &UrlSigner, now: OffsetDateTime) -> Result<DisplayItem> {
    let meta = &record.meta;
    let device_class = DeviceClass::from_pixel_size(meta.size.width, meta.size.height)?;
    let variant_url = select_variant(&record.variants, device_class.label())?;

    Ok(DisplayItem {
        signed_url: signer.sign(variant_url, now)?,
        display_size: device_class.display_size(),
        device_class,
        category: meta.category.clone(),
        app_name: meta.capture_event.app_name.clone(),
        global_timestamp: parse_capture_timestamp(&meta.capture_event.timestamp)?,
        local_timestamp: parse_exif_timestamp(&meta.exif.date_time_original)?,
    })
}

/// Picks the variant whose last path segment is exactly `name`.
pub fn select_variant<'a>(variants: &'a [String], name: &str) -> Result<&'a str> {
    variants
        .iter()
        .map(String::as_str)
        .find(|url| url.rsplit('/').next() == Some(name))
        .ok_or_else(|| anyhow!("no variant named '{}'", name))
}

/// Parses an ISO 8601 capture timestamp into UTC. Values without an offset are taken as UTC.
pub fn parse_capture_timestamp(value: &str) -> Result<OffsetDateTime> {
    let with_offset = OffsetDateTime::parse(value, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(value, CAPTURE_OFFSET_SPACE_FORMAT));
    if let Ok(ts) = with_offset {
        return Ok(ts.to_offset(UtcOffset::UTC));
    }

    CAPTURE_NAIVE_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(value, *format).ok())
        .or_else(|| {
            Date::parse(value, CAPTURE_DATE_FORMAT)
                .ok()
                .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
        })
        .map(PrimitiveDateTime::assume_utc)
        .ok_or_else(|| anyhow!("invalid capture timestamp '{}'", value))
}

pub fn parse_exif_timestamp(value: &str) -> Result<PrimitiveDateTime> {
    PrimitiveDateTime::parse(value, EXIF_TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid exif DateTimeOriginal '{}'", value))
}
