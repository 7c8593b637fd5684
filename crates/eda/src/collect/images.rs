//! Image metadata collection: dimensions and EXIF tags.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use exif::{Exif, In, Tag, Value as ExifValue};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::ImagesConfig;
use crate::error::{EdaError, Result};

use super::{find_files, Record};

/// Metadata of one image file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Lowercase, including the dot, e.g. `.jpg`.
    pub file_extension: String,
    /// Configured EXIF keys; `None` when the image does not carry the key.
    pub keys: IndexMap<String, Option<String>>,
}

impl ImageInfo {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl Record for ImageInfo {
    fn to_row(&self) -> IndexMap<String, String> {
        let mut row = IndexMap::new();
        row.insert("path".to_string(), self.path.display().to_string());
        row.insert("width".to_string(), self.width.to_string());
        row.insert("height".to_string(), self.height.to_string());
        row.insert("area".to_string(), self.area().to_string());
        row.insert("file_extension".to_string(), self.file_extension.clone());
        for (key, value) in &self.keys {
            row.insert(key.clone(), value.clone().unwrap_or_default());
        }
        row
    }
}

/// Collect metadata for every configured image type below `root`.
/// Images that cannot be decoded are skipped.
pub fn collect_images(root: &Path, config: &ImagesConfig) -> Vec<ImageInfo> {
    let files = find_files(root, |path| config.matches(path));
    info!(count = files.len(), root = %root.display(), "analyzing image files");

    files
        .into_iter()
        .filter_map(|path| {
            let path = path.canonicalize().unwrap_or(path);
            match get_image_info(&path, config) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!(error = %e, "skipping image");
                    None
                }
            }
        })
        .collect()
}

/// Metadata of a single image.
pub fn get_image_info(path: &Path, config: &ImagesConfig) -> Result<ImageInfo> {
    let (width, height) = image::image_dimensions(path).map_err(|e| EdaError::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let file_extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    let mut keys: IndexMap<String, Option<String>> =
        config.keys.iter().map(|k| (k.clone(), None)).collect();

    for (key, value) in read_exif(path)? {
        if let Some(slot) = keys.get_mut(&key) {
            *slot = Some(value);
        } else if !config.ignore_keys.contains(&key) {
            debug!(key = %key, path = %path.display(), "unknown EXIF key");
        }
    }

    Ok(ImageInfo {
        path: path.to_path_buf(),
        width,
        height,
        file_extension,
        keys,
    })
}

/// EXIF tags of the primary image as display strings, plus `latitude` and
/// `longitude` in decimal degrees when GPS data is present.
///
/// An image without EXIF data yields an empty map.
fn read_exif(path: &Path) -> Result<IndexMap<String, String>> {
    let file = File::open(path).map_err(|e| EdaError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no EXIF data");
            return Ok(IndexMap::new());
        }
    };

    let mut tags: IndexMap<String, String> = exif
        .fields()
        .filter(|field| field.ifd_num == In::PRIMARY)
        .map(|field| {
            (
                field.tag.to_string(),
                field.display_value().with_unit(&exif).to_string(),
            )
        })
        .collect();

    if let Some(latitude) = coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'N') {
        tags.insert("latitude".to_string(), latitude.to_string());
    }
    if let Some(longitude) = coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'E') {
        tags.insert("longitude".to_string(), longitude.to_string());
    }

    Ok(tags)
}

/// Signed decimal degrees for a GPS coordinate and its reference tag.
fn coordinate(exif: &Exif, value_tag: Tag, ref_tag: Tag, positive_ref: u8) -> Option<f64> {
    let value = exif.get_field(value_tag, In::PRIMARY)?;
    let reference = exif.get_field(ref_tag, In::PRIMARY)?;

    let degrees = match &value.value {
        ExifValue::Rational(parts) if parts.len() >= 3 => {
            to_degrees(parts[0].to_f64(), parts[1].to_f64(), parts[2].to_f64())
        }
        _ => return None,
    };
    let sign = match &reference.value {
        ExifValue::Ascii(strings) => match strings.first().and_then(|s| s.first()) {
            Some(r) if *r == positive_ref => 1.0,
            Some(_) => -1.0,
            None => return None,
        },
        _ => return None,
    };

    in_range(sign * degrees)
}

/// Degrees, minutes and seconds to decimal degrees.
pub fn to_degrees(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

fn in_range(value: f64) -> Option<f64> {
    (-180.0..=180.0).contains(&value).then_some(value)
}
