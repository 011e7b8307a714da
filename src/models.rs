// Data shapes exchanged with the image API: the options a caller builds
// for a request, and the records the service answers with. Response
// records are decoded leniently (missing or null fields fall back to None)
// since the client passes them through without validation.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// MIME types accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Webp,
    Tiff,
    Avif,
}

impl ContentType {
    pub fn mime(self) -> &'static str {
        match self {
            ContentType::Png => "image/png",
            ContentType::Jpeg => "image/jpeg",
            ContentType::Gif => "image/gif",
            ContentType::Bmp => "image/bmp",
            ContentType::Webp => "image/webp",
            ContentType::Tiff => "image/tiff",
            ContentType::Avif => "image/avif",
        }
    }

    /// Guess the content type from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ContentType::Png),
            "jpg" | "jpeg" => Some(ContentType::Jpeg),
            "gif" => Some(ContentType::Gif),
            "bmp" => Some(ContentType::Bmp),
            "webp" => Some(ContentType::Webp),
            "tif" | "tiff" => Some(ContentType::Tiff),
            "avif" => Some(ContentType::Avif),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(ContentType::from_extension)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Who may see an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    Anyone,
    OnlyMe,
}

impl AccessPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessPolicy::Anyone => "anyone",
            AccessPolicy::OnlyMe => "only_me",
        }
    }
}

/// Everything sent alongside the image bytes on upload. `filename` and
/// `content_type` describe the binary part; every other field that is set
/// becomes its own text part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub filename: String,
    pub content_type: ContentType,
    pub access_policy: Option<AccessPolicy>,
    pub meta_data_is_public: Option<bool>,
    pub referer_url: Option<String>,
    pub app: Option<String>,
    pub title: Option<String>,
    pub desc: Option<String>,
    pub created_at: Option<String>,
    pub collection_id: Option<String>,
}

impl UploadOptions {
    pub fn new(filename: impl Into<String>, content_type: ContentType) -> Self {
        UploadOptions {
            filename: filename.into(),
            content_type,
            access_policy: None,
            meta_data_is_public: None,
            referer_url: None,
            app: None,
            title: None,
            desc: None,
            created_at: None,
            collection_id: None,
        }
    }

    /// The optional fields that are set, as form field name/value pairs in
    /// a fixed order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(policy) = self.access_policy {
            fields.push(("access_policy", policy.as_str().to_string()));
        }
        if let Some(public) = self.meta_data_is_public {
            fields.push(("meta_data_is_public", public.to_string()));
        }
        let strings = [
            ("referer_url", &self.referer_url),
            ("app", &self.app),
            ("title", &self.title),
            ("desc", &self.desc),
            ("created_at", &self.created_at),
            ("collection_id", &self.collection_id),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                fields.push((name, value.clone()));
            }
        }
        fields
    }
}

/// Pagination for the image list. Unset fields are left to the server
/// defaults (page 1, 20 per page).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListOptions {
    pub fn new(page: u32, per_page: u32) -> Self {
        ListOptions {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

/// Image format as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Png,
    Jpeg,
    Jpg,
    Gif,
    Bmp,
    Webp,
    Tiff,
    Avif,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrLocale {
    En,
    Ja,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ocr {
    #[serde(default)]
    pub locale: Option<OcrLocale>,
    #[serde(default)]
    pub description: Option<String>,
}

// `#[serde(default)]` only covers a missing key; this also maps `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Answer to a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub image_id: String,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub image_type: Option<ImageType>,
}

/// One entry of the image list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedImage {
    pub image_id: String,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub image_type: Option<ImageType>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ImageMetadata,
    #[serde(default)]
    pub ocr: Option<Ocr>,
}

pub type ListResponse = Vec<ListedImage>;

/// A single image looked up by id. Permalink and thumbnail are null for
/// images the caller may not share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub image_id: String,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub image_type: Option<ImageType>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ImageMetadata,
    #[serde(default)]
    pub ocr: Option<Ocr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub image_id: String,
    #[serde(rename = "type", default)]
    pub image_type: Option<ImageType>,
}
