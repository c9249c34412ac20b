//! Asset records as stored in the live collection

use serde::{Deserialize, Serialize};

/// Placeholder shown on cards without a usable thumbnail
pub const THUMBNAIL_PLACEHOLDER: &str = "No Visualization";

/// One catalog entry.
///
/// The `id` is the store-assigned collection key; it is never part of the
/// stored body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub model_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "public_id", default)]
    pub public_id: String,
    #[serde(default)]
    pub delete_token: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

impl AssetRecord {
    /// Attach the collection key to a decoded body
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Thumbnail state for display
    pub fn thumbnail(&self) -> Thumbnail {
        Thumbnail::from_url(self.thumbnail_url.as_deref())
    }

    /// Trailing characters of the public id, as shown on cards
    pub fn short_ref(&self, len: usize) -> &str {
        tail_chars(&self.public_id, len)
    }

    /// Suggested file name for downloading the raw model
    pub fn download_file_name(&self) -> String {
        let slug = slugify(&self.name);
        if slug.is_empty() {
            "model.glb".to_string()
        } else {
            format!("{slug}.glb")
        }
    }
}

/// Body written when the admin flow adds a record.
///
/// `created_at` is left to the backend: the Firebase store substitutes the
/// server timestamp, the in-memory store uses the local clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssetRecord {
    pub name: String,
    pub model_url: String,
    pub thumbnail_url: Option<String>,
    pub public_id: String,
    pub delete_token: Option<String>,
}

impl NewAssetRecord {
    /// Materialize a full record once the backend assigned key and timestamp
    pub fn into_record(self, id: impl Into<String>, created_at: i64) -> AssetRecord {
        AssetRecord {
            id: id.into(),
            name: self.name,
            model_url: self.model_url,
            thumbnail_url: self.thumbnail_url,
            public_id: self.public_id,
            delete_token: self.delete_token,
            created_at,
        }
    }
}

/// What a card shows in its image slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Thumbnail {
    Image(String),
    Placeholder,
}

impl Thumbnail {
    /// Empty or missing URLs degrade to the placeholder
    pub fn from_url(url: Option<&str>) -> Self {
        match url.map(str::trim) {
            Some(u) if !u.is_empty() => Thumbnail::Image(u.to_string()),
            _ => Thumbnail::Placeholder,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Thumbnail::Image(url) => Some(url),
            Thumbnail::Placeholder => None,
        }
    }
}

fn tail_chars(s: &str, len: usize) -> &str {
    let count = s.chars().count();
    if count <= len {
        return s;
    }
    let skip = count - len;
    let start = s.char_indices().nth(skip).map_or(0, |(i, _)| i);
    &s[start..]
}

/// Lowercase ASCII alphanumerics joined by single dashes
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> AssetRecord {
        AssetRecord {
            id: "-NxKey".to_string(),
            name: "Chronos Edition".to_string(),
            model_url: "https://cdn.example/chronos.glb".to_string(),
            thumbnail_url: None,
            public_id: "portfolio/abcdefghijkl".to_string(),
            delete_token: None,
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_wire_format_field_names() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["modelUrl"], "https://cdn.example/chronos.glb");
        assert_eq!(json["public_id"], "portfolio/abcdefghijkl");
        assert_eq!(json["createdAt"], 1_700_000_000_000_i64);
        assert!(json["thumbnailUrl"].is_null());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_decode_with_nulls() {
        let body = r#"{"name":"Orb","modelUrl":"u","thumbnailUrl":null,"public_id":"p","deleteToken":null,"createdAt":5}"#;
        let decoded: AssetRecord = serde_json::from_str(body).unwrap();
        let decoded = decoded.with_id("k1");
        assert_eq!(decoded.id, "k1");
        assert_eq!(decoded.thumbnail(), Thumbnail::Placeholder);
    }

    #[test]
    fn test_empty_thumbnail_is_placeholder() {
        assert_eq!(Thumbnail::from_url(Some("  ")), Thumbnail::Placeholder);
        assert_eq!(
            Thumbnail::from_url(Some("https://img")),
            Thumbnail::Image("https://img".to_string())
        );
    }

    #[test]
    fn test_short_ref() {
        let r = record();
        assert_eq!(r.short_ref(8), "efghijkl");
        assert_eq!(r.short_ref(100), "portfolio/abcdefghijkl");
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(record().download_file_name(), "chronos-edition.glb");
        let mut unnamed = record();
        unnamed.name = "***".to_string();
        assert_eq!(unnamed.download_file_name(), "model.glb");
    }
}
