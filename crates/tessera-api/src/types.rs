// Wire types for the backend REST API.
//
// The backend is a Laravel application: single resources arrive wrapped in
// `{ "data": ..., "message": ... }`, collections in the standard paginator
// envelope `{ "data": [...], "links": {...}, "meta": {...} }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Envelopes ────────────────────────────────────────────────────────

/// Single-resource envelope: `{ data, message }`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    #[allow(dead_code)]
    pub message: Option<String>,
}

/// Bare `{ message }` response (deletes, toggles without a resource body).
#[derive(Debug, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Laravel paginator envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub links: PageLinks,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub from: Option<u64>,
    pub last_page: u32,
    pub per_page: u32,
    pub to: Option<u64>,
    pub total: u64,
}

/// Query parameters shared by the paginated list endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

// ── Digital cards ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalCard {
    pub id: u64,
    pub user_id: u64,
    pub personal_info: Option<PersonalInfo>,
    pub contact_info: Option<ContactInfo>,
    pub about_info: Option<AboutInfo>,
    pub is_active: bool,
    pub is_public: bool,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DigitalCard {
    /// Display name for messages and table output: the personal-info name
    /// when present, otherwise the slug.
    pub fn display_name(&self) -> &str {
        self.personal_info
            .as_ref()
            .map_or(self.slug.as_str(), |info| info.name.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub id: u64,
    pub digital_card_id: u64,
    pub name: String,
    pub title: Option<String>,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: u64,
    pub digital_card_id: u64,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub github: Option<String>,
    pub youtube: Option<String>,
    pub tiktok: Option<String>,
    pub whatsapp: Option<String>,
    pub facebook: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutInfo {
    pub id: u64,
    pub digital_card_id: u64,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for a card.
///
/// The backend expects the camelCase `personalInfo` key; the nested section
/// keys (`contact`, `about`) are snake-free one-worders. All sections are
/// optional on update; create requires at least `personalInfo.name`
/// (enforced server-side as a 422).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardPayload {
    #[serde(rename = "personalInfo", skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfoPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<AboutPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfoPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AboutPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
}

/// Payload for the status-toggle endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusToggle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUpload {
    pub message: String,
    pub image_url: String,
    pub full_url: String,
}

// ── Banners ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub id: u64,
    pub title: String,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub position: u32,
    pub is_active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
}

// ── Users & account ──────────────────────────────────────────────────

/// Backend roles. The wire values are the backend's Spanish identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "administrador")]
    Administrator,
    #[serde(rename = "autor")]
    Author,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Administrator => f.write_str("administrator"),
            Self::Author => f.write_str("author"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
