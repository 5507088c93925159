use serde::{Deserialize, Serialize};

use crate::remote::image_url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: String,
}

impl MenuItem {
    /// Full URL of the item's photo on the menu asset host.
    #[must_use]
    pub fn image_url(&self) -> Option<String> {
        self.image.as_deref().map(image_url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image: Option<String>,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuStatus {
    pub items: i64,
    pub categories: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<String>,
    pub signed_in: bool,
}

// --- Profile ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub order_statuses: bool,
    pub password_changes: bool,
    pub special_offers: bool,
    pub newsletter: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    /// Local path or URI of the chosen profile picture.
    pub image: Option<String>,
    pub notifications: NotificationPreferences,
}

impl Profile {
    /// Avatar fallback shown when no picture is set, e.g. "TL" for Tilly Lemon.
    #[must_use]
    pub fn initials(&self) -> String {
        [Some(self.first_name.as_str()), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Onboarding {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
}

/// Onboarding and profile edits both require a first name and an email.
pub fn validate_profile_fields(first_name: &str, email: &str) -> Result<(), String> {
    if first_name.trim().is_empty() {
        return Err("First name must not be empty".to_string());
    }
    if email.trim().is_empty() {
        return Err("Email must not be empty".to_string());
    }
    Ok(())
}

/// Trim text and collapse empty strings to `None`.
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
