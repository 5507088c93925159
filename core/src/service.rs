use std::future::Future;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::db::Database;
use crate::error::MenuError;
use crate::models::{
    MenuItem, MenuStatus, NewMenuItem, NotificationPreferences, Onboarding, Profile, non_empty,
    validate_profile_fields,
};

const SYNCED_AT_KEY: &str = "menu_synced_at";
const SIGNED_IN_KEY: &str = "signed_in";
const FIRST_NAME_KEY: &str = "first_name";
const LAST_NAME_KEY: &str = "last_name";
const EMAIL_KEY: &str = "email";
const PHONE_NUMBER_KEY: &str = "phone_number";
const PROFILE_IMAGE_KEY: &str = "profile_image";
const NOTIFY_ORDER_STATUSES_KEY: &str = "notify_order_statuses";
const NOTIFY_PASSWORD_CHANGES_KEY: &str = "notify_password_changes";
const NOTIFY_SPECIAL_OFFERS_KEY: &str = "notify_special_offers";
const NOTIFY_NEWSLETTER_KEY: &str = "notify_newsletter";

/// Everything `log_out` wipes. Menu rows and sync metadata survive a log-out.
const PROFILE_KEYS: &[&str] = &[
    FIRST_NAME_KEY,
    LAST_NAME_KEY,
    EMAIL_KEY,
    PHONE_NUMBER_KEY,
    PROFILE_IMAGE_KEY,
    NOTIFY_ORDER_STATUSES_KEY,
    NOTIFY_PASSWORD_CHANGES_KEY,
    NOTIFY_SPECIAL_OFFERS_KEY,
    NOTIFY_NEWSLETTER_KEY,
];

/// Where the menu comes from when the local cache is empty.
///
/// The CLI implements this with reqwest; tests use an in-memory mock.
pub trait MenuSource: Send + Sync {
    fn fetch_menu(&self) -> impl Future<Output = Result<Vec<NewMenuItem>>> + Send;
}

/// Fetch the remote menu, treating any failure as an empty menu.
///
/// There is no retry: the next `ensure_menu_populated` call on an empty store
/// simply tries again.
pub async fn fetch_remote_menu<S: MenuSource>(source: &S) -> Vec<NewMenuItem> {
    match source.fetch_menu().await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "remote menu fetch failed");
            Vec::new()
        }
    }
}

/// Collapse a failed read into an empty list, logging the cause.
pub fn or_empty<T>(result: Result<Vec<T>, MenuError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "menu read failed, showing an empty list");
        Vec::new()
    })
}

pub struct MenuService {
    db: Database,
}

impl MenuService {
    pub fn new(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    #[must_use]
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    // --- Sync ---

    /// Return the cached menu, filling it from `source` first if it is empty.
    ///
    /// A populated cache is never refreshed here; see [`Self::refresh_menu`].
    pub async fn ensure_menu_populated<S: MenuSource>(
        &self,
        source: &S,
    ) -> Result<Vec<MenuItem>, MenuError> {
        let local = self.db.select_all().map_err(MenuError::Store)?;
        if !local.is_empty() {
            tracing::debug!(items = local.len(), "menu cache already populated");
            return Ok(local);
        }

        tracing::info!("menu cache is empty, fetching remote menu");
        let remote = fetch_remote_menu(source).await;
        self.replace_menu(&remote)?;
        self.db.select_all().map_err(MenuError::Store)
    }

    /// Force a full replace from `source`. An empty fetch keeps the current menu.
    pub async fn refresh_menu<S: MenuSource>(
        &self,
        source: &S,
    ) -> Result<Vec<MenuItem>, MenuError> {
        let remote = fetch_remote_menu(source).await;
        if remote.is_empty() {
            tracing::warn!("remote menu was empty, keeping the cached menu");
        } else {
            self.replace_menu(&remote)?;
        }
        self.db.select_all().map_err(MenuError::Store)
    }

    fn replace_menu(&self, items: &[NewMenuItem]) -> Result<(), MenuError> {
        let written = self.db.replace_all(items).map_err(MenuError::Sync)?;
        tracing::info!(items = written, "menu sync complete");
        if written == 0 {
            return Ok(());
        }
        // A failed stamp leaves the committed menu in place.
        if let Err(e) = self.db.set_setting(SYNCED_AT_KEY, &Utc::now().to_rfc3339()) {
            tracing::warn!(error = %format!("{e:#}"), "failed to record menu sync time");
        }
        Ok(())
    }

    pub fn last_synced_at(&self) -> Result<Option<DateTime<Utc>>, MenuError> {
        let raw = self
            .db
            .get_setting(SYNCED_AT_KEY)
            .map_err(MenuError::Settings)?;
        Ok(raw
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|ts| ts.with_timezone(&Utc)))
    }

    // --- Queries ---

    pub fn list_categories(&self) -> Result<Vec<String>, MenuError> {
        self.db
            .select_distinct_categories()
            .map_err(MenuError::Store)
    }

    pub fn list_all(&self) -> Result<Vec<MenuItem>, MenuError> {
        self.db.select_all().map_err(MenuError::Store)
    }

    pub fn search(&self, term: &str, categories: &[String]) -> Result<Vec<MenuItem>, MenuError> {
        self.db
            .select_filtered(categories, term)
            .map_err(MenuError::Store)
    }

    pub fn menu_status(&self) -> Result<MenuStatus, MenuError> {
        let items = self.db.count_menu_items().map_err(MenuError::Store)?;
        let categories = self.list_categories()?.len();
        let synced_at = self.last_synced_at()?.map(|ts| ts.to_rfc3339());
        let signed_in = self.is_signed_in()?;
        Ok(MenuStatus {
            items,
            categories,
            synced_at,
            signed_in,
        })
    }

    // --- Profile ---

    pub fn complete_onboarding(&self, onboarding: &Onboarding) -> Result<Profile, MenuError> {
        validate_profile_fields(&onboarding.first_name, &onboarding.email)
            .map_err(MenuError::InvalidProfile)?;

        self.put(FIRST_NAME_KEY, onboarding.first_name.trim())?;
        self.put_optional(LAST_NAME_KEY, non_empty(onboarding.last_name.clone()))?;
        self.put(EMAIL_KEY, onboarding.email.trim())?;
        self.put(SIGNED_IN_KEY, "true")?;
        tracing::info!("onboarding complete");

        self.load_profile()
    }

    pub fn is_signed_in(&self) -> Result<bool, MenuError> {
        self.flag(SIGNED_IN_KEY)
    }

    pub fn load_profile(&self) -> Result<Profile, MenuError> {
        Ok(Profile {
            first_name: self.get(FIRST_NAME_KEY)?.unwrap_or_default(),
            last_name: self.get(LAST_NAME_KEY)?,
            email: self.get(EMAIL_KEY)?.unwrap_or_default(),
            phone_number: self.get(PHONE_NUMBER_KEY)?,
            image: self.get(PROFILE_IMAGE_KEY)?,
            notifications: NotificationPreferences {
                order_statuses: self.flag(NOTIFY_ORDER_STATUSES_KEY)?,
                password_changes: self.flag(NOTIFY_PASSWORD_CHANGES_KEY)?,
                special_offers: self.flag(NOTIFY_SPECIAL_OFFERS_KEY)?,
                newsletter: self.flag(NOTIFY_NEWSLETTER_KEY)?,
            },
        })
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<(), MenuError> {
        validate_profile_fields(&profile.first_name, &profile.email)
            .map_err(MenuError::InvalidProfile)?;

        self.put(FIRST_NAME_KEY, profile.first_name.trim())?;
        self.put_optional(LAST_NAME_KEY, non_empty(profile.last_name.clone()))?;
        self.put(EMAIL_KEY, profile.email.trim())?;
        self.put_optional(PHONE_NUMBER_KEY, non_empty(profile.phone_number.clone()))?;
        self.put_optional(PROFILE_IMAGE_KEY, non_empty(profile.image.clone()))?;

        let n = &profile.notifications;
        self.put(NOTIFY_ORDER_STATUSES_KEY, bool_str(n.order_statuses))?;
        self.put(NOTIFY_PASSWORD_CHANGES_KEY, bool_str(n.password_changes))?;
        self.put(NOTIFY_SPECIAL_OFFERS_KEY, bool_str(n.special_offers))?;
        self.put(NOTIFY_NEWSLETTER_KEY, bool_str(n.newsletter))?;
        Ok(())
    }

    pub fn log_out(&self) -> Result<(), MenuError> {
        self.db
            .delete_settings(PROFILE_KEYS)
            .map_err(MenuError::Settings)?;
        self.put(SIGNED_IN_KEY, "false")?;
        tracing::info!("signed out, profile cleared");
        Ok(())
    }

    // --- Settings helpers ---

    fn get(&self, key: &str) -> Result<Option<String>, MenuError> {
        self.db.get_setting(key).map_err(MenuError::Settings)
    }

    fn flag(&self, key: &str) -> Result<bool, MenuError> {
        Ok(self.get(key)?.is_some_and(|v| v == "true"))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), MenuError> {
        self.db.set_setting(key, value).map_err(MenuError::Settings)
    }

    fn put_optional(&self, key: &str, value: Option<String>) -> Result<(), MenuError> {
        match value {
            Some(v) => self.put(key, &v),
            None => self
                .db
                .delete_setting(key)
                .map(|_| ())
                .map_err(MenuError::Settings),
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
