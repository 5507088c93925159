use thiserror::Error;

/// Failure surfaced by [`crate::service::MenuService`].
///
/// Read paths return `Store` instead of an empty list, so callers can tell an
/// empty menu from a broken one. Use [`crate::service::or_empty`] to get the
/// empty-on-failure behavior back.
#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Menu store query failed: {0:#}")]
    Store(anyhow::Error),

    #[error("Menu sync failed: {0:#}")]
    Sync(anyhow::Error),

    #[error("Settings store failed: {0:#}")]
    Settings(anyhow::Error),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}
