mod helpers;
mod menu;
mod profile;

use anyhow::Result;

use crate::menu_client::MenuClient;
use lemon_core::error::MenuError;
use lemon_core::models::MenuItem;
use lemon_core::service::{MenuService, or_empty};

pub(crate) use menu::{cmd_categories, cmd_menu, cmd_refresh, cmd_status};
pub(crate) use profile::{ProfileEdit, cmd_logout, cmd_onboard, cmd_profile_edit, cmd_profile_show};

/// Fill the menu cache if it is empty and return its contents.
///
/// Write failures abort the command; a failed read shows an empty menu.
pub(super) async fn load_menu(svc: &MenuService, client: &MenuClient) -> Result<Vec<MenuItem>> {
    match svc.ensure_menu_populated(client).await {
        Ok(items) => Ok(items),
        Err(e @ MenuError::Store(_)) => Ok(or_empty(Err(e))),
        Err(e) => Err(e.into()),
    }
}
