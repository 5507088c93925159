use anyhow::Result;
use serde::Serialize;
use std::process;

use crate::menu_client::MenuClient;
use lemon_core::service::{MenuService, or_empty};

use super::helpers::{capitalize, print_menu_table};
use super::load_menu;

pub(crate) async fn cmd_menu(
    svc: &MenuService,
    client: &MenuClient,
    search: Option<&str>,
    categories: &[String],
    json: bool,
) -> Result<()> {
    let populated = load_menu(svc, client).await?;

    let term = search.unwrap_or_default();
    let items = if term.is_empty() && categories.is_empty() {
        populated
    } else {
        or_empty(svc.search(term, categories))
    };

    if items.is_empty() {
        if json {
            println!("[]");
        } else if populated_is_empty(svc) {
            eprintln!("The menu is not available yet. Check your connection and try again.");
        } else {
            eprintln!("No menu items match your filters");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print_menu_table(&items);
    }

    Ok(())
}

fn populated_is_empty(svc: &MenuService) -> bool {
    or_empty(svc.list_all()).is_empty()
}

pub(crate) async fn cmd_categories(
    svc: &MenuService,
    client: &MenuClient,
    json: bool,
) -> Result<()> {
    load_menu(svc, client).await?;
    let categories = or_empty(svc.list_categories());

    if categories.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No categories found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        for category in &categories {
            println!("{}", capitalize(category));
        }
    }

    Ok(())
}

pub(crate) async fn cmd_refresh(svc: &MenuService, client: &MenuClient, json: bool) -> Result<()> {
    #[derive(Serialize)]
    struct RefreshResult {
        refreshed: bool,
        items: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        synced_at: Option<String>,
    }

    let before = svc.last_synced_at()?;
    let items = svc.refresh_menu(client).await?;
    let after = svc.last_synced_at()?;
    let refreshed = after.is_some() && after != before;

    if json {
        let result = RefreshResult {
            refreshed,
            items: items.len(),
            synced_at: after.map(|ts| ts.to_rfc3339()),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if refreshed {
        let count = items.len();
        println!("Menu refreshed: {count} items");
    } else {
        let count = items.len();
        eprintln!("Remote menu unavailable; kept {count} cached items");
    }

    Ok(())
}

pub(crate) fn cmd_status(svc: &MenuService, json: bool) -> Result<()> {
    let status = svc.menu_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let items = status.items;
        let categories = status.categories;
        println!("Menu items:  {items}");
        println!("Categories:  {categories}");
        println!(
            "Last synced: {}",
            status.synced_at.as_deref().unwrap_or("never")
        );
        println!(
            "Signed in:   {}",
            if status.signed_in { "yes" } else { "no" }
        );
    }

    Ok(())
}
