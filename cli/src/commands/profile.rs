use anyhow::Result;
use clap::Args;
use std::process;

use lemon_core::models::{Onboarding, Profile};
use lemon_core::service::MenuService;

use super::helpers::{json_error, print_profile};

#[derive(Args, Debug, Default)]
pub(crate) struct ProfileEdit {
    /// New first name
    #[arg(long)]
    pub first_name: Option<String>,
    /// New last name (empty string clears it)
    #[arg(long)]
    pub last_name: Option<String>,
    /// New email address
    #[arg(long)]
    pub email: Option<String>,
    /// Phone number (empty string clears it)
    #[arg(long)]
    pub phone: Option<String>,
    /// Path or URI of a profile picture
    #[arg(long, conflicts_with = "remove_image")]
    pub image: Option<String>,
    /// Remove the profile picture
    #[arg(long)]
    pub remove_image: bool,
    /// Email me about order statuses (true/false)
    #[arg(long)]
    pub order_statuses: Option<bool>,
    /// Email me about password changes (true/false)
    #[arg(long)]
    pub password_changes: Option<bool>,
    /// Email me special offers (true/false)
    #[arg(long)]
    pub special_offers: Option<bool>,
    /// Email me the newsletter (true/false)
    #[arg(long)]
    pub newsletter: Option<bool>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ProfileEdit {
    /// Apply the requested changes on top of `profile`; untouched fields keep their value.
    fn apply(&self, mut profile: Profile) -> Profile {
        if let Some(first_name) = &self.first_name {
            profile.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &self.last_name {
            profile.last_name = Some(last_name.clone());
        }
        if let Some(email) = &self.email {
            profile.email.clone_from(email);
        }
        if let Some(phone) = &self.phone {
            profile.phone_number = Some(phone.clone());
        }
        if self.remove_image {
            profile.image = None;
        } else if let Some(image) = &self.image {
            profile.image = Some(image.clone());
        }

        let n = &mut profile.notifications;
        n.order_statuses = self.order_statuses.unwrap_or(n.order_statuses);
        n.password_changes = self.password_changes.unwrap_or(n.password_changes);
        n.special_offers = self.special_offers.unwrap_or(n.special_offers);
        n.newsletter = self.newsletter.unwrap_or(n.newsletter);
        profile
    }
}

fn require_signed_in(svc: &MenuService, json: bool) -> Result<()> {
    if !svc.is_signed_in()? {
        if json {
            println!("{}", json_error("Not signed in"));
        } else {
            eprintln!("Not signed in. Run `lemon onboard` first.");
        }
        process::exit(2);
    }
    Ok(())
}

pub(crate) fn cmd_onboard(
    svc: &MenuService,
    first_name: &str,
    last_name: Option<String>,
    email: &str,
    json: bool,
) -> Result<()> {
    let profile = svc.complete_onboarding(&Onboarding {
        first_name: first_name.to_string(),
        last_name,
        email: email.to_string(),
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        let name = &profile.first_name;
        println!("Welcome to Little Lemon, {name}!");
    }

    Ok(())
}

pub(crate) fn cmd_profile_show(svc: &MenuService, json: bool) -> Result<()> {
    require_signed_in(svc, json)?;
    let profile = svc.load_profile()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile);
    }

    Ok(())
}

pub(crate) fn cmd_profile_edit(svc: &MenuService, edit: &ProfileEdit) -> Result<()> {
    require_signed_in(svc, edit.json)?;
    let profile = edit.apply(svc.load_profile()?);
    svc.save_profile(&profile)?;
    let saved = svc.load_profile()?;

    if edit.json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        println!("Changes have been saved");
        print_profile(&saved);
    }

    Ok(())
}

pub(crate) fn cmd_logout(svc: &MenuService, json: bool) -> Result<()> {
    svc.log_out()?;

    if json {
        println!("{}", serde_json::json!({ "signed_in": false }));
    } else {
        println!("Signed out");
    }

    Ok(())
}
