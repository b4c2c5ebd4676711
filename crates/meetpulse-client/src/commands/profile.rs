//! Profile commands.

use std::path::Path;

use meetpulse_core::Profile;

use super::{Context, print_json, read_json_file};
use crate::error::ClientResult;

/// Shows the profile for `email`, or for the signed-in user.
pub async fn show(ctx: &Context, email: Option<String>) -> ClientResult<()> {
    let email = match email {
        Some(email) => email,
        None => ctx.stored_identity()?.email,
    };

    let profile = ctx.session_store().fetch_profile(&email).await;
    match profile {
        Some(profile) if ctx.json => print_json(&profile),
        Some(profile) => {
            print_profile(&profile);
            Ok(())
        }
        None if ctx.json => print_json(&serde_json::Value::Null),
        None => {
            println!("No profile found for {email}.");
            Ok(())
        }
    }
}

/// Creates or updates a profile from a JSON file.
pub async fn update(ctx: &Context, file: &Path) -> ClientResult<()> {
    let profile: Profile = read_json_file(file)?;
    let stored = ctx.session_store().update_profile(&profile).await?;

    if ctx.json {
        return print_json(&stored);
    }
    println!("Profile saved.");
    print_profile(&stored);
    Ok(())
}

fn print_profile(profile: &Profile) {
    println!("{}", profile.name().unwrap_or(&profile.email));
    println!("  email: {}", profile.email);
    for (key, value) in &profile.extra {
        match value.as_str() {
            Some(text) => println!("  {key}: {text}"),
            None => println!("  {key}: {value}"),
        }
    }
}
