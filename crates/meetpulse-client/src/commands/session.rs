//! Sign-in commands.

use std::path::PathBuf;

use meetpulse_core::{CredentialResponse, SessionState};
use tokio::io::AsyncReadExt;
use tracing::debug;

use super::{Context, print_json, read_json_file};
use crate::error::{ClientError, ClientResult};

/// Signs in with a token argument, a callback payload file, or a token on
/// stdin.
pub async fn login(
    ctx: &Context,
    token: Option<String>,
    response_file: Option<PathBuf>,
) -> ClientResult<()> {
    let store = ctx.session_store();

    let signed_in = match (token, response_file) {
        (Some(token), _) => store.login_with_google(token.trim()).await,
        (None, Some(path)) => {
            let response: CredentialResponse = read_json_file(&path)?;
            debug!(select_by = ?response.select_by, "read sign-in response");
            store.login_with_response(&response).await
        }
        (None, None) => {
            let mut token = String::new();
            tokio::io::stdin().read_to_string(&mut token).await?;
            store.login_with_google(token.trim()).await
        }
    };

    if !signed_in {
        return Err(ClientError::LoginFailed);
    }

    let state = store.snapshot();
    if ctx.json {
        return print_json(&state);
    }
    print_state(&state);
    Ok(())
}

pub fn logout(ctx: &Context) -> ClientResult<()> {
    ctx.session_store().logout()?;
    if !ctx.json {
        println!("Signed out.");
    }
    Ok(())
}

/// Restores the stored session and shows who is signed in.
pub async fn whoami(ctx: &Context) -> ClientResult<()> {
    let store = ctx.session_store();
    store.initialize().await;

    let state = store.snapshot();
    debug!(phase = state.phase.as_str(), "session restored");
    if ctx.json {
        return print_json(&state);
    }
    print_state(&state);
    Ok(())
}

fn print_state(state: &SessionState) {
    match state.identity {
        Some(ref identity) => {
            println!("Signed in as {} <{}>", identity.name, identity.email);
            println!("  id:      {}", identity.id);
            println!("  role:    {}", identity.role);
            println!("  session: {}", state.phase.as_str());
            if let Some(ref avatar) = identity.avatar {
                println!("  avatar:  {avatar}");
            }
            println!(
                "  profile: {}",
                if state.profile_complete { "complete" } else { "incomplete" }
            );
        }
        None => println!("Not signed in."),
    }
}
