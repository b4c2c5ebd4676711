//! Meeting and feedback commands.

use std::path::Path;

use meetpulse_core::{Feedback, Meeting};
use serde_json::Value;

use super::{Context, print_json, read_json_file};
use crate::error::ClientResult;

pub async fn list_meetings(ctx: &Context, mine: bool) -> ClientResult<()> {
    let mut meetings = ctx.client.list_meetings().await?;
    if mine {
        let identity = ctx.stored_identity()?;
        meetings.retain(|meeting| meeting.is_owned_by(&identity.id));
    }

    if ctx.json {
        return print_json(&meetings);
    }
    if meetings.is_empty() {
        println!("No meetings.");
    }
    for meeting in &meetings {
        println!("{}", meeting_line(meeting));
    }
    Ok(())
}

pub async fn get_meeting(ctx: &Context, id: &str) -> ClientResult<()> {
    let meeting = ctx.client.get_meeting(id).await?;
    if ctx.json {
        return print_json(&meeting);
    }
    println!("{}", meeting_line(&meeting));
    for (key, value) in &meeting.extra {
        println!("  {key}: {value}");
    }
    Ok(())
}

pub async fn create_meeting(ctx: &Context, file: &Path) -> ClientResult<()> {
    let meeting: Meeting = read_json_file(file)?;
    let created = ctx.client.create_meeting(&meeting).await?;
    if ctx.json {
        return print_json(&created);
    }
    println!("Created meeting {}", created.display_id());
    Ok(())
}

pub async fn list_feedback(ctx: &Context) -> ClientResult<()> {
    let feedback = ctx.client.list_feedback().await?;
    if ctx.json {
        return print_json(&feedback);
    }
    if feedback.is_empty() {
        println!("No feedback.");
    }
    for entry in &feedback {
        let rating = entry
            .rating()
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        println!("{}\t{}", entry.meeting_id, rating);
    }
    Ok(())
}

pub async fn submit_feedback(ctx: &Context, file: &Path) -> ClientResult<()> {
    let feedback: Feedback = read_json_file(file)?;
    let stored = ctx.client.submit_feedback(&feedback).await?;
    if ctx.json {
        return print_json(&stored);
    }
    println!("Feedback saved for meeting {}", stored.meeting_id);
    Ok(())
}

/// One-line summary: id, owner and title when present.
fn meeting_line(meeting: &Meeting) -> String {
    let owner = match meeting.user_id {
        Some(Value::String(ref owner)) => owner.clone(),
        Some(ref other) => other.to_string(),
        None => "-".to_string(),
    };
    let title = meeting
        .extra
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("(untitled)");
    format!("{}\t{}\t{}", meeting.display_id(), owner, title)
}
