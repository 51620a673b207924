use chrono::Utc;
use lambdeploy::{LogViewer, Platform};
use lambdeploy::logs::log_group_name;
use lambdeploy_cloud::InputLogEvent;

use super::Context;

/// Print every event, one line each, until the viewer runs dry.
pub fn show(ctx: &Context) -> anyhow::Result<()> {
    let platform = ctx.platform()?;
    let mut viewer = platform.logs(&ctx.app)?;
    loop {
        let batch = viewer.next_log_batch()?;
        if batch.is_empty() {
            return Ok(());
        }
        for event in batch {
            println!(
                "{} [{}] {}",
                event.timestamp.to_rfc3339(),
                event.partition,
                event.message
            );
        }
    }
}

/// Append `messages` to `stream` in the application's log group.
pub fn emit(ctx: &Context, stream: &str, messages: &[String]) -> anyhow::Result<()> {
    let platform = ctx.platform()?;
    let now = Utc::now().timestamp_millis();
    let events: Vec<InputLogEvent> = messages
        .iter()
        .map(|message| InputLogEvent {
            timestamp: now,
            message: message.clone(),
        })
        .collect();
    platform
        .cloud()
        .put_log_events(&log_group_name(&ctx.app.app), stream, &events)?;
    println!("✓ Wrote {} event(s) to {stream}", events.len());
    Ok(())
}
