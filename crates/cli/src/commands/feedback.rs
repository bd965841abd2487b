//! `dave feedback`: rate an answer from a past conversation.

use dave_core::message::Role;

use super::Context;

pub async fn run(
    session: Option<String>,
    message_id: &str,
    helpful: bool,
    comment: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(session).await?;
    let service = ctx.service();

    let message = service
        .all_conversations()
        .await?
        .into_iter()
        .flat_map(|c| c.messages)
        .find(|m| m.id == message_id)
        .ok_or_else(|| format!("No stored message with id {message_id}"))?;

    if message.role != Role::Assistant {
        return Err(format!("{message_id} is not an answer; only answers can be rated").into());
    }

    let already_rated = service
        .all_feedback()
        .await?
        .iter()
        .any(|f| f.message_id == message_id);
    if already_rated {
        println!("⚠️  {message_id} was already rated");
        return Ok(());
    }

    let record = service.submit_feedback(message_id, helpful, comment).await?;
    println!(
        "✅ Recorded {} feedback for {}",
        if record.was_helpful { "👍" } else { "👎" },
        record.message_id
    );

    Ok(())
}
