//! `dave history`: list or clear stored conversations.

use super::{Context, preview};

pub async fn run(
    session: Option<String>,
    all: bool,
    clear: bool,
    confirm: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(session).await?;
    let service = ctx.service();

    if clear {
        if !confirm {
            return Err("Refusing to clear history without --confirm".into());
        }
        let removed = service.clear_history().await?;
        println!("🗑️  Removed {removed} conversation(s) of session {}", ctx.session_id);
        return Ok(());
    }

    let mut conversations: Vec<_> = service
        .all_conversations()
        .await?
        .into_iter()
        .filter(|c| all || c.session_id == ctx.session_id)
        .collect();
    conversations.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));

    println!("💬 Conversations ({})", conversations.len());
    println!("====================");
    if conversations.is_empty() {
        if all {
            println!("   Nothing stored yet.");
        } else {
            println!("   None for session {}. Use --all or --session.", ctx.session_id);
        }
        return Ok(());
    }

    for conv in &conversations {
        println!();
        println!(
            "  {}  [{}]  {} message(s), last active {}",
            conv.id,
            conv.session_id,
            conv.messages.len(),
            conv.last_activity_at.format("%Y-%m-%d %H:%M")
        );
        for msg in &conv.messages {
            println!("    {:<9} {}  {}", msg.role.to_string(), msg.id, preview(&msg.content, 60));
        }
    }

    Ok(())
}
