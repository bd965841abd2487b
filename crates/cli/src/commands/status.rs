//! `dave status`: show configuration and what the store holds.

use dave_config::AppConfig;

use super::Context;

pub async fn run(session: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(session).await?;
    let config = &ctx.config;
    let service = ctx.service();

    println!("🤖 DAVE Status");
    println!("==============");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Storage:       {} ({})", config.storage.backend, ctx.store.name());
    if config.storage.backend == "file" {
        println!("  Storage dir:   {}", config.storage.resolved_dir().display());
    }
    println!(
        "  Knowledge:     {} entries ({})",
        ctx.knowledge.entries().len(),
        config
            .knowledge
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "builtin".into())
    );
    println!(
        "  Ponder delay:  {} ms + up to {} ms",
        config.assistant.ponder_base_ms, config.assistant.ponder_jitter_ms
    );
    println!("  Gateway:       {}:{}", config.gateway.host, config.gateway.port);
    println!();

    let conversations = service.all_conversations().await?;
    let feedback = service.all_feedback().await?;
    let patterns = service.all_patterns().await?;
    let helpful = feedback.iter().filter(|f| f.was_helpful).count();
    println!(
        "  Conversations: {} / {}",
        conversations.len(),
        config.limits.max_conversations
    );
    println!(
        "  Feedback:      {} / {} ({} helpful)",
        feedback.len(),
        config.limits.max_feedback,
        helpful
    );
    println!("  Patterns:      {} / {}", patterns.len(), config.limits.max_patterns);

    let keys = ctx.store.keys().await?;
    if !keys.is_empty() {
        println!("  Stored keys:   {}", keys.join(", "));
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, run `dave onboard` first");
    }

    Ok(())
}
