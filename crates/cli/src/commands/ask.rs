//! `dave ask`: inspect knowledge scoring without storing anything.

use dave_config::AppConfig;
use dave_knowledge::FALLBACK_MESSAGE;

use super::preview;

pub async fn run(query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let knowledge = dave_gateway::load_knowledge(&config)?;

    println!("🔍 Looking up: \"{query}\"");
    println!();

    let hits = knowledge.search(query);
    if hits.is_empty() {
        println!("   No entry matched. DAVE would answer:");
        println!();
        println!("   {}", preview(FALLBACK_MESSAGE, 100));
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "  {:>2}. [score: {:>3}] #{} {} ({})",
            i + 1,
            hit.score,
            hit.entry.id,
            hit.entry.question,
            hit.entry.category
        );
        println!("      {}", preview(&hit.entry.answer, 90));
    }

    Ok(())
}
