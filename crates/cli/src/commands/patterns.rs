//! `dave patterns`: the questions asked most often.

use super::Context;

pub async fn run(limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(None).await?;
    let patterns = ctx.service().top_patterns(limit).await?;

    println!("📈 Top questions");
    println!("================");
    if patterns.is_empty() {
        println!("   No questions recorded yet.");
        return Ok(());
    }

    for (i, p) in patterns.iter().enumerate() {
        println!(
            "  {:>2}. ({:>3}×) {}  [last {}]",
            i + 1,
            p.frequency,
            p.pattern,
            p.last_seen.format("%Y-%m-%d")
        );
    }

    Ok(())
}
