//! `dave onboard`: first-time setup.

use dave_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🤖 DAVE, First-Time Setup");
    println!("=========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    // The file backend creates its directory lazily; make it visible now.
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.storage.backend == "file" {
        let storage_dir = config.storage.resolved_dir();
        if !storage_dir.exists() {
            std::fs::create_dir_all(&storage_dir)?;
            println!("✅ Created storage directory: {}", storage_dir.display());
        }
    }

    println!("\n🎉 Setup complete! Run `dave chat` to start asking.\n");

    Ok(())
}
