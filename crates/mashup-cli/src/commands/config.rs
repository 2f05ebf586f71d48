use anyhow::Result;
use std::path::Path;
use mashup_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load(config_path)?;

    // Never echo the password
    if config.smtp.sender_password.is_some() {
        config.smtp.sender_password = Some("********".to_string());
    }

    println!("mashup configuration\n");
    println!("{}", config.to_toml()?);

    // Show config file locations
    println!("Config file locations (in priority order):");
    if let Some(p) = config_path {
        println!("  1. {} (specified)", p.display());
    }
    if let Some(config_dir) = dirs::config_dir() {
        println!("  2. {}/mashup/config.toml", config_dir.display());
    }
    println!("  3. Environment variables (MASHUP_*, with __ between sections)");
    println!("  4. SENDER_EMAIL, SENDER_PASSWORD, SMTP_SERVER, SMTP_PORT, PORT");

    Ok(())
}
