use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml with default settings.");
        println!("Set GOOGLE_PLACES_API_KEY and LINE_CHANNEL_ACCESS_TOKEN before serving.");
    } else {
        println!("config.toml already exists, leaving it untouched.");
    }
    Ok(())
}
