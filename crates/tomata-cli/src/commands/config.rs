//! Configuration commands over the TOML file.
//!
//! These edit the on-disk defaults (first-run timer settings and the
//! backend endpoint). Live engine settings are changed with `timer set`.

use clap::Subcommand;

use tomata_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the whole configuration
    Show,
    /// Get one value by dot-separated key (e.g. timer.work_duration)
    Get { key: String },
    /// Set one value by dot-separated key
    Set { key: String, value: String },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => println!("unknown key: {key}"),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}
