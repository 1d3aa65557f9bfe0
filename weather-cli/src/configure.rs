use anyhow::Context;
use inquire::{Confirm, CustomType, Text};
use weather_client::{ClientConfig, Position};

/// Prompt for every setting, starting from `config`, and save the result.
pub fn interactive(mut config: ClientConfig) -> anyhow::Result<()> {
    config.base_url = Text::new("Weather app base URL:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    config.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    config.search_limit = CustomType::<u32>::new("Searches to list:")
        .with_help_message("Esc keeps the server default; the server caps this at 100")
        .prompt_skippable()
        .context("Failed to read search limit")?;

    let set_home = Confirm::new("Set a home position for `weather locate`?")
        .with_default(config.home.is_some())
        .prompt()
        .context("Failed to read answer")?;

    config.home = if set_home {
        let current = config.home.unwrap_or(Position::new(0.0, 0.0));
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_default(current.latitude)
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_default(current.longitude)
            .prompt()
            .context("Failed to read longitude")?;
        Some(Position::new(latitude, longitude))
    } else {
        None
    };

    config.validate()?;
    config.save()?;

    println!("Configuration saved to {}", ClientConfig::config_file_path()?.display());
    Ok(())
}
