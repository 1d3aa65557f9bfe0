use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::{fs, path::PathBuf};
use tracing::{info, warn};
use weather_client::{
    Action, ClientConfig, EntryId, Field, FixedLocator, HtmlPage, Position, RecordUpdate,
    Surface, UiEvent, ViewController, WeatherApi, api_from_config,
};

use crate::configure;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup client")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Web app origin; overrides the configured base_url.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Write the rendered page here instead of stdout.
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set base URL, timeout and home position.
    Configure,

    /// Look up weather for a place name or "lat,lon".
    Search {
        /// Place name or coordinates, e.g. "Paris" or "40.7,-74.0".
        query: String,
    },

    /// Look up weather at the current position.
    Locate {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Recent searches.
    Searches {
        #[command(subcommand)]
        command: SearchesCommand,
    },

    /// Saved date-range records.
    Records {
        #[command(subcommand)]
        command: RecordsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SearchesCommand {
    /// Show the search history.
    List,
    /// Delete one search.
    Delete { id: EntryId },
}

#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// Show saved records.
    List,
    /// Save weather for a location and date range.
    Create(RecordForm),
    /// Show one record's stored days.
    View { id: EntryId },
    /// Change a record's location or dates.
    Update {
        id: EntryId,
        #[command(flatten)]
        changes: RecordChanges,
    },
    /// Delete one record.
    Delete { id: EntryId },
}

#[derive(Debug, Args)]
pub struct RecordForm {
    #[arg(long)]
    pub location: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub end: String,
}

#[derive(Debug, Args)]
pub struct RecordChanges {
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
}

impl From<RecordChanges> for RecordUpdate {
    fn from(c: RecordChanges) -> Self {
        RecordUpdate { location: c.location, start_date: c.start, end_date: c.end }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        if let Command::Configure = self.command {
            return configure::interactive(editable_config(ClientConfig::load_unchecked()));
        }

        let mut config = ClientConfig::load()?;
        if let Some(url) = self.base_url {
            config.set_base_url(url);
        }

        let controller = build_controller(&config, &self.command)?;
        controller.start().await;
        drive(&controller, self.command).await;

        let page = controller.surface();
        let alerts = page.take_alerts();
        for alert in &alerts {
            eprintln!("alert: {alert}");
        }

        let document = page.render_document()?;
        match self.out {
            Some(path) => {
                fs::write(&path, document)
                    .with_context(|| format!("Failed to write page: {}", path.display()))?;
                info!(path = %path.display(), "page written");
            }
            None => print!("{document}"),
        }

        if let Some(first) = alerts.first() {
            bail!("{first}");
        }
        Ok(())
    }
}

/// Starting point for `weather configure`; an unreadable file starts over
/// from defaults.
fn editable_config(loaded: anyhow::Result<ClientConfig>) -> ClientConfig {
    loaded.unwrap_or_else(|err| {
        warn!(error = %err, "ignoring existing config");
        ClientConfig::default()
    })
}

type PageController = ViewController<Box<dyn WeatherApi>, HtmlPage>;

fn build_controller(config: &ClientConfig, command: &Command) -> anyhow::Result<PageController> {
    let controller = ViewController::new(api_from_config(config)?, HtmlPage::new());
    Ok(match locator_for(command, config.home) {
        Some(locator) => controller.with_geolocator(Box::new(locator)),
        None => controller,
    })
}

/// `locate` reports `--lat/--lon` when given, else the configured home.
fn locator_for(command: &Command, home: Option<Position>) -> Option<FixedLocator> {
    let Command::Locate { lat, lon } = command else {
        return None;
    };
    let position = match (lat, lon) {
        (Some(lat), Some(lon)) => Position::new(*lat, *lon),
        _ => home?,
    };
    Some(FixedLocator::new(position))
}

/// Feed a command into the controller as the equivalent page events.
async fn drive<A: WeatherApi>(controller: &ViewController<A, HtmlPage>, command: Command) {
    let page = controller.surface();

    match command {
        Command::Configure => {}
        Command::Search { query } => {
            page.set_field(Field::Location, query);
            controller.handle(UiEvent::SearchSubmitted).await;
        }
        Command::Locate { .. } => controller.handle(UiEvent::LocateClicked).await,
        Command::Searches { command } => match command {
            SearchesCommand::List => controller.handle(UiEvent::RefreshSearchesClicked).await,
            SearchesCommand::Delete { id } => {
                controller.handle(UiEvent::ListClicked(Action::DeleteSearch(id))).await;
            }
        },
        Command::Records { command } => match command {
            RecordsCommand::List => {}
            RecordsCommand::Create(form) => {
                page.set_field(Field::RecordLocation, form.location);
                page.set_field(Field::RecordStart, form.start);
                page.set_field(Field::RecordEnd, form.end);
                controller.handle(UiEvent::RecordSubmitted).await;
            }
            RecordsCommand::View { id } => {
                controller.handle(UiEvent::ListClicked(Action::ViewRecord(id))).await;
            }
            RecordsCommand::Update { id, changes } => {
                controller.update_record(id, &changes.into()).await;
            }
            RecordsCommand::Delete { id } => {
                controller.handle(UiEvent::ListClicked(Action::DeleteRecord(id))).await;
            }
        },
    }
}
