//! The page's view-controller.
//!
//! Each user action is a stateless request/render cycle against the
//! [`WeatherApi`]. Primary actions report failures to the user; background
//! list work swallows them and leaves the last good render in place.

use tracing::{debug, error, warn};

use crate::{
    api::WeatherApi,
    geo::Geolocator,
    model::{EntryId, NewRecord, RecordUpdate},
    query::Query,
    refresh::{ListKind, SingleFlight},
    render::{self, TemplateError},
    surface::{Field, Region, Surface},
};

pub const GEO_UNAVAILABLE: &str = "Geolocation is not available";
pub const GEO_FAILED: &str = "Could not determine current position";
pub const LOAD_FAILED: &str = "Load failed";

/// A delegated click inside one of the list containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    DeleteSearch(EntryId),
    DeleteRecord(EntryId),
    ViewRecord(EntryId),
}

impl Action {
    /// Map a button's `data-*` attribute to an action.
    pub fn from_attribute(name: &str, value: &str) -> Option<Self> {
        let id = value.trim().parse().ok()?;
        match name {
            "data-del-search" => Some(Action::DeleteSearch(id)),
            "data-del" => Some(Action::DeleteRecord(id)),
            "data-view" => Some(Action::ViewRecord(id)),
            _ => None,
        }
    }
}

/// Everything the page listens for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SearchSubmitted,
    LocateClicked,
    RefreshSearchesClicked,
    RecordSubmitted,
    ListClicked(Action),
}

#[derive(Debug)]
pub struct ViewController<A, S> {
    api: A,
    surface: S,
    geolocator: Option<Box<dyn Geolocator>>,
    searches_gate: SingleFlight,
    records_gate: SingleFlight,
}

impl<A: WeatherApi, S: Surface> ViewController<A, S> {
    pub fn new(api: A, surface: S) -> Self {
        Self {
            api,
            surface,
            geolocator: None,
            searches_gate: SingleFlight::new(),
            records_gate: SingleFlight::new(),
        }
    }

    pub fn with_geolocator(mut self, geolocator: Box<dyn Geolocator>) -> Self {
        self.geolocator = Some(geolocator);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Initial page load.
    pub async fn start(&self) {
        tokio::join!(self.refresh(ListKind::Searches), self.refresh(ListKind::Records));
    }

    pub async fn handle(&self, event: UiEvent) {
        debug!(?event, "ui event");
        match event {
            UiEvent::SearchSubmitted => {
                let query = self.surface.field(Field::Location);
                self.search(&query).await;
            }
            UiEvent::LocateClicked => self.locate().await,
            UiEvent::RefreshSearchesClicked => self.refresh(ListKind::Searches).await,
            UiEvent::RecordSubmitted => self.create_record().await,
            UiEvent::ListClicked(action) => self.dispatch(action).await,
        }
    }

    pub async fn dispatch(&self, action: Action) {
        match action {
            Action::DeleteSearch(id) => self.delete_search(id).await,
            Action::DeleteRecord(id) => self.delete_record(id).await,
            Action::ViewRecord(id) => self.view_record(id).await,
        }
    }

    /// Replace a region with a rendered fragment; a failed render leaves
    /// the region as it was.
    fn draw(&self, region: Region, html: Result<String, TemplateError>) {
        match html {
            Ok(html) => self.surface.set_html(region, html),
            Err(err) => error!(region = region.id(), error = %err, "rendering failed"),
        }
    }

    /// Look up weather for `input`; blank input does nothing.
    pub async fn search(&self, input: &str) {
        let Some(query) = Query::parse(input) else {
            return;
        };

        match self.api.weather(&query).await {
            Ok(data) => {
                match &data.current {
                    Some(current) => {
                        let place = data.location.clone().unwrap_or_default();
                        self.surface.set_text(Region::Place, place);
                        self.draw(Region::Current, render::current(current));
                    }
                    None => self.draw(Region::Current, render::no_data()),
                }
                self.draw(Region::Forecast, render::forecast(data.daily.as_ref()));
            }
            Err(err) => {
                debug!(%query, error = %err, "weather lookup failed");
                self.draw(Region::Current, render::search_error(&err.to_string()));
                self.surface.set_html(Region::Forecast, String::new());
            }
        }

        self.refresh(ListKind::Searches).await;
    }

    /// Re-render a list from the server. Overlapping calls for the same
    /// list coalesce; failures keep the previous content.
    pub async fn refresh(&self, list: ListKind) {
        match list {
            ListKind::Searches => {
                self.searches_gate.run(|| self.reload_searches()).await;
            }
            ListKind::Records => {
                self.records_gate.run(|| self.reload_records()).await;
            }
        }
    }

    pub async fn load_searches(&self) {
        self.refresh(ListKind::Searches).await;
    }

    pub async fn load_records(&self) {
        self.refresh(ListKind::Records).await;
    }

    async fn reload_searches(&self) {
        match self.api.searches().await {
            Ok(list) => self.draw(Region::Searches, render::searches(&list)),
            Err(err) => warn!(list = %ListKind::Searches, error = %err, "list refresh failed"),
        }
    }

    async fn reload_records(&self) {
        match self.api.records().await {
            Ok(list) => self.draw(Region::Records, render::records(&list)),
            Err(err) => warn!(list = %ListKind::Records, error = %err, "list refresh failed"),
        }
    }

    pub async fn delete_search(&self, id: EntryId) {
        if let Err(err) = self.api.delete_search(id).await {
            warn!(id, error = %err, "deleting search failed");
        }
        self.refresh(ListKind::Searches).await;
    }

    pub async fn delete_record(&self, id: EntryId) {
        if let Err(err) = self.api.delete_record(id).await {
            warn!(id, error = %err, "deleting record failed");
        }
        self.refresh(ListKind::Records).await;
    }

    /// Save the record form. Any empty field aborts without a request.
    pub async fn create_record(&self) {
        let record = NewRecord {
            location: self.surface.field(Field::RecordLocation).trim().to_string(),
            start_date: self.surface.field(Field::RecordStart),
            end_date: self.surface.field(Field::RecordEnd),
        };
        if record.location.is_empty() || record.start_date.is_empty() || record.end_date.is_empty()
        {
            return;
        }

        match self.api.create_record(&record).await {
            Ok(created) => {
                debug!(id = created.id, "record created");
                self.surface.set_field(Field::RecordLocation, String::new());
                self.refresh(ListKind::Records).await;
            }
            Err(err) => self.surface.alert(&err.to_string()),
        }
    }

    pub async fn update_record(&self, id: EntryId, update: &RecordUpdate) {
        if update.is_empty() {
            return;
        }

        match self.api.update_record(id, update).await {
            Ok(_) => self.refresh(ListKind::Records).await,
            Err(err) => self.surface.alert(&err.to_string()),
        }
    }

    /// Show a saved record's range and stored days in the main panels.
    pub async fn view_record(&self, id: EntryId) {
        match self.api.record(id).await {
            Ok(detail) => {
                self.surface.set_text(Region::Place, detail.display_name().to_string());
                self.draw(Region::Current, render::record_range(&detail));
                self.draw(Region::Forecast, render::record_days(detail.daily()));
            }
            Err(err) => {
                debug!(id, error = %err, "loading record failed");
                self.surface.alert(LOAD_FAILED);
            }
        }
    }

    /// Search at the device's position.
    pub async fn locate(&self) {
        let Some(geolocator) = &self.geolocator else {
            self.surface.alert(GEO_UNAVAILABLE);
            return;
        };

        match geolocator.current_position().await {
            Ok(position) => {
                let query = position.to_string();
                self.surface.set_field(Field::Location, query.clone());
                self.search(&query).await;
            }
            Err(err) => {
                debug!(error = %err, "geolocation failed");
                self.surface.alert(GEO_FAILED);
            }
        }
    }
}
