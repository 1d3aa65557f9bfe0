use serde::Serialize;
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::render::{self, TemplateError};

/// Output areas of the page, keyed by element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Current,
    Forecast,
    Place,
    Searches,
    Records,
}

impl Region {
    pub fn id(&self) -> &'static str {
        match self {
            Region::Current => "current",
            Region::Forecast => "forecast",
            Region::Place => "place",
            Region::Searches => "searches",
            Region::Records => "records",
        }
    }

    pub const fn all() -> &'static [Region] {
        &[Region::Place, Region::Current, Region::Forecast, Region::Searches, Region::Records]
    }
}

/// Form inputs the controller reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Location,
    RecordLocation,
    RecordStart,
    RecordEnd,
}

impl Field {
    pub fn id(&self) -> &'static str {
        match self {
            Field::Location => "location-input",
            Field::RecordLocation => "rec-location",
            Field::RecordStart => "rec-start",
            Field::RecordEnd => "rec-end",
        }
    }
}

/// Where the controller draws.
///
/// Methods take `&self` so one controller can serve overlapping actions;
/// implementations synchronise internally.
pub trait Surface: Send + Sync + Debug {
    /// Replace a region's content with an HTML fragment.
    fn set_html(&self, region: Region, html: String);

    /// Replace a region's content with plain text.
    fn set_text(&self, region: Region, text: String);

    fn field(&self, field: Field) -> String;

    fn set_field(&self, field: Field, value: String);

    /// Blocking notification to the user.
    fn alert(&self, message: &str);
}

#[derive(Debug, Default)]
struct PageState {
    regions: HashMap<Region, String>,
    fields: HashMap<Field, String>,
    alerts: Vec<String>,
}

/// In-memory page. Keeps region HTML, field values and alerts, and renders
/// them into a standalone document with the usual element ids.
#[derive(Debug, Default)]
pub struct HtmlPage {
    state: Mutex<PageState>,
}

impl HtmlPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current HTML of a region, if anything was drawn there.
    pub fn region(&self, region: Region) -> Option<String> {
        self.state().regions.get(&region).cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state().alerts.clone()
    }

    /// Drain pending alerts, oldest first.
    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut self.state().alerts)
    }

    /// The whole page as a standalone document with the usual element ids.
    pub fn render_document(&self) -> Result<String, TemplateError> {
        let state = self.state();
        let region = |r: Region| state.regions.get(&r).map(String::as_str).unwrap_or_default();
        let field = |f: Field| state.fields.get(&f).map(String::as_str).unwrap_or_default();

        render::page(&PageView {
            location: field(Field::Location),
            place: region(Region::Place),
            current: region(Region::Current),
            forecast: region(Region::Forecast),
            searches: region(Region::Searches),
            rec_location: field(Field::RecordLocation),
            rec_start: field(Field::RecordStart),
            rec_end: field(Field::RecordEnd),
            records: region(Region::Records),
        })
    }
}

/// Region HTML is spliced in raw; field values are escaped by the template.
#[derive(Serialize)]
struct PageView<'a> {
    location: &'a str,
    place: &'a str,
    current: &'a str,
    forecast: &'a str,
    searches: &'a str,
    rec_location: &'a str,
    rec_start: &'a str,
    rec_end: &'a str,
    records: &'a str,
}

impl Surface for HtmlPage {
    fn set_html(&self, region: Region, html: String) {
        self.state().regions.insert(region, html);
    }

    fn set_text(&self, region: Region, text: String) {
        self.state().regions.insert(region, tera::escape_html(&text));
    }

    fn field(&self, field: Field) -> String {
        self.state().fields.get(&field).cloned().unwrap_or_default()
    }

    fn set_field(&self, field: Field, value: String) {
        self.state().fields.insert(field, value);
    }

    fn alert(&self, message: &str) {
        self.state().alerts.push(message.to_string());
    }
}
