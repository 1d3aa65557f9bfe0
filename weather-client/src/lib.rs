//! Client side of the weather lookup web app.
//!
//! This crate defines:
//! - Configuration handling
//! - The backend's JSON API and an HTTP implementation of it
//! - Shared data models (weather results, searches, saved records)
//! - HTML rendering of each page region
//! - The view-controller that ties user events to requests and renders
//!
//! It is used by `weather-cli`, but the controller only needs a
//! [`Surface`], so other front ends can drive it too.

pub mod api;
pub mod config;
pub mod controller;
pub mod geo;
pub mod model;
pub mod query;
pub mod refresh;
pub mod render;
pub mod surface;

pub use api::{ApiError, WeatherApi, api_from_config, http::HttpApi};
pub use config::ClientConfig;
pub use controller::{Action, UiEvent, ViewController};
pub use geo::{FixedLocator, GeoError, Geolocator, Position};
pub use model::{
    CreatedRecord, CurrentConditions, DailySeries, EntryId, NewRecord, RecordDetail, RecordEntry,
    RecordUpdate, SearchEntry, WeatherResult,
};
pub use query::Query;
pub use refresh::ListKind;
pub use render::TemplateError;
pub use surface::{Field, HtmlPage, Region, Surface};
