use serde::{Deserialize, Serialize};

/// Server-side identifier of a search entry or a record.
pub type EntryId = u64;

/// Weather code as reported by the backend.
///
/// Open-Meteo reports WMO integer codes, MET Norway reports symbol strings
/// such as `clearsky_day`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeatherCode {
    Wmo(i64),
    Symbol(String),
}

/// Response of `GET /api/weather`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub daily: Option<DailySeries>,
}

/// Point-in-time snapshot for a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default, rename = "temperature_2m")]
    pub temperature: Option<f64>,
    #[serde(default, rename = "windspeed_10m")]
    pub windspeed: Option<f64>,
    #[serde(default, rename = "relative_humidity_2m")]
    pub humidity: Option<f64>,
    /// ISO-8601 observation time.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub weather_code: Option<WeatherCode>,
}

/// Parallel per-day sequences. The sequences may differ in length; `time`
/// drives iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default, rename = "temperature_2m_max")]
    pub max_temperature: Vec<Option<f64>>,
    #[serde(default, rename = "temperature_2m_min")]
    pub min_temperature: Vec<Option<f64>>,
    #[serde(default, rename = "wind_speed_10m_max")]
    pub max_windspeed: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<WeatherCode>>,
}

/// One day of a [`DailySeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow<'a> {
    pub date: &'a str,
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_windspeed: Option<f64>,
    pub weather_code: Option<&'a WeatherCode>,
}

impl DailySeries {
    pub fn rows(&self) -> impl Iterator<Item = DailyRow<'_>> + '_ {
        self.time.iter().enumerate().map(move |(i, date)| DailyRow {
            date: date.as_str(),
            max_temperature: self.max_temperature.get(i).copied().flatten(),
            min_temperature: self.min_temperature.get(i).copied().flatten(),
            max_windspeed: self.max_windspeed.get(i).copied().flatten(),
            weather_code: self.weather_code.get(i).and_then(Option::as_ref),
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// A past weather lookup, as listed by `GET /api/searches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub id: EntryId,
    pub query: String,
    pub searched_at: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub weather_code: Option<WeatherCode>,
}

/// A saved date-range record, as listed by `GET /api/records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub id: EntryId,
    pub location_input: String,
    #[serde(default)]
    pub resolved_name: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RecordEntry {
    pub fn display_name(&self) -> &str {
        display_name(self.resolved_name.as_deref(), &self.location_input)
    }
}

/// Cached weather payload stored alongside a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredWeather {
    #[serde(default)]
    pub daily: Option<DailySeries>,
}

/// Response of `GET /api/records/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDetail {
    #[serde(default)]
    pub id: Option<EntryId>,
    pub location_input: String,
    #[serde(default)]
    pub resolved_name: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub weather_json: Option<StoredWeather>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl RecordDetail {
    pub fn display_name(&self) -> &str {
        display_name(self.resolved_name.as_deref(), &self.location_input)
    }

    pub fn daily(&self) -> Option<&DailySeries> {
        self.weather_json.as_ref().and_then(|w| w.daily.as_ref())
    }
}

/// Body of `POST /api/records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub location: String,
    pub start_date: String,
    pub end_date: String,
}

/// Body of `PUT /api/records/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}

/// Response of record creation and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: EntryId,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

fn display_name<'a>(resolved: Option<&'a str>, input: &'a str) -> &'a str {
    match resolved {
        Some(name) if !name.is_empty() => name,
        _ => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_result_tolerates_missing_sections() {
        let parsed: WeatherResult = serde_json::from_str(r#"{"location": "Paris"}"#).unwrap();
        assert_eq!(parsed.location.as_deref(), Some("Paris"));
        assert!(parsed.current.is_none());
        assert!(parsed.daily.is_none());

        let parsed: WeatherResult =
            serde_json::from_str(r#"{"location": "Oslo", "current": null, "daily": null}"#)
                .unwrap();
        assert!(parsed.current.is_none());
    }

    #[test]
    fn current_conditions_use_wire_names() {
        let parsed: CurrentConditions = serde_json::from_str(
            r#"{
                "temperature_2m": 5.5,
                "windspeed_10m": 12.0,
                "relative_humidity_2m": 75,
                "weather_code": "cloudy",
                "time": "2024-01-15T12:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.temperature, Some(5.5));
        assert_eq!(parsed.windspeed, Some(12.0));
        assert_eq!(parsed.humidity, Some(75.0));
        assert_eq!(parsed.weather_code, Some(WeatherCode::Symbol("cloudy".into())));
    }

    #[test]
    fn daily_rows_fill_short_sequences_with_none() {
        let parsed: DailySeries = serde_json::from_str(
            r#"{
                "time": ["2024-01-15", "2024-01-16", "2024-01-17"],
                "temperature_2m_max": [8.0, null],
                "temperature_2m_min": [2.0, 1.0, 3.0],
                "weather_code": [3]
            }"#,
        )
        .unwrap();

        let rows: Vec<_> = parsed.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].max_temperature, Some(8.0));
        assert_eq!(rows[0].weather_code, Some(&WeatherCode::Wmo(3)));
        assert_eq!(rows[1].max_temperature, None);
        assert_eq!(rows[2].max_temperature, None);
        assert_eq!(rows[2].min_temperature, Some(3.0));
        assert_eq!(rows[2].max_windspeed, None);
        assert_eq!(rows[2].weather_code, None);
    }

    #[test]
    fn record_display_name_falls_back_to_input() {
        let mut entry = RecordEntry {
            id: 1,
            location_input: "paris".into(),
            resolved_name: None,
            start_date: "2024-01-01".into(),
            end_date: "2024-01-03".into(),
            created_at: None,
        };
        assert_eq!(entry.display_name(), "paris");

        entry.resolved_name = Some(String::new());
        assert_eq!(entry.display_name(), "paris");

        entry.resolved_name = Some("Paris, France".into());
        assert_eq!(entry.display_name(), "Paris, France");
    }

    #[test]
    fn record_detail_exposes_nested_daily() {
        let detail: RecordDetail = serde_json::from_str(
            r#"{
                "id": 4,
                "location_input": "oslo",
                "resolved_name": "Oslo",
                "start_date": "2024-01-01",
                "end_date": "2024-01-02",
                "weather_json": {"daily": {"time": ["2024-01-01"]}},
                "daily_list": []
            }"#,
        )
        .unwrap();
        assert_eq!(detail.daily().map(DailySeries::len), Some(1));

        let detail: RecordDetail = serde_json::from_str(
            r#"{
                "location_input": "oslo",
                "start_date": "2024-01-01",
                "end_date": "2024-01-02",
                "weather_json": {"error": "upstream timeout"}
            }"#,
        )
        .unwrap();
        assert!(detail.daily().is_none());
    }

    #[test]
    fn record_update_skips_absent_fields() {
        let update = RecordUpdate { end_date: Some("2024-02-01".into()), ..Default::default() };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"end_date": "2024-02-01"}));
        assert!(!update.is_empty());
        assert!(RecordUpdate::default().is_empty());
    }
}
