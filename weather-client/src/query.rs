use std::fmt;

/// A weather lookup as typed by the user.
///
/// Coordinates keep their textual form so the request carries exactly what
/// was typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Coordinates { lat: String, lon: String },
    Place(String),
}

impl Query {
    /// Classify a raw search string. Returns `None` for empty or blank input.
    ///
    /// `lat,lon` with optionally signed decimals wins over a place name.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let query = match split_coordinates(trimmed) {
            Some((lat, lon)) => Query::Coordinates { lat: lat.to_string(), lon: lon.to_string() },
            None => Query::Place(trimmed.to_string()),
        };

        Some(query)
    }

    /// Query-string parameters for `GET /api/weather`.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Query::Coordinates { lat, lon } => vec![("lat", lat.as_str()), ("lon", lon.as_str())],
            Query::Place(name) => vec![("q", name.as_str())],
        }
    }

    pub fn is_coordinates(&self) -> bool {
        matches!(self, Query::Coordinates { .. })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
            Query::Place(name) => f.write_str(name),
        }
    }
}

fn split_coordinates(input: &str) -> Option<(&str, &str)> {
    let (lat, lon) = input.split_once(',')?;
    let (lat, lon) = (lat.trim(), lon.trim());
    (is_decimal(lat) && is_decimal(lon)).then_some((lat, lon))
}

/// `-?\d+(\.\d+)?`
fn is_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    match unsigned.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => all_digits(unsigned),
    }
}
