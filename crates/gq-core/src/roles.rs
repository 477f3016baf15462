//! Column role inference for ad-hoc result sets

use crate::CoreError;

/// Longitude markers, most specific first
const LONGITUDE_MARKERS: [&str; 2] = ["LONGITUD", "LONG"];

/// Latitude markers, most specific first
const LATITUDE_MARKERS: [&str; 2] = ["LATITUD", "LAT"];

/// Which column plays which part in a projected feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    pub longitude: String,
    pub latitude: String,
    pub intensity: String,
}

impl ColumnRoles {
    pub fn new(
        longitude: impl Into<String>,
        latitude: impl Into<String>,
        intensity: impl Into<String>,
    ) -> Self {
        Self {
            longitude: longitude.into(),
            latitude: latitude.into(),
            intensity: intensity.into(),
        }
    }
}

/// Index of the first column, other than `taken`, containing a marker.
///
/// Markers are tried in order; a later marker is only consulted when no
/// column matches an earlier one.
fn find_marked(upper: &[String], markers: &[&str], taken: Option<usize>) -> Option<usize> {
    markers.iter().find_map(|marker| {
        upper
            .iter()
            .enumerate()
            .position(|(i, c)| Some(i) != taken && c.contains(marker))
    })
}

/// Infer longitude, latitude and intensity from exactly three column names.
///
/// Matching is a case-insensitive substring test. The full markers
/// (`LONGITUD`, `LATITUD`) are tried before the short ones (`LONG`, `LAT`),
/// so `LATENCY` never shadows a real latitude column. Within a marker the
/// first matching column wins and a column fills at most one role;
/// longitude is assigned before latitude.
pub fn resolve_roles<S: AsRef<str>>(columns: &[S]) -> Result<ColumnRoles, CoreError> {
    if columns.len() != 3 {
        return Err(CoreError::SchemaShape("need 3 columns".to_string()));
    }

    let upper: Vec<String> = columns.iter().map(|c| c.as_ref().to_uppercase()).collect();

    let longitude = find_marked(&upper, &LONGITUDE_MARKERS, None)
        .ok_or_else(|| CoreError::SchemaShape("no longitude column".to_string()))?;

    let latitude = find_marked(&upper, &LATITUDE_MARKERS, Some(longitude))
        .ok_or_else(|| CoreError::SchemaShape("no latitude column".to_string()))?;

    let intensity = (0..columns.len())
        .find(|&i| i != longitude && i != latitude)
        .ok_or_else(|| CoreError::SchemaShape("invalid data".to_string()))?;

    Ok(ColumnRoles::new(
        columns[longitude].as_ref(),
        columns[latitude].as_ref(),
        columns[intensity].as_ref(),
    ))
}
