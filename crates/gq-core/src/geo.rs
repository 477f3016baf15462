//! GeoJSON projection of result tables

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use indexmap::IndexMap;
use tracing::debug;

use crate::roles::{resolve_roles, ColumnRoles};
use crate::table::ResultTable;
use crate::value::{is_valid, Value};
use crate::CoreError;

/// Property key carrying the value column on every feature
pub const INTENSITY_PROPERTY: &str = "intensity";

/// A client-supplied record, keys in the order they were sent
pub type Record = IndexMap<String, serde_json::Value>;

/// Build one point feature, or `None` when the row must be dropped
fn point_feature(longitude: &Value, latitude: &Value, intensity: &Value) -> Option<Feature> {
    if !(is_valid(longitude) && is_valid(latitude) && is_valid(intensity)) {
        return None;
    }

    let (lon, lat) = match (longitude.as_f64(), latitude.as_f64()) {
        (Some(lon), Some(lat)) => (lon, lat),
        _ => {
            debug!(%longitude, %latitude, "dropping row with non-numeric coordinates");
            return None;
        }
    };

    let mut properties = JsonObject::new();
    properties.insert(INTENSITY_PROPERTY.to_string(), intensity.to_json());

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::Point(vec![lon, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Project `table` into point features using the given column roles.
///
/// Rows with a missing longitude, latitude or intensity are skipped; the
/// remaining rows keep their table order.
pub fn project(table: &ResultTable, roles: &ColumnRoles) -> Result<FeatureCollection, CoreError> {
    let lon = table.require_column(&roles.longitude)?;
    let lat = table.require_column(&roles.latitude)?;
    let value = table.require_column(&roles.intensity)?;

    let features: Vec<Feature> = table
        .rows()
        .iter()
        .filter_map(|row| point_feature(&row[lon], &row[lat], &row[value]))
        .collect();

    debug!(
        rows = table.row_count(),
        features = features.len(),
        "projected table"
    );
    Ok(collection(features))
}

/// Resolve roles from the table's own columns, then project
pub fn project_inferred(table: &ResultTable) -> Result<FeatureCollection, CoreError> {
    let roles = resolve_roles(table.columns())?;
    project(table, &roles)
}

/// Project loose records, resolving roles for each record separately
pub fn project_records(records: &[Record]) -> Result<FeatureCollection, CoreError> {
    let mut features = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        if record.len() != 3 {
            return Err(CoreError::MalformedItem(format!(
                "item {} has {} keys, expected 3",
                idx,
                record.len()
            )));
        }

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        let roles = resolve_roles(keys.as_slice())?;

        let cell = |name: &str| -> Result<Value, CoreError> {
            let raw = record.get(name).unwrap_or(&serde_json::Value::Null);
            Value::from_json(raw).ok_or_else(|| {
                CoreError::MalformedItem(format!(
                    "item {} has a non-scalar value for {}",
                    idx, name
                ))
            })
        };

        let longitude = cell(&roles.longitude)?;
        let latitude = cell(&roles.latitude)?;
        let intensity = cell(&roles.intensity)?;

        if let Some(feature) = point_feature(&longitude, &latitude, &intensity) {
            features.push(feature);
        }
    }

    Ok(collection(features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roles() -> ColumnRoles {
        ColumnRoles::new("CLIENT_LONGITUDE", "CLIENT_LATITUDE", "RSSI")
    }

    fn table(rows: Vec<Vec<Value>>) -> ResultTable {
        ResultTable::from_rows(
            vec![
                "CLIENT_LONGITUDE".into(),
                "CLIENT_LATITUDE".into(),
                "RSSI".into(),
            ],
            rows,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_table() {
        let fc = project(&table(vec![]), &roles()).unwrap();
        assert_eq!(
            serde_json::to_value(&fc).unwrap(),
            json!({"type": "FeatureCollection", "features": []})
        );
    }

    #[test]
    fn test_longitude_first_and_order_kept() {
        let fc = project(
            &table(vec![
                vec![Value::Float(-3.7), Value::Float(40.4), Value::Int(-80)],
                vec![Value::Float(2.1), Value::Float(41.3), Value::Int(-95)],
            ]),
            &roles(),
        )
        .unwrap();

        let json = serde_json::to_value(&fc).unwrap();
        assert_eq!(json["features"][0]["geometry"]["coordinates"], json!([-3.7, 40.4]));
        assert_eq!(json["features"][0]["properties"], json!({"intensity": -80}));
        assert_eq!(json["features"][1]["properties"]["intensity"], json!(-95));
        assert_eq!(json["features"][1]["geometry"]["type"], json!("Point"));
    }

    #[test]
    fn test_invalid_rows_dropped() {
        let fc = project(
            &table(vec![
                vec![Value::Null, Value::Float(40.0), Value::Int(1)],
                vec![Value::Float(1.0), Value::Float(f64::NAN), Value::Int(2)],
                vec![Value::Float(1.0), Value::Float(2.0), Value::from("")],
                vec![Value::Float(0.0), Value::Float(0.0), Value::Int(0)],
                vec![Value::from("east"), Value::Float(2.0), Value::Int(5)],
            ]),
            &roles(),
        )
        .unwrap();

        assert_eq!(fc.features.len(), 1);
        let json = serde_json::to_value(&fc).unwrap();
        assert_eq!(json["features"][0]["geometry"]["coordinates"], json!([0.0, 0.0]));
        assert_eq!(json["features"][0]["properties"]["intensity"], json!(0));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let t = table(vec![
            vec![Value::Float(1.0), Value::Float(2.0), Value::from("good")],
            vec![Value::from("3.5"), Value::Int(4), Value::Float(0.5)],
        ]);
        let first = serde_json::to_string(&project(&t, &roles()).unwrap()).unwrap();
        let second = serde_json::to_string(&project(&t, &roles()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_role_column() {
        let roles = ColumnRoles::new("CLIENT_LONGITUDE", "CLIENT_LATITUDE", "SINR");
        let result = project(&table(vec![]), &roles);
        assert!(matches!(result, Err(CoreError::UnknownColumn(c)) if c == "SINR"));
    }

    #[test]
    fn test_project_inferred() {
        let fc = project_inferred(&table(vec![vec![
            Value::Float(1.0),
            Value::Float(2.0),
            Value::Int(3),
        ]]))
        .unwrap();
        assert_eq!(fc.features.len(), 1);

        let wide = ResultTable::new(vec!["lon".into(), "lat".into(), "a".into(), "b".into()]);
        assert!(matches!(project_inferred(&wide), Err(CoreError::SchemaShape(_))));
    }

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_project_records() {
        let records = vec![
            record(json!({"longitude": 1.5, "latitude": 2.5, "rsrp": -100})),
            record(json!({"lat": 3, "value": "x", "long": 4})),
            record(json!({"longitude": null, "latitude": 2.5, "rsrp": -100})),
        ];
        let fc = project_records(&records).unwrap();
        let json = serde_json::to_value(&fc).unwrap();

        assert_eq!(fc.features.len(), 2);
        assert_eq!(json["features"][0]["geometry"]["coordinates"], json!([1.5, 2.5]));
        assert_eq!(json["features"][1]["geometry"]["coordinates"], json!([4.0, 3.0]));
        assert_eq!(json["features"][1]["properties"]["intensity"], json!("x"));
    }

    #[test]
    fn test_project_records_shape_errors() {
        let two_keys = vec![record(json!({"longitude": 1, "latitude": 2}))];
        assert!(matches!(project_records(&two_keys), Err(CoreError::MalformedItem(_))));

        let nested = vec![record(json!({"longitude": 1, "latitude": 2, "v": [1]}))];
        assert!(matches!(project_records(&nested), Err(CoreError::MalformedItem(_))));

        let no_lat = vec![record(json!({"longitude": 1, "y": 2, "v": 3}))];
        assert!(matches!(project_records(&no_lat), Err(CoreError::SchemaShape(_))));
    }
}
