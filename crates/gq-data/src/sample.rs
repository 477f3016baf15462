//! Sample measurement database and templates for local runs

use std::path::Path;

use chrono::{Duration, NaiveDate};
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use tracing::info;

use crate::templates::{COLUMNS_TABLE, FILTERS, HEATMAP};
use crate::DataError;

const CARRIERS: &[&str] = &["movistar", "vodafone", "orange", "yoigo"];
const BRANDS: &[&str] = &["samsung", "apple", "xiaomi", "motorola"];
const DEVICES: &[&str] = &["phone", "tablet", "router"];
const HARDWARE: &[&str] = &["qualcomm", "mediatek", "exynos"];
const MODELS: &[&str] = &["a", "b", "c", "x1", "x2"];

/// Schema of the measurement table the templates read from
pub const MEASUREMENTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS measurements (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        TEST_DATE TEXT,
        TEST_CARRIER_A TEXT,
        BRAND TEXT,
        DEVICE TEXT,
        HARDWARE TEXT,
        MODEL TEXT,
        CLIENT_LONGITUDE REAL,
        CLIENT_LATITUDE REAL,
        RSSI INTEGER,
        RSRP REAL,
        SINR REAL
    );
    CREATE INDEX IF NOT EXISTS idx_measurements_date ON measurements(TEST_DATE);
";

const COLUMNS_TABLE_SQL: &str = "SELECT name AS column_name, type AS column_type
FROM pragma_table_info('measurements')
WHERE type IN ('INTEGER', 'REAL') AND name NOT IN ('id', 'CLIENT_LONGITUDE', 'CLIENT_LATITUDE')
ORDER BY cid
";

const FILTERS_SQL: &str = "SELECT DISTINCT TEST_CARRIER_A, BRAND, DEVICE, HARDWARE, MODEL
FROM measurements
ORDER BY TEST_CARRIER_A, BRAND, DEVICE, HARDWARE, MODEL
";

const HEATMAP_SQL: &str = "SELECT CLIENT_LONGITUDE, CLIENT_LATITUDE, TEST_DATE, TEST_CARRIER_A,
       BRAND, DEVICE, HARDWARE, MODEL, {column}
FROM measurements
ORDER BY id
";

/// Create and populate a sample database with `rows` measurements
pub fn create_sample_database(path: &Path, rows: usize) -> Result<(), DataError> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(MEASUREMENTS_SCHEMA)?;

    info!(path = %path.display(), rows, "generating sample measurements");
    let tx = conn.transaction()?;
    generate_measurements(&tx, rows)?;
    tx.commit()?;

    info!("sample database created");
    Ok(())
}

fn generate_measurements(conn: &Connection, rows: usize) -> Result<(), DataError> {
    let mut stmt = conn.prepare(
        "INSERT INTO measurements (TEST_DATE, TEST_CARRIER_A, BRAND, DEVICE, HARDWARE, MODEL,
                                   CLIENT_LONGITUDE, CLIENT_LATITUDE, RSSI, RSRP, SINR)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;

    let mut rng = 42u32;
    let base_time = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DataError::Other("invalid sample base date".to_string()))?;

    for i in 0..rows {
        let timestamp = base_time + Duration::minutes(i as i64 * 37);
        let carrier = pick(CARRIERS, &mut rng);
        let brand = pick(BRANDS, &mut rng);
        let device = pick(DEVICES, &mut rng);
        let hardware = pick(HARDWARE, &mut rng);
        let model = pick(MODELS, &mut rng);

        // Madrid-ish bounding box
        let longitude = -3.80 + random_float(&mut rng) * 0.25;
        let latitude = 40.35 + random_float(&mut rng) * 0.15;
        let rssi = -50 - (random_int(&mut rng) % 60) as i64;
        let rsrp = -80.0 - random_float(&mut rng) * 40.0;
        let sinr = -5.0 + random_float(&mut rng) * 30.0;

        // Sprinkle in the gaps real drive tests have
        let longitude = if i % 17 == 5 { None } else { Some(longitude) };
        let latitude = if i % 23 == 7 {
            SqlValue::Text(String::new())
        } else {
            SqlValue::Real(latitude)
        };
        let sinr = if i % 29 == 3 { None } else { Some(sinr) };

        stmt.execute((
            timestamp.format(gq_core::filter::DATE_FORMAT).to_string(),
            carrier,
            brand,
            device,
            hardware,
            model,
            longitude,
            latitude,
            rssi,
            rsrp,
            sinr,
        ))?;
    }

    Ok(())
}

/// Write the three templates the server expects into `dir`
pub fn write_sample_templates(dir: &Path) -> Result<(), DataError> {
    std::fs::create_dir_all(dir)?;
    for (name, sql) in [
        (COLUMNS_TABLE, COLUMNS_TABLE_SQL),
        (FILTERS, FILTERS_SQL),
        (HEATMAP, HEATMAP_SQL),
    ] {
        std::fs::write(dir.join(format!("{}.sql", name)), sql)?;
    }
    Ok(())
}

fn pick(options: &[&'static str], seed: &mut u32) -> &'static str {
    options[(random_int(seed) as usize) % options.len()]
}

fn random_float(seed: &mut u32) -> f64 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    (*seed as f64) / (u32::MAX as f64)
}

fn random_int(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}
