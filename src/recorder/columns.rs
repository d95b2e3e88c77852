//! Column names of the persisted sample log

/// Wall-clock timestamp column
pub const WALL_TIME: &str = "wall_time";
/// Elapsed run time column
pub const ELAPSED_S: &str = "elapsed_s";
/// Temperature column
pub const TEMPERATURE_C: &str = "temperature_c";
/// Humidity column
pub const HUMIDITY_PCT: &str = "humidity_pct";
/// Validity flag column
pub const OK: &str = "ok";

/// Header row in write order
pub const HEADER: [&str; 5] = [WALL_TIME, ELAPSED_S, TEMPERATURE_C, HUMIDITY_PCT, OK];

/// Legacy name of [`WALL_TIME`]
pub const LEGACY_WALL_TIME: &str = "unix_time";
/// Legacy name of [`HUMIDITY_PCT`]
pub const LEGACY_HUMIDITY: &str = "humidity";

/// Names accepted for a column when reading, canonical name first
pub fn aliases(column: &'static str) -> &'static [&'static str] {
    match column {
        WALL_TIME => &[WALL_TIME, LEGACY_WALL_TIME],
        HUMIDITY_PCT => &[HUMIDITY_PCT, LEGACY_HUMIDITY],
        ELAPSED_S => &[ELAPSED_S],
        TEMPERATURE_C => &[TEMPERATURE_C],
        _ => &[OK],
    }
}
