//! Weather observation records.
//!
//! The record model the classifier consumes: dates, compass directions,
//! the full per-day observation with its field-name-keyed accessors, and
//! the fixed station and feature-name tables that make the categorical
//! encodings stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod read;

pub use read::{cull_missing, read_observations, read_observations_path};

/// Error type for record parsing and field access.
#[derive(Debug)]
pub enum WeatherError {
    /// A field value failed validation.
    BadField { field: &'static str, value: String },
    /// A data line had fewer columns than the format requires.
    TooFewFields { got: usize },
    /// A field name no accessor recognizes.
    UnknownField(String),
    /// CSV-level read failure.
    Csv(String),
    /// I/O failure opening or reading the data file.
    Io(String),
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::BadField { field, value } => {
                write!(f, "Bad {}: {}", field, value)
            }
            WeatherError::TooFewFields { got } => {
                write!(f, "Too few fields: {}", got)
            }
            WeatherError::UnknownField(name) => {
                write!(f, "Invalid field name: {}", name)
            }
            WeatherError::Csv(msg) => write!(f, "CSV error: {}", msg),
            WeatherError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<csv::Error> for WeatherError {
    fn from(err: csv::Error) -> Self {
        WeatherError::Csv(err.to_string())
    }
}

impl From<std::io::Error> for WeatherError {
    fn from(err: std::io::Error) -> Self {
        WeatherError::Io(err.to_string())
    }
}

/// Calendar date of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl Date {
    pub fn new(year: i32, month: i32, day: i32) -> Self {
        Self { year, month, day }
    }

    /// Single-number encoding used as the model's date feature: the plain
    /// sum of year, month, and day.
    pub fn to_number(self) -> i32 {
        self.year + self.month + self.day
    }
}

impl FromStr for Date {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || WeatherError::BadField {
            field: "date",
            value: s.to_string(),
        };
        let mut parts = s.split('-');
        let year = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let month = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let day = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        Ok(Date { year, month, day })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

/// One of the 16 compass points, or a distinguished missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
    Missing,
}

impl Direction {
    /// Compass heading in degrees; NaN for [`Direction::Missing`].
    pub fn heading(self) -> f64 {
        match self {
            Direction::N => 0.0,
            Direction::Nne => 22.5,
            Direction::Ne => 45.0,
            Direction::Ene => 67.5,
            Direction::E => 90.0,
            Direction::Ese => 112.5,
            Direction::Se => 135.0,
            Direction::Sse => 157.5,
            Direction::S => 180.0,
            Direction::Ssw => 202.5,
            Direction::Sw => 225.0,
            Direction::Wsw => 247.5,
            Direction::W => 270.0,
            Direction::Wnw => 292.5,
            Direction::Nw => 315.0,
            Direction::Nnw => 337.5,
            Direction::Missing => f64::NAN,
        }
    }
}

impl FromStr for Direction {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "N" => Ok(Direction::N),
            "NNE" => Ok(Direction::Nne),
            "NE" => Ok(Direction::Ne),
            "ENE" => Ok(Direction::Ene),
            "E" => Ok(Direction::E),
            "ESE" => Ok(Direction::Ese),
            "SE" => Ok(Direction::Se),
            "SSE" => Ok(Direction::Sse),
            "S" => Ok(Direction::S),
            "SSW" => Ok(Direction::Ssw),
            "SW" => Ok(Direction::Sw),
            "WSW" => Ok(Direction::Wsw),
            "W" => Ok(Direction::W),
            "WNW" => Ok(Direction::Wnw),
            "NW" => Ok(Direction::Nw),
            "NNW" => Ok(Direction::Nnw),
            "NA" | "MISSING" => Ok(Direction::Missing),
            _ => Err(WeatherError::BadField {
                field: "wind direction",
                value: s.to_string(),
            }),
        }
    }
}

/// One day of weather observations at one station.
///
/// Numeric fields use NaN for "not available"; cloud cover keeps the data
/// file's integer `-1` sentinel; boolean fields use `None` for unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: Date,
    pub location: String,
    pub min_temperature: f64,   // °C
    pub max_temperature: f64,   // °C
    pub rainfall: f64,          // mm
    pub evaporation: f64,       // mm/day
    pub sunshine: f64,          // hours
    pub wind_gust_speed: f64,   // km/hour
    pub wind_gust_direction: Direction,

    // Morning values at 9am
    pub morning_temperature: f64, // °C
    pub morning_humidity: f64,    // %
    pub morning_pressure: f64,    // hpa
    pub morning_cloud_cover: i8,  // oktas, -1 when missing
    pub morning_wind_speed: f64,  // km/hour
    pub morning_wind_direction: Direction,

    // Afternoon values at 3pm
    pub afternoon_temperature: f64,
    pub afternoon_humidity: f64,
    pub afternoon_pressure: f64,
    pub afternoon_cloud_cover: i8,
    pub afternoon_wind_speed: f64,
    pub afternoon_wind_direction: Direction,

    pub rain_today: Option<bool>,
    pub rain_tomorrow: Option<bool>, // the label
    pub rainfall_tomorrow: f64,      // mm
}

impl Observation {
    /// Numeric field by name.
    ///
    /// # Errors
    /// [`WeatherError::UnknownField`] for names without a numeric value.
    pub fn number(&self, field: &str) -> Result<f64, WeatherError> {
        match field.to_ascii_lowercase().as_str() {
            "mintemperature" => Ok(self.min_temperature),
            "maxtemperature" => Ok(self.max_temperature),
            "rainfall" => Ok(self.rainfall),
            "hoursofsunshine" => Ok(self.sunshine),
            "evaporationrate" => Ok(self.evaporation),
            "gustspeed" => Ok(self.wind_gust_speed),
            "morningtemperature" => Ok(self.morning_temperature),
            "morninghumidity" => Ok(self.morning_humidity),
            "morningpressure" => Ok(self.morning_pressure),
            "morningcloudcover" => Ok(f64::from(self.morning_cloud_cover)),
            "morningwindspeed" => Ok(self.morning_wind_speed),
            "afternoontemperature" => Ok(self.afternoon_temperature),
            "afternoonhumidity" => Ok(self.afternoon_humidity),
            "afternoonpressure" => Ok(self.afternoon_pressure),
            "afternooncloudcover" => Ok(f64::from(self.afternoon_cloud_cover)),
            "afternoonwindspeed" => Ok(self.afternoon_wind_speed),
            _ => Err(WeatherError::UnknownField(field.to_string())),
        }
    }

    /// Wind direction field by name.
    pub fn direction(&self, field: &str) -> Result<Direction, WeatherError> {
        match field.to_ascii_lowercase().as_str() {
            "gustdirection" => Ok(self.wind_gust_direction),
            "morningwinddirection" => Ok(self.morning_wind_direction),
            "afternoonwinddirection" => Ok(self.afternoon_wind_direction),
            _ => Err(WeatherError::UnknownField(field.to_string())),
        }
    }

    /// Boolean field by name; `None` means the value is unknown.
    pub fn boolean(&self, field: &str) -> Result<Option<bool>, WeatherError> {
        match field.to_ascii_lowercase().as_str() {
            "raintoday" => Ok(self.rain_today),
            "raintomorrow" => Ok(self.rain_tomorrow),
            _ => Err(WeatherError::UnknownField(field.to_string())),
        }
    }

    /// Whether the named field holds its missing sentinel.
    pub fn is_missing(&self, field: &str) -> Result<bool, WeatherError> {
        match field.to_ascii_lowercase().as_str() {
            "date" | "location" => Ok(false),
            "morningcloudcover" | "afternooncloudcover" => Ok(self.number(field)? < 0.0),
            "gustdirection" | "morningwinddirection" | "afternoonwinddirection" => {
                Ok(self.direction(field)? == Direction::Missing)
            }
            "raintoday" | "raintomorrow" => Ok(self.boolean(field)?.is_none()),
            _ => Ok(self.number(field)?.is_nan()),
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {:?} {:?} {}",
            self.date,
            self.location,
            self.min_temperature,
            self.max_temperature,
            self.rainfall,
            self.sunshine,
            self.evaporation,
            self.wind_gust_speed,
            self.wind_gust_direction.heading(),
            self.morning_temperature,
            self.morning_humidity,
            self.morning_pressure,
            self.morning_cloud_cover,
            self.morning_wind_speed,
            self.morning_wind_direction.heading(),
            self.afternoon_temperature,
            self.afternoon_humidity,
            self.afternoon_pressure,
            self.afternoon_cloud_cover,
            self.afternoon_wind_speed,
            self.afternoon_wind_direction.heading(),
            self.rain_today,
            self.rain_tomorrow,
            self.rainfall_tomorrow,
        )
    }
}

/// Logical feature names in model order: the dummy column followed by the
/// 21 weather attributes. Used to label statistics and weights.
pub const FIELD_NAMES: [&str; 22] = [
    "Dummy",
    "Date",
    "Location",
    "MinTemperature",
    "MaxTemperature",
    "Rainfall",
    "Sunshine",
    "Evaporation",
    "WindGustSpeed",
    "WindGustDirection",
    "MorningTemperature",
    "MorningHumidity",
    "MorningPressure",
    "MorningCloudCover",
    "MorningWindSpeed",
    "MorningWindDirection",
    "AfternoonTemperature",
    "AfternoonHumidity",
    "AfternoonPressure",
    "AfternoonCloudCover",
    "AfternoonWindSpeed",
    "AfternoonWindDirection",
];

/// Recognized station names. The ordering is fixed because a location is
/// encoded as its index in this list (unknown stations encode as -1).
pub const LOCATIONS: [&str; 48] = [
    "Adelaide",
    "Albany",
    "Albury",
    "AliceSprings",
    "BadgerysCreek",
    "Ballarat",
    "Bendigo",
    "Brisbane",
    "Cairns",
    "Canberra",
    "Cobar",
    "CoffsHarbour",
    "Dartmoor",
    "Darwin",
    "GoldCoast",
    "Hobart",
    "Katherine",
    "Launceston",
    "Melbourne",
    "MelbourneAirport",
    "Mildura",
    "Moree",
    "MountGambier",
    "MountGinini",
    "Newcastle",
    "Nhil",
    "NorahHead",
    "NorfolkIsland",
    "Nuriootpa",
    "PearceRAAF",
    "Penrith",
    "Perth",
    "PerthAirport",
    "Portland",
    "RichmondSale",
    "SalmonGums",
    "Sydney",
    "SydneyAirport",
    "Townsville",
    "Tuggeranong",
    "Uluru",
    "WaggaWagga",
    "Walpole",
    "Watsonia",
    "Williamtown",
    "Witchcliffe",
    "Wollongong",
    "Woomera",
];

/// Index of `location` in [`LOCATIONS`], or -1 when unrecognized.
pub fn location_index(location: &str) -> i32 {
    LOCATIONS
        .iter()
        .position(|&name| name == location)
        .map(|i| i as i32)
        .unwrap_or(-1)
}
