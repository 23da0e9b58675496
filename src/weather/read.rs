//! Flat-file ingestion of weather observations.
//!
//! Each data line carries 24 comma-separated columns in the Australian
//! Bureau of Meteorology export order. Every field is range-validated on
//! the way in; `NA` becomes the field's missing sentinel (NaN for numeric
//! values, `-1` for cloud cover, `Missing` for directions, `None` for
//! booleans). A bad value aborts the read with [`WeatherError`].

use crate::weather::{Date, Direction, Observation, WeatherError};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const MIN_COLUMNS: usize = 24;

fn parse_temperature(value: &str) -> Result<f64, WeatherError> {
    parse_ranged(value, "temperature", -100.0, 100.0)
}

fn parse_humidity(value: &str) -> Result<f64, WeatherError> {
    parse_ranged(value, "humidity", 0.0, 100.0)
}

fn parse_sunshine(value: &str) -> Result<f64, WeatherError> {
    parse_ranged(value, "sunshine", 0.0, 24.0)
}

fn parse_pressure(value: &str) -> Result<f64, WeatherError> {
    if value == "NA" {
        return Ok(f64::NAN);
    }
    let pressure: f64 = value.parse().map_err(|_| bad("pressure", value))?;
    if pressure <= 0.0 {
        return Err(bad("pressure", value));
    }
    Ok(pressure)
}

fn parse_wind_speed(value: &str) -> Result<f64, WeatherError> {
    if value == "NA" {
        return Ok(f64::NAN);
    }
    let speed: f64 = value.parse().map_err(|_| bad("speed", value))?;
    if speed < -40.0 {
        return Err(bad("speed", value));
    }
    Ok(speed)
}

fn parse_rainfall(value: &str) -> Result<f64, WeatherError> {
    if value == "NA" {
        return Ok(f64::NAN);
    }
    let rainfall: f64 = value.parse().map_err(|_| bad("rainfall", value))?;
    if rainfall < 0.0 {
        return Err(bad("rainfall", value));
    }
    Ok(rainfall)
}

fn parse_evaporation(value: &str) -> Result<f64, WeatherError> {
    if value == "NA" {
        return Ok(f64::NAN);
    }
    let rate: f64 = value.parse().map_err(|_| bad("evaporation rate", value))?;
    if rate < 0.0 {
        return Err(bad("evaporation rate", value));
    }
    Ok(rate)
}

fn parse_cloud_cover(value: &str) -> Result<i8, WeatherError> {
    if value == "NA" {
        return Ok(-1);
    }
    let cover: i8 = value.parse().map_err(|_| bad("cloud cover", value))?;
    if !(0..=9).contains(&cover) {
        return Err(bad("cloud cover", value));
    }
    Ok(cover)
}

fn parse_boolean(value: &str) -> Result<Option<bool>, WeatherError> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" => Ok(Some(true)),
        "no" | "false" => Ok(Some(false)),
        "na" => Ok(None),
        _ => Err(bad("boolean value", value)),
    }
}

fn parse_ranged(
    value: &str,
    field: &'static str,
    low: f64,
    high: f64,
) -> Result<f64, WeatherError> {
    if value == "NA" {
        return Ok(f64::NAN);
    }
    let number: f64 = value
        .parse()
        .map_err(|_| bad(field, value))?;
    if number < low || number > high {
        return Err(bad(field, value));
    }
    Ok(number)
}

fn bad(field: &'static str, value: &str) -> WeatherError {
    WeatherError::BadField {
        field,
        value: value.to_string(),
    }
}

/// Parse one raw data line into an [`Observation`].
pub fn parse_observation(record: &StringRecord) -> Result<Observation, WeatherError> {
    if record.len() < MIN_COLUMNS {
        return Err(WeatherError::TooFewFields { got: record.len() });
    }
    Ok(Observation {
        date: record[0].parse::<Date>()?,
        location: record[1].to_string(),
        min_temperature: parse_temperature(&record[2])?,
        max_temperature: parse_temperature(&record[3])?,
        rainfall: parse_rainfall(&record[4])?,
        evaporation: parse_evaporation(&record[5])?,
        sunshine: parse_sunshine(&record[6])?,
        wind_gust_direction: record[7].parse::<Direction>()?,
        wind_gust_speed: parse_wind_speed(&record[8])?,
        morning_wind_direction: record[9].parse::<Direction>()?,
        afternoon_wind_direction: record[10].parse::<Direction>()?,
        morning_wind_speed: parse_wind_speed(&record[11])?,
        afternoon_wind_speed: parse_wind_speed(&record[12])?,
        morning_humidity: parse_humidity(&record[13])?,
        afternoon_humidity: parse_humidity(&record[14])?,
        morning_pressure: parse_pressure(&record[15])?,
        afternoon_pressure: parse_pressure(&record[16])?,
        morning_cloud_cover: parse_cloud_cover(&record[17])?,
        afternoon_cloud_cover: parse_cloud_cover(&record[18])?,
        morning_temperature: parse_temperature(&record[19])?,
        afternoon_temperature: parse_temperature(&record[20])?,
        rain_today: parse_boolean(&record[21])?,
        rainfall_tomorrow: parse_rainfall(&record[22])?,
        rain_tomorrow: parse_boolean(&record[23])?,
    })
}

/// Read up to `limit` observations from `reader` (0 means no limit).
pub fn read_observations<R: Read>(
    reader: R,
    limit: usize,
) -> Result<Vec<Observation>, WeatherError> {
    let limit = if limit == 0 { usize::MAX } else { limit };
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut result = Vec::new();
    for record in csv_reader.records() {
        if result.len() >= limit {
            break;
        }
        let record = record?;
        result.push(parse_observation(&record)?);
    }
    Ok(result)
}

/// Read up to `limit` observations from the file at `path`.
pub fn read_observations_path<P: AsRef<Path>>(
    path: P,
    limit: usize,
) -> Result<Vec<Observation>, WeatherError> {
    let file = File::open(path)?;
    read_observations(BufReader::new(file), limit)
}

/// Remove every observation whose named field is missing; returns how many
/// were dropped.
pub fn cull_missing(dataset: &mut Vec<Observation>, field: &str) -> Result<usize, WeatherError> {
    // Validate the field name once up front so retain can't fail mid-pass.
    if let Some(first) = dataset.first() {
        first.is_missing(field)?;
    }
    let before = dataset.len();
    dataset.retain(|obs| !obs.is_missing(field).unwrap_or(false));
    Ok(before - dataset.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "2008-12-1,Albury,13.4,22.9,0.6,NA,NA,W,44,W,WNW,20,24,71,22,1007.7,1007.1,8,NA,16.9,21.8,No,0,No";
    const LINE_RAIN: &str = "2008-12-2,Albury,7.4,25.1,0,4.8,9.1,WNW,44,NNW,WSW,4,22,44,25,1010.6,1007.8,NA,NA,17.2,24.3,No,3.6,Yes";

    #[test]
    fn test_parse_line() {
        let obs = read_observations(LINE.as_bytes(), 0).unwrap().remove(0);
        assert_eq!(obs.date, Date::new(2008, 12, 1));
        assert_eq!(obs.location, "Albury");
        assert_eq!(obs.min_temperature, 13.4);
        assert!(obs.evaporation.is_nan());
        assert!(obs.sunshine.is_nan());
        assert_eq!(obs.wind_gust_direction, Direction::W);
        assert_eq!(obs.wind_gust_speed, 44.0);
        assert_eq!(obs.morning_wind_direction, Direction::W);
        assert_eq!(obs.afternoon_wind_direction, Direction::Wnw);
        assert_eq!(obs.morning_cloud_cover, 8);
        assert_eq!(obs.afternoon_cloud_cover, -1);
        assert_eq!(obs.morning_temperature, 16.9);
        assert_eq!(obs.rain_today, Some(false));
        assert_eq!(obs.rain_tomorrow, Some(false));
        assert_eq!(obs.rainfall_tomorrow, 0.0);
    }

    #[test]
    fn test_read_limit() {
        let data = format!("{}\n{}\n", LINE, LINE_RAIN);
        let all = read_observations(data.as_bytes(), 0).unwrap();
        assert_eq!(all.len(), 2);
        let first = read_observations(data.as_bytes(), 1).unwrap();
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_bad_temperature_rejected() {
        let line = LINE.replace("13.4", "150");
        let result = read_observations(line.as_bytes(), 0);
        assert!(matches!(
            result,
            Err(WeatherError::BadField {
                field: "temperature",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_humidity_rejected() {
        let line = LINE.replace(",71,", ",101,");
        assert!(read_observations(line.as_bytes(), 0).is_err());
    }

    #[test]
    fn test_bad_cloud_cover_rejected() {
        let line = LINE.replace(",8,NA,16.9", ",12,NA,16.9");
        assert!(read_observations(line.as_bytes(), 0).is_err());
    }

    #[test]
    fn test_too_few_fields() {
        let result = read_observations("2008-12-1,Albury,13.4".as_bytes(), 0);
        assert!(matches!(result, Err(WeatherError::TooFewFields { .. })));
    }

    #[test]
    fn test_boolean_na_is_unknown() {
        let line = LINE.replace(",No,0,No", ",NA,0,NA");
        let obs = read_observations(line.as_bytes(), 0).unwrap().remove(0);
        assert_eq!(obs.rain_today, None);
        assert_eq!(obs.rain_tomorrow, None);
    }

    #[test]
    fn test_cull_missing() {
        let data = format!("{}\n{}\n", LINE, LINE_RAIN);
        let mut dataset = read_observations(data.as_bytes(), 0).unwrap();
        // Sunshine is NA in the first line only.
        let removed = cull_missing(&mut dataset, "hoursofsunshine").unwrap();
        assert_eq!(removed, 1);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset[0].rain_tomorrow, Some(true));
    }

    #[test]
    fn test_cull_missing_unknown_field() {
        let mut dataset = read_observations(LINE.as_bytes(), 0).unwrap();
        assert!(cull_missing(&mut dataset, "banana").is_err());
    }
}
