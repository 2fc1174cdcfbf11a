use std::fs::File;
use std::path::PathBuf;

use csv::{ReaderBuilder, StringRecord};

use crate::error::IngestError;
use crate::models::{CycleType, Measurement};
use crate::source::MeasurementSource;

pub const COL_CYCLE: &str = "id_cycle";
pub const COL_VOLTAGE: &str = "Voltage_measured";
pub const COL_CURRENT: &str = "Current_measured";
pub const COL_TEMPERATURE: &str = "Temperature_measured";
pub const COL_CAPACITY: &str = "Capacity";

/// Reads `<root>/<battery_id>/<battery_id>_<type>_data.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn file_path(&self, battery_id: &str, cycle_type: CycleType) -> PathBuf {
        self.root
            .join(battery_id)
            .join(format!("{battery_id}_{}_data.csv", cycle_type.as_str()))
    }
}

impl MeasurementSource for CsvDirectorySource {
    fn load(
        &self,
        battery_id: &str,
        cycle_type: CycleType,
    ) -> Result<Vec<Measurement>, IngestError> {
        let path = self.file_path(battery_id, cycle_type);
        let file = File::open(&path).map_err(|source| IngestError::MissingInput {
            battery_id: battery_id.to_string(),
            cycle_type,
            path: path.clone(),
            source,
        })?;

        let malformed = |message: String| IngestError::MalformedInput {
            battery_id: battery_id.to_string(),
            cycle_type,
            path: path.clone(),
            message,
        };

        // I/O failures surface from the reader, not from `File::open`, when
        // the path exists but is not a readable file.
        let read_error = |err: csv::Error, context: &str| {
            if !err.is_io_error() {
                return malformed(format!("{context}{err}"));
            }
            match err.into_kind() {
                csv::ErrorKind::Io(source) => IngestError::MissingInput {
                    battery_id: battery_id.to_string(),
                    cycle_type,
                    path: path.clone(),
                    source,
                },
                other => malformed(format!("{context}{other:?}")),
            }
        };

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let headers = reader
            .headers()
            .map_err(|err| read_error(err, "unreadable header: "))?
            .clone();
        let columns = ColumnIndex::resolve(&headers, cycle_type).map_err(&malformed)?;

        let mut measurements = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|err| read_error(err, ""))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let measurement = columns
                .parse(&record)
                .map_err(|message| malformed(format!("line {line}: {message}")))?;
            measurements.push(measurement);
        }

        Ok(measurements)
    }
}

struct ColumnIndex {
    cycle: usize,
    voltage: usize,
    current: usize,
    temperature: usize,
    capacity: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, cycle_type: CycleType) -> Result<Self, String> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| find(name).ok_or_else(|| format!("missing column {name}"));

        let capacity = match cycle_type {
            CycleType::Discharge => Some(require(COL_CAPACITY)?),
            CycleType::Charge => find(COL_CAPACITY),
        };

        Ok(Self {
            cycle: require(COL_CYCLE)?,
            voltage: require(COL_VOLTAGE)?,
            current: require(COL_CURRENT)?,
            temperature: require(COL_TEMPERATURE)?,
            capacity,
        })
    }

    fn parse(&self, record: &StringRecord) -> Result<Measurement, String> {
        Ok(Measurement {
            cycle_id: parse_cycle_id(field(record, self.cycle, COL_CYCLE)?)?,
            voltage: parse_float(field(record, self.voltage, COL_VOLTAGE)?, COL_VOLTAGE)?,
            current: parse_float(field(record, self.current, COL_CURRENT)?, COL_CURRENT)?,
            temperature: parse_float(
                field(record, self.temperature, COL_TEMPERATURE)?,
                COL_TEMPERATURE,
            )?,
            capacity: match self.capacity {
                Some(idx) => parse_optional_float(field(record, idx, COL_CAPACITY)?, COL_CAPACITY)?,
                None => None,
            },
        })
    }
}

fn field<'r>(record: &'r StringRecord, idx: usize, name: &str) -> Result<&'r str, String> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| format!("row has no value for {name}"))
}

/// Finite values only; `NaN` and `inf` would poison every mean downstream.
fn parse_float(raw: &str, name: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(format!("non-finite {name} value '{raw}'")),
        Err(_) => Err(format!("invalid {name} value '{raw}'")),
    }
}

fn parse_optional_float(raw: &str, name: &str) -> Result<Option<f64>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_float(raw, name).map(Some)
}

/// Cycle ids are integers, but exports sometimes write them as `12.0`.
fn parse_cycle_id(raw: &str) -> Result<i64, String> {
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(id);
    }
    match raw.parse::<f64>() {
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
        Ok(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(format!("invalid {COL_CYCLE} value '{raw}'")),
    }
}
