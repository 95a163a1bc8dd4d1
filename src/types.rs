use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `[lat, lng]` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific inputs and their derived metric.
///
/// Serialized flat next to the common fields, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        cadence: f64,
        /// min/km
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        /// km/h
        speed: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workout {
    #[serde(flatten)]
    pub kind: WorkoutKind,
    pub coords: Coords,
    /// km
    pub distance: f64,
    /// min
    pub duration: f64,
    pub date: DateTime<Local>,
    pub id: String,
    pub description: String,
    pub clicks: u32,
}

impl Workout {
    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: f64) -> Self {
        Self::running_at(Local::now(), coords, distance, duration, cadence)
    }

    pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self::cycling_at(Local::now(), coords, distance, duration, elevation_gain)
    }

    pub fn running_at(
        date: DateTime<Local>,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Self {
        let pace = pace(distance, duration);
        Self::build(
            date,
            coords,
            distance,
            duration,
            WorkoutKind::Running { cadence, pace },
        )
    }

    pub fn cycling_at(
        date: DateTime<Local>,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Self {
        let speed = speed(distance, duration);
        Self::build(
            date,
            coords,
            distance,
            duration,
            WorkoutKind::Cycling {
                elevation_gain,
                speed,
            },
        )
    }

    fn build(
        date: DateTime<Local>,
        coords: Coords,
        distance: f64,
        duration: f64,
        kind: WorkoutKind,
    ) -> Self {
        let ty = match kind {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        };

        Self {
            id: id_from_timestamp(&date),
            description: describe(ty, &date),
            kind,
            coords,
            distance,
            duration,
            date,
            clicks: 0,
        }
    }

    pub const fn workout_type(&self) -> WorkoutType {
        match self.kind {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }

    pub fn describe(&self) -> &str {
        &self.description
    }

    pub const fn icon(&self) -> &'static str {
        self.workout_type().icon()
    }

    pub const fn derived_metric_label(&self) -> &'static str {
        match self.kind {
            WorkoutKind::Running { .. } => "min/km",
            WorkoutKind::Cycling { .. } => "km/h",
        }
    }

    /// Pace for running, speed for cycling, as stored at creation.
    pub const fn derived_metric_value(&self) -> f64 {
        match self.kind {
            WorkoutKind::Running { pace, .. } => pace,
            WorkoutKind::Cycling { speed, .. } => speed,
        }
    }

    /// `(icon, value, unit)` of the cadence or elevation gain.
    pub const fn secondary_stat(&self) -> (&'static str, f64, &'static str) {
        match self.kind {
            WorkoutKind::Running { cadence, .. } => ("🦶🏼", cadence, "spm"),
            WorkoutKind::Cycling { elevation_gain, .. } => ("⛰", elevation_gain, "m"),
        }
    }

    pub const fn click(&mut self) {
        self.clicks += 1;
    }
}

/// min/km
pub fn pace(distance: f64, duration: f64) -> f64 {
    duration / distance
}

/// km/h from km and minutes.
pub fn speed(distance: f64, duration: f64) -> f64 {
    distance / (duration / 60.0)
}

/// `"<Type> on <Month> <Day> | <HH>:<MM>"` in the timestamp's own zone.
pub fn describe<Tz: TimeZone>(ty: WorkoutType, date: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!(
        "{} on {} {} | {}",
        ty.label(),
        date.format("%B"),
        date.day(),
        date.format("%H:%M")
    )
}

/// Last 10 digits of the millisecond timestamp.
pub fn id_from_timestamp<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let ms = date.timestamp_millis().to_string();
    let start = ms.len().saturating_sub(10);
    ms[start..].to_string()
}
