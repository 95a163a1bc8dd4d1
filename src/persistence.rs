use crate::dlog;
use crate::store::KeyValueStore;
use crate::types::{self, Coords, Workout, WorkoutKind, WorkoutType};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value as JsonValue;

pub const WORKOUTS_KEY: &str = "workouts";

/// Write the whole ordered sequence under [`WORKOUTS_KEY`].
pub fn save(store: &mut dyn KeyValueStore, workouts: &[Workout]) -> Result<()> {
    let json = serde_json::to_string(workouts).context("Serializing workouts")?;
    store.set(WORKOUTS_KEY, &json)?;
    dlog!("saved workouts count={} bytes={}", workouts.len(), json.len());
    Ok(())
}

/// Read the persisted sequence back.
///
/// `None` when nothing is stored, the value isn't a JSON array, or the store
/// can't be read. Callers treat that the same as an empty history. Records are
/// read one by one: fields derived at creation are recomputed when missing,
/// and a record lacking its inputs is dropped without taking the rest along.
pub fn load(store: &dyn KeyValueStore) -> Option<Vec<Workout>> {
    let raw = match store.get(WORKOUTS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(err = %e, "could not read stored workouts");
            return None;
        }
    };

    let records = match serde_json::from_str::<Option<Vec<JsonValue>>>(&raw) {
        Ok(records) => records?,
        Err(e) => {
            dlog!("stored workouts unreadable err={e}");
            return None;
        }
    };

    let total = records.len();
    let workouts: Vec<Workout> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| restore(idx, record))
        .collect();

    if workouts.len() < total {
        tracing::warn!(
            skipped = total - workouts.len(),
            total,
            "dropped unreadable stored workouts"
        );
    }

    Some(workouts)
}

pub fn reset(store: &mut dyn KeyValueStore) -> Result<()> {
    store.remove(WORKOUTS_KEY)?;
    tracing::info!("cleared stored workouts");
    Ok(())
}

/// Stored shape of one record. Only the creation inputs are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWorkout {
    #[serde(rename = "type")]
    workout_type: WorkoutType,
    coords: Coords,
    distance: f64,
    duration: f64,
    date: DateTime<Local>,
    cadence: Option<f64>,
    elevation_gain: Option<f64>,
    pace: Option<f64>,
    speed: Option<f64>,
    id: Option<String>,
    description: Option<String>,
    #[serde(default)]
    clicks: u32,
}

fn restore(idx: usize, record: JsonValue) -> Option<Workout> {
    let s = match serde_json::from_value::<StoredWorkout>(record) {
        Ok(s) => s,
        Err(e) => {
            dlog!("stored workout unreadable idx={idx} err={e}");
            return None;
        }
    };

    let kind = match s.workout_type {
        WorkoutType::Running => {
            let Some(cadence) = s.cadence else {
                dlog!("stored running workout has no cadence idx={idx}");
                return None;
            };
            WorkoutKind::Running {
                cadence,
                pace: s.pace.unwrap_or_else(|| types::pace(s.distance, s.duration)),
            }
        }
        WorkoutType::Cycling => {
            let Some(elevation_gain) = s.elevation_gain else {
                dlog!("stored cycling workout has no elevation gain idx={idx}");
                return None;
            };
            WorkoutKind::Cycling {
                elevation_gain,
                speed: s.speed.unwrap_or_else(|| types::speed(s.distance, s.duration)),
            }
        }
    };

    Some(Workout {
        kind,
        coords: s.coords,
        distance: s.distance,
        duration: s.duration,
        id: s.id.unwrap_or_else(|| types::id_from_timestamp(&s.date)),
        description: s
            .description
            .unwrap_or_else(|| types::describe(s.workout_type, &s.date)),
        date: s.date,
        clicks: s.clicks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample() -> Vec<Workout> {
        vec![
            Workout::running(Coords::new(48.39, -4.49), 5.2, 24.0, 178.0),
            Workout::cycling(Coords::new(48.40, -4.48), 27.0, 95.0, 523.0),
            Workout::running(Coords::new(48.41, -4.47), 10.0, 52.0, 165.0),
        ]
    }

    #[test]
    fn round_trip_keeps_order_and_fields() {
        let mut store = MemoryStore::new();
        let saved = sample();
        save(&mut store, &saved).unwrap();

        let loaded = load(&store).unwrap();
        assert_eq!(loaded.len(), saved.len());
        for (a, b) in saved.iter().zip(&loaded) {
            assert_eq!(a.workout_type(), b.workout_type());
            assert_eq!(a.coords, b.coords);
            assert_eq!(a.distance, b.distance);
            assert_eq!(a.duration, b.duration);
            assert_eq!(a.id, b.id);
            assert_eq!(a.description, b.description);
        }
        assert!(matches!(loaded[1].kind, WorkoutKind::Cycling { .. }));
    }

    #[test]
    fn missing_key_loads_nothing() {
        assert!(load(&MemoryStore::new()).is_none());
    }

    #[test]
    fn garbage_loads_nothing() {
        let mut store = MemoryStore::new();
        for bad in ["not json", "{\"type\":1}", ""] {
            store.set(WORKOUTS_KEY, bad).unwrap();
            assert!(load(&store).is_none(), "{bad:?} should not load");
        }
    }

    #[test]
    fn unknown_records_are_dropped_one_by_one() {
        let mut store = MemoryStore::new();
        store
            .set(WORKOUTS_KEY, r#"[{"type":"swimming"}, 3, null]"#)
            .unwrap();
        assert_eq!(load(&store), Some(Vec::new()));
    }

    #[test]
    fn older_records_fill_in_derived_fields() {
        let raw = r#"[
            {"type": "running", "coords": [48.39, -4.49], "distance": 4, "duration": 21,
             "cadence": 170, "date": "2024-03-05T09:07:00.000Z", "id": "1", "pace": 5.25,
             "description": "Running on March 5 | 10:07", "clicks": 0},
            {"type": "cycling", "coords": [48.4, -4.5], "distance": 30, "duration": 60,
             "elevationGain": 300, "date": "2024-03-06T09:07:00.000Z"},
            {"type": "running", "coords": [48.41, -4.51], "distance": 5, "duration": 25,
             "date": "2024-03-07T09:07:00.000Z", "id": "3"}
        ]"#;

        let mut store = MemoryStore::new();
        store.set(WORKOUTS_KEY, raw).unwrap();
        let loaded = load(&store).unwrap();

        // the running record without a cadence can't be shown
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "1");

        let cycling = &loaded[1];
        assert_eq!(cycling.clicks, 0);
        assert_eq!(
            cycling.kind,
            WorkoutKind::Cycling {
                elevation_gain: 300.0,
                speed: 30.0
            }
        );
        assert_eq!(cycling.id, types::id_from_timestamp(&cycling.date));
        assert_eq!(cycling.description, types::describe(WorkoutType::Cycling, &cycling.date));
    }

    #[test]
    fn record_without_clicks_survives_next_save() {
        let older = r#"[
            {"type": "running", "coords": [48.39, -4.49], "distance": 5, "duration": 25,
             "cadence": 170, "pace": 5, "date": "2024-03-05T09:07:00.000Z", "id": "1",
             "description": "Running on March 5 | 10:07", "clicks": 2},
            {"type": "cycling", "coords": [48.4, -4.5], "distance": 30, "duration": 60,
             "elevationGain": 300, "speed": 30, "date": "2024-03-06T09:07:00.000Z", "id": "2",
             "description": "Cycling on March 6 | 10:07"}
        ]"#;

        let mut store = MemoryStore::new();
        store.set(WORKOUTS_KEY, older).unwrap();

        let mut workouts = load(&store).unwrap();
        assert_eq!(workouts.len(), 2);
        workouts.push(Workout::running(Coords::new(48.5, -4.6), 10.0, 50.0, 165.0));
        save(&mut store, &workouts).unwrap();

        let reloaded = load(&store).unwrap();
        let ids: Vec<&str> = reloaded.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(&ids[..2], ["1", "2"]);
        assert_eq!(reloaded[0].clicks, 2);
    }

    #[test]
    fn stored_null_loads_nothing() {
        let mut store = MemoryStore::new();
        store.set(WORKOUTS_KEY, "null").unwrap();
        assert!(load(&store).is_none());
    }

    #[test]
    fn reads_browser_shaped_records() {
        let raw = r#"[{
            "date": "2024-03-05T09:07:00.000Z",
            "id": "9629620123",
            "clicks": 0,
            "coords": [48.39, -4.49],
            "distance": 5,
            "duration": 25,
            "type": "running",
            "cadence": 170,
            "pace": 5,
            "description": "Running on March 5 | 10:07"
        }]"#;

        let mut store = MemoryStore::new();
        store.set(WORKOUTS_KEY, raw).unwrap();

        let loaded = load(&store).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded[0].kind,
            WorkoutKind::Running {
                cadence: 170.0,
                pace: 5.0
            }
        );
        assert_eq!(loaded[0].describe(), "Running on March 5 | 10:07");
    }

    #[test]
    fn reset_removes_entry() {
        let mut store = MemoryStore::new();
        save(&mut store, &sample()).unwrap();
        reset(&mut store).unwrap();
        assert!(load(&store).is_none());
    }
}
