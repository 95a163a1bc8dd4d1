use mapty::persistence::{self, WORKOUTS_KEY};
use mapty::store::{KeyValueStore, SqliteStore};
use mapty::types::{Coords, Workout, WorkoutType};
use tempfile::TempDir;

fn sample() -> Vec<Workout> {
    vec![
        Workout::running(Coords::new(48.39, -4.49), 5.2, 24.0, 178.0),
        Workout::cycling(Coords::new(48.40, -4.48), 27.0, 95.0, 523.0),
    ]
}

#[test]
fn workouts_survive_reopening_the_file() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let path = tmp.path().join("mapty.db");

    let saved = sample();
    {
        let mut store = SqliteStore::open(&path).unwrap();
        persistence::save(&mut store, &saved).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let loaded = persistence::load(&store).expect("stored workouts");

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].workout_type(), WorkoutType::Running);
    assert_eq!(loaded[1].workout_type(), WorkoutType::Cycling);
    for (a, b) in saved.iter().zip(&loaded) {
        assert_eq!(a.coords, b.coords);
        assert_eq!(a.distance, b.distance);
        assert_eq!(a.duration, b.duration);
        assert_eq!(a.derived_metric_value(), b.derived_metric_value());
    }
}

#[test]
fn reset_is_persistent() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let path = tmp.path().join("mapty.db");

    {
        let mut store = SqliteStore::open(&path).unwrap();
        persistence::save(&mut store, &sample()).unwrap();
        persistence::reset(&mut store).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.get(WORKOUTS_KEY).unwrap(), None);
    assert!(persistence::load(&store).is_none());
}

#[test]
fn open_fails_for_missing_directory() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let path = tmp.path().join("nope").join("mapty.db");
    assert!(SqliteStore::open(&path).is_err());
}
