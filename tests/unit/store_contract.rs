/// The same Habit Store contract checked against both backends
use chrono::NaiveDate;
use habit_streaks::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn backends() -> Vec<(&'static str, Box<dyn HabitStorage>)> {
    vec![
        ("memory", Box::new(MemoryStorage::new())),
        ("sqlite", Box::new(SqliteStorage::open_in_memory().unwrap())),
    ]
}

fn habit(title: &str, periodicity: Periodicity) -> Habit {
    Habit::new(title.to_string(), format!("{} every period", title), periodicity, date(2023, 8, 1)).unwrap()
}

#[test]
fn create_get_and_duplicate_key() {
    for (name, storage) in backends() {
        storage.create_habit(&habit("walk", Periodicity::Daily)).unwrap();

        let stored = storage.get_habit("walk").unwrap().expect(name);
        assert_eq!(stored.description, "walk every period", "{}", name);
        assert_eq!((stored.streak_count, stored.longest_streak), (0, 0), "{}", name);

        let duplicate = storage.create_habit(&habit("walk", Periodicity::Weekly));
        assert!(
            matches!(duplicate, Err(StorageError::DuplicateKey { .. })),
            "{}",
            name
        );
        assert!(storage.get_habit("nothing").unwrap().is_none(), "{}", name);
    }
}

#[test]
fn latest_completion_and_cascade_delete() {
    for (name, storage) in backends() {
        storage.create_habit(&habit("walk", Periodicity::Daily)).unwrap();
        storage.create_habit(&habit("swim", Periodicity::Weekly)).unwrap();

        for day in [3, 9, 5] {
            storage.add_completion("walk", date(2023, 8, day)).unwrap();
        }
        storage.add_completion("swim", date(2023, 8, 8)).unwrap();

        assert_eq!(
            storage.latest_completion_date("walk").unwrap(),
            Some(date(2023, 8, 9)),
            "{}",
            name
        );

        storage.delete_habit("walk").unwrap();
        assert!(storage.get_habit("walk").unwrap().is_none(), "{}", name);
        assert!(storage.get_completions("walk").unwrap().is_empty(), "{}", name);
        assert_eq!(storage.latest_completion_date("walk").unwrap(), None, "{}", name);

        // Other habits keep their history
        assert_eq!(storage.get_completions("swim").unwrap().len(), 1, "{}", name);
    }
}

#[test]
fn engine_runs_against_any_backend() {
    let engine = StreakEngine::new();

    for (name, storage) in backends() {
        storage.create_habit(&habit("walk", Periodicity::Daily)).unwrap();

        engine.record_completion(storage.as_ref(), "walk", date(2023, 8, 2)).unwrap();
        let outcome = engine
            .record_completion(storage.as_ref(), "walk", date(2023, 8, 3))
            .unwrap();

        assert_eq!((outcome.streak_count, outcome.longest_streak), (2, 2), "{}", name);
        assert_eq!(storage.get_completions("walk").unwrap().len(), 2, "{}", name);
    }
}
