/// Durability of habits, counters and completions across reopen
use chrono::NaiveDate;
use habit_streaks::*;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn streak_state_survives_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("habits.db");

    {
        let storage = SqliteStorage::new(db_path.clone()).expect("Failed to open storage");
        let habit = Habit::new("floss".to_string(), String::new(), Periodicity::Daily, date(2023, 8, 1)).unwrap();
        storage.create_habit(&habit).unwrap();

        let engine = StreakEngine::new();
        engine.record_completion(&storage, "floss", date(2023, 8, 2)).unwrap();
        engine.record_completion(&storage, "floss", date(2023, 8, 3)).unwrap();
    }

    let reopened = SqliteStorage::new(db_path).expect("Failed to reopen storage");
    let habit = reopened.get_habit("floss").unwrap().unwrap();
    assert_eq!((habit.streak_count, habit.longest_streak), (2, 2));
    assert_eq!(reopened.latest_completion_date("floss").unwrap(), Some(date(2023, 8, 3)));

    // The reference date is the persisted latest completion, so the engine
    // keeps going where it left off
    let outcome = StreakEngine::new()
        .record_completion(&reopened, "floss", date(2023, 8, 4))
        .unwrap();
    assert_eq!(outcome.streak_count, 3);
}

#[test]
fn failed_completion_leaves_database_unlocked() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("habits.db");
    let storage = SqliteStorage::new(db_path.clone()).unwrap();
    let habit = Habit::new("floss".to_string(), String::new(), Periodicity::Weekly, date(2023, 8, 1)).unwrap();
    storage.create_habit(&habit).unwrap();

    let engine = StreakEngine::new();
    assert!(matches!(
        engine.record_completion(&storage, "missing", date(2023, 8, 2)),
        Err(StreakError::HabitNotFound { .. })
    ));
    assert!(matches!(
        engine.record_completion(&storage, "floss", date(2023, 8, 1)),
        Err(StreakError::AlreadyCompleted { .. })
    ));

    // A second connection can still write, so the write scope was closed
    let other = SqliteStorage::new(db_path).unwrap();
    other.add_completion("floss", date(2023, 8, 5)).unwrap();
    assert_eq!(storage.get_completions("floss").unwrap().len(), 1);
}

#[test]
fn server_opens_existing_database() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("nested").join("habits.db");
    std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();

    let first = tokio_test::block_on(HabitTrackerServer::new(db_path.clone())).unwrap();
    let habit = Habit::new("stretch".to_string(), String::new(), Periodicity::Daily, date(2023, 8, 1)).unwrap();
    first.storage().create_habit(&habit).unwrap();
    drop(first);

    let second = tokio_test::block_on(HabitTrackerServer::new(db_path)).unwrap();
    assert!(second.storage().get_habit("stretch").unwrap().is_some());
}
