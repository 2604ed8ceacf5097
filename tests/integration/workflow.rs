/// Create → complete → report → delete through the tool layer
use chrono::NaiveDate;
use habit_streaks::*;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create(storage: &SqliteStorage, title: &str, periodicity: &str, created: &str, today: NaiveDate) {
    create_habit(
        storage,
        CreateHabitParams {
            title: title.to_string(),
            description: Some(format!("{} habit", periodicity)),
            periodicity: periodicity.to_string(),
            creation_date: Some(created.to_string()),
        },
        today,
    )
    .expect("create");
}

fn complete(
    storage: &SqliteStorage,
    title: &str,
    day: &str,
    today: NaiveDate,
) -> Result<CompletionOutcome, ToolError> {
    complete_habit(
        storage,
        &StreakEngine::new(),
        CompleteHabitParams {
            title: title.to_string(),
            completed_at: Some(day.to_string()),
        },
        today,
    )
}

#[tokio::test]
async fn full_habit_lifecycle() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = HabitTrackerServer::new(temp_file.path().to_path_buf())
        .await
        .expect("Failed to create server");
    let storage = server.storage();
    let today = date(2023, 8, 31);

    create(storage, "meditate", "daily", "2023-08-01", today);
    create(storage, "review", "weekly", "2023-08-02", today);

    // Daily scenario
    let first = complete(storage, "meditate", "2023-08-02", today).unwrap();
    assert_eq!((first.streak_count, first.longest_streak), (1, 1));
    let second = complete(storage, "meditate", "2023-08-03", today).unwrap();
    assert_eq!((second.streak_count, second.longest_streak), (2, 2));
    let third = complete(storage, "meditate", "2023-08-05", today).unwrap();
    assert_eq!(third.transition, StreakTransition::Broken);
    assert_eq!((third.streak_count, third.longest_streak), (1, 2));

    // Weekly scenario
    let on_boundary = complete(storage, "review", "2023-08-09", today).unwrap();
    assert_eq!(on_boundary.transition, StreakTransition::Continued);
    let late = complete(storage, "review", "2023-08-25", today).unwrap();
    assert_eq!(late.transition, StreakTransition::Broken);
    assert_eq!(late.streak_count, 1);

    // Reports
    let listing = list_habits(storage, ListHabitsParams { periodicity: Some("daily".to_string()) }).unwrap();
    assert_eq!(listing.habits.len(), 1);
    assert_eq!(listing.habits[0].longest_streak, 2);

    let board = streak_report(storage, server.analytics(), StreaksParams::default()).unwrap();
    match board.data {
        StreakReportData::Leaderboard { boards } => {
            assert_eq!(boards[0].standings[0].title, "meditate");
            assert_eq!(boards[0].standings[0].streak, 2);
            assert_eq!(boards[1].standings[0].title, "review");
        }
        other => panic!("unexpected report: {:?}", other),
    }

    // Delete cascades
    let deleted = delete_habit(storage, DeleteHabitParams { title: "meditate".to_string() }).unwrap();
    assert_eq!(deleted.removed_completions, 3);
    assert!(storage.get_habit("meditate").unwrap().is_none());
    assert!(storage.get_completions("meditate").unwrap().is_empty());
    assert!(matches!(
        complete(storage, "meditate", "2023-08-06", today),
        Err(ToolError::Storage(StorageError::HabitNotFound { .. }))
    ));
}

#[test]
fn input_layer_guards_engine_preconditions() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path().to_path_buf()).expect("Failed to create storage");
    let today = date(2023, 8, 10);

    create(&storage, "journal", "weekly", "2023-08-05", today);

    for bad in ["2023-08-04", "2023-08-11", "2023-02-30", "last week"] {
        assert!(
            matches!(complete(&storage, "journal", bad, today), Err(ToolError::Validation(_))),
            "{} should be rejected",
            bad
        );
    }
    assert!(storage.get_completions("journal").unwrap().is_empty());
}
