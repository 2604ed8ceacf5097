/// Streak behaviour checked through the engine and the in-memory store
use chrono::{Duration, NaiveDate};
use habit_streaks::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn storage_with(title: &str, periodicity: Periodicity, created: NaiveDate) -> MemoryStorage {
    let storage = MemoryStorage::new();
    let habit = Habit::new(title.to_string(), "test".to_string(), periodicity, created).unwrap();
    storage.create_habit(&habit).unwrap();
    storage
}

#[test]
fn daily_gap_of_one_continues_and_two_breaks() {
    let engine = StreakEngine::new();
    let created = date(2023, 8, 1);

    let storage = storage_with("daily", Periodicity::Daily, created);
    engine.record_completion(&storage, "daily", created + Duration::days(1)).unwrap();
    let next = engine
        .record_completion(&storage, "daily", created + Duration::days(2))
        .unwrap();
    assert_eq!(next.transition, StreakTransition::Continued);

    let skipped = engine
        .record_completion(&storage, "daily", created + Duration::days(4))
        .unwrap();
    assert_eq!(skipped.transition, StreakTransition::Broken);
}

#[test]
fn weekly_gap_of_seven_continues_and_eight_breaks() {
    let engine = StreakEngine::new();

    for (gap, expected) in [
        (1, StreakTransition::Continued),
        (7, StreakTransition::Continued),
        (8, StreakTransition::Broken),
        (30, StreakTransition::Broken),
    ] {
        let created = date(2023, 8, 2);
        let storage = storage_with("weekly", Periodicity::Weekly, created);
        let outcome = engine
            .record_completion(&storage, "weekly", created + Duration::days(gap))
            .unwrap();
        assert_eq!(outcome.transition, expected, "gap of {} days", gap);
        assert_eq!(outcome.streak_count, 1);
    }
}

#[test]
fn longest_streak_is_monotonic_and_bounds_current_streak() {
    let engine = StreakEngine::new();
    let created = date(2023, 1, 1);
    let storage = storage_with("irregular", Periodicity::Daily, created);

    let mut day = created;
    let mut previous_longest = 0;
    // A mix of one-day and multi-day gaps
    for gap in [1, 1, 1, 3, 1, 5, 1, 1, 1, 1, 2, 1] {
        day += Duration::days(gap);
        let outcome = engine.record_completion(&storage, "irregular", day).unwrap();

        assert!(outcome.longest_streak >= previous_longest);
        assert!(outcome.streak_count <= outcome.longest_streak);
        previous_longest = outcome.longest_streak;
    }

    let habit = storage.get_habit("irregular").unwrap().unwrap();
    assert_eq!(habit.longest_streak, 5);
    assert_eq!(habit.streak_count, 2);
}

#[test]
fn repeated_date_is_rejected_without_side_effects() {
    let engine = StreakEngine::new();
    let storage = storage_with("read", Periodicity::Weekly, date(2023, 8, 1));
    engine.record_completion(&storage, "read", date(2023, 8, 6)).unwrap();

    let before = storage.get_habit("read").unwrap().unwrap();
    let completions_before = storage.get_completions("read").unwrap();

    let result = engine.record_completion(&storage, "read", date(2023, 8, 6));
    assert!(matches!(result, Err(StreakError::AlreadyCompleted { .. })));

    assert_eq!(storage.get_habit("read").unwrap().unwrap(), before);
    assert_eq!(storage.get_completions("read").unwrap(), completions_before);
}

#[test]
fn break_always_resets_to_one() {
    let engine = StreakEngine::new();
    let created = date(2023, 3, 1);
    let storage = storage_with("pushups", Periodicity::Daily, created);

    for offset in 1..=9 {
        engine
            .record_completion(&storage, "pushups", created + Duration::days(offset))
            .unwrap();
    }
    assert_eq!(storage.get_habit("pushups").unwrap().unwrap().streak_count, 9);

    let outcome = engine
        .record_completion(&storage, "pushups", created + Duration::days(20))
        .unwrap();
    assert_eq!(outcome.streak_count, 1);
    assert_eq!(outcome.longest_streak, 9);
    assert_eq!(
        outcome.notifications,
        vec![
            StreakNotification::HabitBroken { window_days: 1 },
            StreakNotification::StreakUpdated { streak_count: 1 },
        ]
    );
}
