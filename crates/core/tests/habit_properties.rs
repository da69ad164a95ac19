use chrono::{Duration, NaiveDate, TimeZone, Utc};
use habits_core::habit::{
    CreateHabit, FrequencyType, HabitPatch, HabitRecord, HabitStatus, UpdateHabit, WeekDay,
};
use habits_core::query::{self, HabitListQuery, HabitOrder, StatusFilter};
use habits_core::validation::{
    apply_update, validate_for_create, validate_for_update, ViolationCode,
};
use proptest::prelude::*;
use serde_json::Number;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[ ]{0,3}[A-Za-zÀ-ÿ][A-Za-zÀ-ÿ ]{0,40}[ ]{0,3}"
}

fn week_days_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(proptest::sample::select(WeekDay::ALL), 1..10)
        .prop_map(|days| days.into_iter().map(|d| d.as_str().to_string()).collect())
}

fn month_days_strategy() -> impl Strategy<Value = Vec<Number>> {
    proptest::collection::vec((1i64..=31).prop_map(Number::from), 1..10)
}

fn valid_payload() -> impl Strategy<Value = CreateHabit> {
    (
        name_strategy(),
        proptest::option::of("[a-z ]{0,60}"),
        proptest::sample::select(FrequencyType::ALL),
        week_days_strategy(),
        month_days_strategy(),
        proptest::option::of((0u8..24, 0u8..60)),
        proptest::option::of((1i64..=1440).prop_map(Number::from)),
        0i64..400,
        proptest::option::of(1i64..1000),
    )
        .prop_map(
            |(name, description, frequency, week_days, month_days, time, minutes, offset, category)| {
                CreateHabit {
                    name,
                    description,
                    frequency_type: frequency.as_str().to_string(),
                    week_days: Some(week_days),
                    month_days: Some(month_days),
                    scheduled_time: time.map(|(h, m)| format!("{h}:{m:02}")),
                    estimated_minutes: minutes,
                    start_date: (today() + Duration::days(offset)).to_string(),
                    category_id: category,
                }
            },
        )
}

fn sample_record(id: i64, owner_id: i64, name: String, status: HabitStatus) -> HabitRecord {
    let created_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(id % 7);
    HabitRecord {
        id,
        owner_id,
        name,
        description: None,
        frequency_type: FrequencyType::Daily,
        week_days: Some(vec![WeekDay::Monday]),
        month_days: None,
        scheduled_time: None,
        estimated_minutes: None,
        start_date: today() + Duration::days(id % 5),
        category_id: if id % 2 == 0 { Some(1) } else { None },
        status,
        created_at,
        updated_at: created_at,
    }
}

fn records_strategy() -> impl Strategy<Value = Vec<HabitRecord>> {
    proptest::collection::vec(
        (
            1i64..3,
            "[A-Za-z]{1,8}",
            proptest::sample::select(HabitStatus::ALL),
        ),
        0..20,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (owner, name, status))| sample_record(i as i64 + 1, owner, name, status))
            .collect()
    })
}

fn order_strategy() -> impl Strategy<Value = Option<HabitOrder>> {
    proptest::option::of(proptest::sample::select(vec![
        HabitOrder::NameAsc,
        HabitOrder::NameDesc,
        HabitOrder::StartDateAsc,
        HabitOrder::StartDateDesc,
        HabitOrder::CreatedAtAsc,
        HabitOrder::CreatedAtDesc,
    ]))
}

proptest! {
    #[test]
    fn week_frequencies_without_week_days_are_rejected(
        mut payload in valid_payload(),
        weekly in any::<bool>(),
        empty in any::<bool>(),
    ) {
        payload.frequency_type = if weekly { "semanal" } else { "diaria" }.to_string();
        payload.week_days = if empty { Some(Vec::new()) } else { None };

        let err = validate_for_create(&payload, today()).unwrap_err();
        prop_assert_eq!(err.code, ViolationCode::MissingWeekDays);
    }

    #[test]
    fn monthly_without_month_days_is_rejected(mut payload in valid_payload(), empty in any::<bool>()) {
        payload.frequency_type = "mensal".to_string();
        payload.month_days = if empty { Some(Vec::new()) } else { None };

        let err = validate_for_create(&payload, today()).unwrap_err();
        prop_assert_eq!(err.code, ViolationCode::MissingMonthDays);
    }

    #[test]
    fn normalization_is_idempotent(payload in valid_payload()) {
        let first = validate_for_create(&payload, today()).unwrap();
        let second = validate_for_create(&CreateHabit::from(&first), today()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn apply_update_touches_only_patched_fields(
        payload in valid_payload(),
        new_name in proptest::option::of("[A-Za-z]{1,20}"),
        new_minutes in proptest::option::of(proptest::option::of(1i32..=1440)),
        new_status in proptest::option::of(proptest::sample::select(HabitStatus::ALL)),
        new_category in proptest::option::of(proptest::option::of(1i64..100)),
    ) {
        let habit = validate_for_create(&payload, today()).unwrap();
        let existing = HabitRecord::from_new(1, 1, habit, Utc::now());
        let patch = HabitPatch {
            name: new_name.clone(),
            estimated_minutes: new_minutes,
            status: new_status,
            category_id: new_category,
            ..HabitPatch::default()
        };

        let updated = apply_update(&existing, &patch);

        prop_assert_eq!(&updated.name, new_name.as_ref().unwrap_or(&existing.name));
        prop_assert_eq!(updated.estimated_minutes, new_minutes.unwrap_or(existing.estimated_minutes));
        prop_assert_eq!(updated.status, new_status.unwrap_or(existing.status));
        prop_assert_eq!(updated.category_id, new_category.unwrap_or(existing.category_id));
        prop_assert_eq!(&updated.description, &existing.description);
        prop_assert_eq!(updated.frequency_type, existing.frequency_type);
        prop_assert_eq!(&updated.week_days, &existing.week_days);
        prop_assert_eq!(&updated.month_days, &existing.month_days);
        prop_assert_eq!(&updated.scheduled_time, &existing.scheduled_time);
        prop_assert_eq!(updated.start_date, existing.start_date);
        prop_assert_eq!(updated.created_at, existing.created_at);
    }

    #[test]
    fn update_validation_accepts_past_start_dates(
        days_ago in 1i64..10_000,
        current in proptest::sample::select(FrequencyType::ALL),
    ) {
        let input = UpdateHabit {
            start_date: Some((today() - Duration::days(days_ago)).to_string()),
            ..Default::default()
        };
        prop_assert!(validate_for_update(&input, current).is_ok());
    }

    #[test]
    fn update_ignores_any_unused_day_list(
        week_days in proptest::collection::vec("[a-z]{0,8}", 0..4),
        month_days in proptest::collection::vec(-50i64..50, 0..4),
        current in proptest::sample::select(FrequencyType::ALL),
    ) {
        let input = if current.uses_week_days() {
            UpdateHabit {
                month_days: Some(Some(month_days.into_iter().map(Number::from).collect())),
                ..Default::default()
            }
        } else {
            UpdateHabit { week_days: Some(Some(week_days)), ..Default::default() }
        };
        let patch = validate_for_update(&input, current).unwrap();
        prop_assert_eq!(patch, HabitPatch::default());
    }

    #[test]
    fn listing_is_deterministic(records in records_strategy(), order in order_strategy(), owner in 1i64..3) {
        let q = HabitListQuery { order, ..HabitListQuery::default() };
        let first = query::list(&records, owner, &q);
        let second = query::list(&records, owner, &q);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn absent_status_filter_means_all(records in records_strategy(), order in order_strategy()) {
        let absent = HabitListQuery { order, ..HabitListQuery::default() };
        let all = HabitListQuery { status: StatusFilter::All, order, ..HabitListQuery::default() };
        prop_assert_eq!(query::list(&records, 1, &absent), query::list(&records, 1, &all));
    }

    #[test]
    fn listing_never_leaks_other_owners(records in records_strategy(), owner in 1i64..3) {
        let listed = query::list(&records, owner, &HabitListQuery::default());
        prop_assert!(listed.iter().all(|r| r.owner_id == owner));
    }
}
