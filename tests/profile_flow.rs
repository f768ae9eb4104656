mod common;

use common::validation_field;
use time::macros::{date, datetime};
use time::UtcOffset;
use uuid::Uuid;

use vitalog::profile::dto::{CompleteProfileRequest, ProfileResponse};
use vitalog::profile::service;
use vitalog::store::memory::MemStore;

fn request(birth_date: &str, height: f64, weight: f64) -> CompleteProfileRequest {
    CompleteProfileRequest {
        birth_date: birth_date.into(),
        initial_height: height,
        initial_weight: weight,
    }
}

#[tokio::test]
async fn missing_profile_is_an_incomplete_shell_not_an_error() {
    let store = MemStore::new();
    let user_id = Uuid::new_v4();

    let found = service::find_profile(&store, user_id)
        .await
        .expect("read should succeed");
    assert!(found.is_none());

    let shell = ProfileResponse::shell(user_id);
    assert!(!shell.completed);
    assert!(shell.birth_date.is_none());
    assert!(shell.initial_height.is_none());
}

#[tokio::test]
async fn completion_persists_and_marks_completed() {
    let store = MemStore::new();
    let user_id = Uuid::new_v4();
    let now = datetime!(2024-05-01 12:00 UTC);

    let profile = service::complete_profile(
        &store,
        user_id,
        request("1990-06-15", 180.0, 75.0),
        now,
        UtcOffset::UTC,
    )
    .await
    .expect("completion should succeed");

    assert!(profile.completed);
    assert_eq!(profile.birth_date, date!(1990 - 06 - 15));

    let stored = service::find_profile(&store, user_id)
        .await
        .expect("read should succeed")
        .expect("profile should be stored");
    assert!(stored.completed);
    assert_eq!(stored.initial_height, 180.0);
    assert_eq!(stored.initial_weight, 75.0);
}

#[tokio::test]
async fn recompletion_overwrites_stored_values() {
    let store = MemStore::new();
    let user_id = Uuid::new_v4();

    service::complete_profile(
        &store,
        user_id,
        request("1990-06-15", 180.0, 75.0),
        datetime!(2024-05-01 12:00 UTC),
        UtcOffset::UTC,
    )
    .await
    .expect("first completion");

    service::complete_profile(
        &store,
        user_id,
        request("1991-01-01", 179.0, 80.0),
        datetime!(2024-05-02 12:00 UTC),
        UtcOffset::UTC,
    )
    .await
    .expect("second completion");

    let stored = service::find_profile(&store, user_id)
        .await
        .expect("read")
        .expect("stored");
    assert_eq!(stored.birth_date, date!(1991 - 01 - 01));
    assert_eq!(stored.initial_weight, 80.0);
    assert!(stored.completed);
}

#[tokio::test]
async fn rejects_out_of_range_height() {
    let store = MemStore::new();
    let err = service::complete_profile(
        &store,
        Uuid::new_v4(),
        request("1990-06-15", 10.0, 75.0),
        datetime!(2024-05-01 12:00 UTC),
        UtcOffset::UTC,
    )
    .await
    .unwrap_err();
    assert_eq!(validation_field(err), "initial_height");
}

#[tokio::test]
async fn rejects_birth_date_in_the_future() {
    let store = MemStore::new();
    // One day after "today" as seen through the UTC day boundary.
    let err = service::complete_profile(
        &store,
        Uuid::new_v4(),
        request("2024-05-02", 180.0, 75.0),
        datetime!(2024-05-01 23:59 UTC),
        UtcOffset::UTC,
    )
    .await
    .unwrap_err();
    assert_eq!(validation_field(err), "birth_date");
}

#[tokio::test]
async fn rejects_malformed_birth_date() {
    let store = MemStore::new();
    let err = service::complete_profile(
        &store,
        Uuid::new_v4(),
        request("15.06.1990", 180.0, 75.0),
        datetime!(2024-05-01 12:00 UTC),
        UtcOffset::UTC,
    )
    .await
    .unwrap_err();
    assert_eq!(validation_field(err), "birth_date");
}

#[tokio::test]
async fn reports_first_failing_field_in_declaration_order() {
    let store = MemStore::new();
    let user_id = Uuid::new_v4();

    // Both birth_date and height are invalid; birth_date wins.
    let err = service::complete_profile(
        &store,
        user_id,
        request("not-a-date", 10.0, 1000.0),
        datetime!(2024-05-01 12:00 UTC),
        UtcOffset::UTC,
    )
    .await
    .unwrap_err();
    assert_eq!(validation_field(err), "birth_date");

    // With a valid birth_date, height is reported before weight.
    let err = service::complete_profile(
        &store,
        user_id,
        request("1990-06-15", 10.0, 1000.0),
        datetime!(2024-05-01 12:00 UTC),
        UtcOffset::UTC,
    )
    .await
    .unwrap_err();
    assert_eq!(validation_field(err), "initial_height");

    // Nothing was written for any failed attempt.
    assert!(service::find_profile(&store, user_id)
        .await
        .expect("read")
        .is_none());
}
