use super::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

fn make_test_log(action_id: &str, action_type: ActionType, target_id: &str, minute: u32) -> ActionLog {
    ActionLog {
        action_id: action_id.to_string(),
        action_type: action_type.to_string(),
        action_ts: NaiveDate::from_ymd_opt(2024, 11, 8)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap(),
        actor: "qa_officer".to_string(),
        target_id: Some(target_id.to_string()),
        payload_json: Some(json!({ "delivery_id": target_id })),
        detail: Some("Test log".to_string()),
    }
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = ActionLogRepository::new(setup_test_db());

    let log = make_test_log("log1", ActionType::ApproveDelivery, "f2", 0);
    assert_eq!(repo.insert(&log).unwrap(), "log1");

    let found = repo.find_by_id("log1").unwrap().unwrap();
    assert_eq!(found.action_type, "APPROVE_DELIVERY");
    assert_eq!(found.target_id.as_deref(), Some("f2"));
    assert_eq!(found.action_ts, log.action_ts);
    assert_eq!(found.payload_json, Some(json!({ "delivery_id": "f2" })));

    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_find_by_target_in_time_order() {
    let repo = ActionLogRepository::new(setup_test_db());

    repo.insert(&make_test_log("log2", ActionType::ApproveDelivery, "f2", 5)).unwrap();
    repo.insert(&make_test_log("log1", ActionType::TrackDelivery, "f2", 1)).unwrap();
    repo.insert(&make_test_log("log3", ActionType::TrackDelivery, "f3", 2)).unwrap();

    let logs = repo.find_by_target("f2").unwrap();
    let ids: Vec<&str> = logs.iter().map(|l| l.action_id.as_str()).collect();
    assert_eq!(ids, vec!["log1", "log2"]);
}

#[test]
fn test_find_by_action_type_and_count() {
    let repo = ActionLogRepository::new(setup_test_db());

    repo.insert(&make_test_log("log1", ActionType::TrackDelivery, "f1", 1)).unwrap();
    repo.insert(&make_test_log("log2", ActionType::TrackDelivery, "f2", 2)).unwrap();
    repo.insert(&make_test_log("log3", ActionType::RejectDelivery, "f2", 3)).unwrap();

    let tracked = repo.find_by_action_type("TRACK_DELIVERY", 10).unwrap();
    assert_eq!(tracked.len(), 2);
    assert_eq!(tracked[0].action_id, "log2");
    assert_eq!(repo.count_by_action_type("REJECT_DELIVERY").unwrap(), 1);
    assert_eq!(repo.count_by_action_type("SUBMIT_SURVEY").unwrap(), 0);
}

#[test]
fn test_find_recent_respects_limit() {
    let repo = ActionLogRepository::new(setup_test_db());

    for i in 0..5u32 {
        repo.insert(&make_test_log(&format!("log{}", i), ActionType::TrackDelivery, "f1", i))
            .unwrap();
    }

    let recent = repo.find_recent(3).unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].action_id, "log4");
    assert!(recent[0].action_ts - recent[2].action_ts == Duration::minutes(2));
}

#[test]
fn test_now_constructor_round_trips_millis() {
    let repo = ActionLogRepository::new(setup_test_db());

    let log = ActionLog::now(ActionType::ReadingClamped, "system", Some("f9"), None, None);
    repo.insert(&log).unwrap();

    let found = repo.find_by_id(&log.action_id).unwrap().unwrap();
    assert_eq!(found.action_type, "READING_CLAMPED");
    assert!((found.action_ts - log.action_ts).num_milliseconds().abs() <= 1);
}
