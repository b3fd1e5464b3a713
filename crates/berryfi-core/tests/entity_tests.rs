//! Integration tests for the entity read/write surface and Type bulk inserts.

#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use berryfi_core::{BerryfiError, CommandOutcome, Inserted, Type, Workspace};
use common::{MockExecutor, object};
use serde_json::{Map, Value, json};

fn person(workspace: &mut Workspace) -> &mut Type {
    workspace.type_by_id_mut("t-person").unwrap()
}

// =============================================================================
// FIELD ACCESS
// =============================================================================

#[test]
fn validate_returns_an_independent_copy() {
    let mut workspace = common::workspace();
    let entity = person(&mut workspace)
        .make_entity(object(json!({"MyApp/Name": "Ann"})))
        .unwrap();

    let mut snapshot = entity.validate().unwrap();
    assert_eq!(snapshot.get("MyApp/Name"), Some(&json!("Ann")));
    assert_eq!(&snapshot, entity.data());

    snapshot.insert("MyApp/Name".to_string(), json!("Changed"));
    assert_eq!(entity.get_field("name"), Some(&json!("Ann")));
}

#[test]
fn field_names_resolve_case_insensitively() {
    let workspace = common::workspace();
    let ty = workspace.type_by_id("t-person").unwrap();
    assert_eq!(ty.resolve("user email"), Some("MyApp/User email"));
    assert_eq!(ty.resolve("User Email"), Some("MyApp/User email"));
    assert_eq!(ty.resolve("nonexistent"), None);
}

#[test]
fn read_only_fields_can_be_read_but_not_written() {
    let mut workspace = common::workspace();
    let entity = person(&mut workspace)
        .make_entity(object(json!({"fibery/public-id": "12", "name": "Ann"})))
        .unwrap();

    assert_eq!(entity.get_field("public-id"), Some(&json!("12")));
    assert_eq!(entity.public_id(), Some("12"));

    let err = entity.set_field("Public-Id", json!("13")).unwrap_err();
    assert_eq!(err.to_string(), "Field 'fibery/public-id' is read-only");
    assert_eq!(entity.public_id(), Some("12"));
}

#[test]
fn unknown_writes_list_valid_fields() {
    let mut workspace = common::workspace();
    let entity = person(&mut workspace).make_entity(Map::new()).unwrap();

    let err = entity.set_field("shoe size", json!(44)).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Invalid field 'shoe size' on MyApp/Person"));
    assert!(message.contains("MyApp/User email"));
}

#[test]
fn entity_getters_delegate_to_type_and_app() {
    let mut workspace = common::workspace();
    let entity = person(&mut workspace)
        .make_entity(object(json!({"fibery/id": "750bb3e0-a851-11ea-9163-48203d178ac1"})))
        .unwrap();

    assert_eq!(entity.app_name(), Some("MyApp"));
    assert_eq!(entity.type_name(), "MyApp/Person");
    assert_eq!(entity.type_label(), "Person");
    assert_eq!(entity.type_id(), "t-person");
    assert_eq!(entity.created().map(|d| d.timestamp()), Some(1_591_487_839));
    assert_eq!(entity.rank(), None);
    assert_eq!(entity.modified(), None);
}

// =============================================================================
// REMOTE OPERATIONS
// =============================================================================

#[tokio::test]
async fn insert_strips_null_and_read_only_fields() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::ok(json!({
        "fibery/id": "e1",
        "fibery/public-id": "1",
        "MyApp/Name": "Ann"
    }))]);

    let entity = person(&mut workspace)
        .make_entity(object(json!({
            "fibery/id": "e1",
            "fibery/public-id": "99",
            "MyApp/Name": "Ann",
            "MyApp/Secret": null
        })))
        .unwrap();
    entity.insert(&executor).await.unwrap();

    let command = executor.last_command();
    assert_eq!(command.command, "fibery.entity/create");
    let args = command.args.unwrap();
    assert_eq!(args["type"], "MyApp/Person");
    assert_eq!(
        args["entity"],
        json!({"fibery/id": "e1", "MyApp/Name": "Ann"})
    );

    assert_eq!(entity.public_id(), Some("1"));
}

#[tokio::test]
async fn push_sends_update_and_keeps_local_state() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::ok(json!({"fibery/id": "e1"}))]);

    let entity = person(&mut workspace)
        .make_entity(object(json!({"fibery/id": "e1", "name": "Ann"})))
        .unwrap();
    entity.set_field("user email", json!("ann@example.com")).unwrap();
    let response = entity.push(&executor).await.unwrap();

    assert_eq!(response, json!({"fibery/id": "e1"}));
    let command = executor.last_command();
    assert_eq!(command.command, "fibery.entity/update");
    assert_eq!(
        command.args.unwrap()["entity"]["MyApp/User email"],
        "ann@example.com"
    );
    assert_eq!(entity.get_field("name"), Some(&json!("Ann")));
}

#[tokio::test]
async fn pull_replaces_local_state() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::ok(json!([{
        "fibery/id": "e1",
        "MyApp/Name": "Ann (remote)",
        "fibery/public-id": "3"
    }]))]);

    let entity = person(&mut workspace)
        .make_entity(object(json!({"fibery/id": "e1", "MyApp/Name": "Ann"})))
        .unwrap();
    entity.pull(&executor).await.unwrap();

    assert_eq!(entity.get_field("name"), Some(&json!("Ann (remote)")));
    assert_eq!(entity.public_id(), Some("3"));

    let args = executor.last_command().args.unwrap();
    assert_eq!(args["query"]["q/from"], "MyApp/Person");
    assert_eq!(args["query"]["q/limit"], 1);
    assert_eq!(args["params"]["$id"], "e1");
}

#[tokio::test]
async fn pull_of_missing_entity_fails() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::ok(json!([]))]);

    let entity = person(&mut workspace)
        .make_entity(object(json!({"fibery/id": "gone"})))
        .unwrap();
    let err = entity.pull(&executor).await.unwrap_err();
    assert!(matches!(err, BerryfiError::EntityNotFound(ref id) if id == "gone"));
}

#[tokio::test]
async fn pull_with_foreign_keys_keeps_local_state() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::ok(json!([{
        "fibery/id": "e1",
        "Other/Thing": 1
    }]))]);

    let entity = person(&mut workspace)
        .make_entity(object(json!({"fibery/id": "e1", "MyApp/Name": "Ann"})))
        .unwrap();
    let before = entity.data().clone();

    let err = entity.pull(&executor).await.unwrap_err();
    assert!(matches!(err, BerryfiError::FieldMismatch { ref key, .. } if key == "Other/Thing"));
    assert_eq!(entity.data(), &before);
    assert_eq!(entity.get_field("name"), Some(&json!("Ann")));
    assert!(entity.validate().is_ok());
}

#[tokio::test]
async fn failed_command_surfaces_its_message() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::failed("bad")]);

    let entity = person(&mut workspace)
        .make_entity(object(json!({"name": "Ann"})))
        .unwrap();
    let err = entity.insert(&executor).await.unwrap_err();
    assert!(matches!(err, BerryfiError::Batch(_)));
    assert!(err.to_string().contains("bad"));
    assert!(err.to_string().contains("fibery.entity/create"));
}

// =============================================================================
// TYPE BULK INSERT
// =============================================================================

#[tokio::test]
async fn single_insert_returns_raw_results() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::ok(json!({"fibery/id": "e1", "MyApp/Name": "Ann"}))]);

    let ty = person(&mut workspace);
    let inserted = ty
        .insert(&executor, object(json!({"MyApp/Name": "Ann"})), false)
        .await
        .unwrap();

    assert_eq!(
        inserted,
        Inserted::Raw(vec![json!({"fibery/id": "e1", "MyApp/Name": "Ann"})])
    );
    assert_eq!(executor.last_command().command, "fibery.entity/create");
    assert!(ty.entity("e1").is_some());
}

#[tokio::test]
async fn array_insert_sends_one_batch() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::ok(json!([
        {"fibery/id": "e1", "MyApp/Name": "Ann"},
        {"fibery/id": "e2", "MyApp/Name": "Bob"}
    ]))]);

    let ty = person(&mut workspace);
    let records = vec![
        object(json!({"MyApp/Name": "Ann"})),
        object(json!({"MyApp/Name": "Bob"})),
    ];
    let inserted = ty.insert(&executor, records, true).await.unwrap();

    let requests = executor.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].len(), 1);
    assert_eq!(requests[0][0].command, "fibery.command/batch");

    let Inserted::Entities(entities) = inserted else {
        panic!("expected entities");
    };
    let names: Vec<Option<&Value>> = entities.iter().map(|e| e.get_field("name")).collect();
    assert_eq!(names, [Some(&json!("Ann")), Some(&json!("Bob"))]);
    assert_eq!(ty.entities().len(), 2);
}

#[tokio::test]
async fn bulk_insert_resolves_keys_like_entities() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::ok(json!([
        {"fibery/id": "e1", "MyApp/Name": "Ann"},
        {"fibery/id": "e2", "MyApp/Name": "Bob"}
    ]))]);

    let ty = person(&mut workspace);
    let records = vec![
        object(json!({"name": "Ann", "user email": null, "public-id": "9"})),
        object(json!({"NAME": "Bob", "Secret": "x"})),
    ];
    ty.insert(&executor, records, false).await.unwrap();

    let batch = executor.last_command().args.unwrap();
    let sent: Vec<&Value> = batch["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|command| &command["args"]["entity"])
        .collect();
    assert_eq!(sent[0], &json!({"MyApp/Name": "Ann"}));
    assert_eq!(sent[1], &json!({"MyApp/Name": "Bob", "MyApp/Secret": "x"}));
}

#[tokio::test]
async fn bulk_insert_rejects_unknown_keys_before_sending() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();

    let ty = person(&mut workspace);
    let err = ty
        .insert(&executor, object(json!({"nickname": "Annie"})), false)
        .await
        .unwrap_err();

    assert!(matches!(err, BerryfiError::FieldMismatch { ref key, .. } if key == "nickname"));
    assert!(executor.requests().is_empty());
    assert!(ty.entities().is_empty());
}

#[tokio::test]
async fn batch_failures_are_aggregated() {
    let mut workspace = common::workspace();
    let executor = MockExecutor::new();
    executor.respond(vec![CommandOutcome::failed("duplicate name")]);

    let ty = person(&mut workspace);
    let err = ty
        .insert(&executor, vec![object(json!({"MyApp/Name": "Ann"}))], false)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("duplicate name"));
    assert!(ty.entities().is_empty());
}
