//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use berryfi::{Berryfi, BerryfiConfig};
use berryfi_core::prelude::*;
use berryfi_core::{BerryfiError, Entity, Type};
use serde_json::{Map, Value, json};

// =============================================================================
// HELPERS
// =============================================================================

/// Parse `field=value`. Values that are valid JSON keep their JSON type;
/// anything else is taken as a plain string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), BerryfiError> {
    let (field, value) = raw.split_once('=').ok_or_else(|| {
        BerryfiError::Config(format!("Invalid assignment '{raw}'; expected FIELD=VALUE"))
    })?;
    let field = field.trim();
    if field.is_empty() {
        return Err(BerryfiError::Config(format!(
            "Invalid assignment '{raw}'; field name is empty"
        )));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((field.to_string(), value))
}

fn print_json(value: &Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn find_type<'a>(client: &'a mut Berryfi, query: &str) -> Result<&'a mut Type, BerryfiError> {
    client
        .workspace_mut()
        .lookup_type_mut(query)
        .ok_or_else(|| BerryfiError::UnknownType(query.to_string()))
}

fn apply_assignments(entity: &mut Entity, assignments: &[String]) -> Result<(), BerryfiError> {
    for raw in assignments {
        let (field, value) = parse_assignment(raw)?;
        entity.set_field(&field, value)?;
    }
    Ok(())
}

// =============================================================================
// SCHEMA COMMANDS
// =============================================================================

/// Show workspace identity and schema counts.
pub fn cmd_info(client: &Berryfi, config: &BerryfiConfig, json_mode: bool) -> Result<(), BerryfiError> {
    let workspace = client.workspace();
    let info = client.info().cloned().unwrap_or_default();

    if json_mode {
        print_json(&json!({
            "workspace": config.workspace,
            "endpoint": config.commands_url(),
            "id": info.id,
            "version": info.version,
            "meta_version": info.meta_version,
            "release": info.release,
            "maintenance": info.maintenance,
            "apps": workspace.apps().len(),
            "types": workspace.types().len(),
            "fields": workspace.fields().len(),
        }));
        return Ok(());
    }

    println!("Fibery Workspace");
    println!("================");
    println!("Workspace: {}", config.workspace);
    println!("Endpoint:  {}", config.commands_url());
    println!("Id:        {}", info.id.as_deref().unwrap_or("-"));
    println!("Version:   {}", info.version.as_deref().unwrap_or("-"));
    println!("Release:   {}", info.release.as_deref().unwrap_or("-"));
    if info.maintenance == Some(true) {
        println!("Status:    maintenance");
    }
    println!();
    println!("Apps:   {}", workspace.apps().len());
    println!("Types:  {}", workspace.types().len());
    println!("Fields: {}", workspace.fields().len());

    Ok(())
}

/// List apps and their types.
pub fn cmd_apps(client: &Berryfi, json_mode: bool) -> Result<(), BerryfiError> {
    let workspace = client.workspace();

    if json_mode {
        let apps: Vec<Value> = workspace
            .apps()
            .values()
            .map(|app| {
                let types: Vec<&str> = workspace
                    .app_types(app.id())
                    .values()
                    .copied()
                    .map(|ty| ty.label())
                    .collect();
                json!({"name": app.id(), "types": types})
            })
            .collect();
        print_json(&Value::Array(apps));
        return Ok(());
    }

    for app in workspace.apps().values() {
        println!("{} ({} types)", app.id(), app.types().len());
        for ty in workspace.app_types(app.id()).values() {
            println!("  {}", ty.label());
        }
    }
    Ok(())
}

/// List user types, optionally of one app.
pub fn cmd_types(client: &Berryfi, app: Option<&str>, json_mode: bool) -> Result<(), BerryfiError> {
    let workspace = client.workspace();
    let types = workspace.types().filter(|ty, _, _| {
        ty.is_user_created() && app.is_none_or(|wanted| ty.app() == Some(wanted))
    });

    if json_mode {
        let list: Vec<Value> = types
            .values()
            .map(|ty| json!({"id": ty.id(), "name": ty.name(), "app": ty.app()}))
            .collect();
        print_json(&Value::Array(list));
        return Ok(());
    }

    for ty in types.values() {
        println!("{:<40} {}", ty.name().unwrap_or_default(), ty.id());
    }
    Ok(())
}

/// List the fields of a type.
pub fn cmd_fields(client: &Berryfi, type_name: &str, json_mode: bool) -> Result<(), BerryfiError> {
    let ty = client
        .workspace()
        .lookup_type(type_name)
        .ok_or_else(|| BerryfiError::UnknownType(type_name.to_string()))?;

    if json_mode {
        let list: Vec<Value> = ty
            .fields()
            .values()
            .map(|field| {
                json!({
                    "id": field.id(),
                    "name": field.name(),
                    "type": field.field_type(),
                    "read_only": field.is_read_only(),
                    "required": field.required(),
                })
            })
            .collect();
        print_json(&Value::Array(list));
        return Ok(());
    }

    println!("{}", ty.name().unwrap_or_default());
    for field in ty.fields().values() {
        let mut marks = Vec::new();
        if field.is_read_only() {
            marks.push("read-only");
        }
        if field.required() {
            marks.push("required");
        }
        println!(
            "  {:<32} {:<20} {}",
            field.label(),
            field.field_type().unwrap_or("-"),
            marks.join(", ")
        );
    }
    Ok(())
}

// =============================================================================
// ENTITY COMMANDS
// =============================================================================

/// Read one entity, selecting every scalar field of its type.
pub async fn cmd_get(client: &mut Berryfi, type_name: &str, id: &str) -> Result<(), BerryfiError> {
    let executor = client.executor();
    let ty = find_type(client, type_name)?;

    let mut data: Map<String, Value> = ty
        .fields()
        .values()
        .filter(|field| !field.collection())
        .filter_map(|field| field.name())
        .map(|name| (name.to_string(), Value::Null))
        .collect();
    data.insert("fibery/id".to_string(), Value::String(id.to_string()));

    let entity = ty.make_entity(data)?;
    entity.pull(executor.as_ref()).await?;

    print_json(&Value::Object(entity.to_object()));
    Ok(())
}

/// Create an entity from field assignments.
pub async fn cmd_create(
    client: &mut Berryfi,
    type_name: &str,
    assignments: &[String],
    json_mode: bool,
) -> Result<(), BerryfiError> {
    let executor = client.executor();
    let ty = find_type(client, type_name)?;

    let entity = ty.make_entity(Map::new())?;
    apply_assignments(entity, assignments)?;
    entity.insert(executor.as_ref()).await?;

    tracing::info!(id = %entity.id(), type_name = %entity.type_name(), "entity created");
    if json_mode {
        print_json(&Value::Object(entity.data().clone()));
    } else {
        println!("{}", entity.id());
    }
    Ok(())
}

/// Update an entity from field assignments.
pub async fn cmd_update(
    client: &mut Berryfi,
    type_name: &str,
    id: &str,
    assignments: &[String],
) -> Result<(), BerryfiError> {
    let executor = client.executor();
    let ty = find_type(client, type_name)?;

    let entity = ty.make_entity(Map::from_iter([(
        "fibery/id".to_string(),
        Value::String(id.to_string()),
    )]))?;
    apply_assignments(entity, assignments)?;
    let result = entity.push(executor.as_ref()).await?;

    print_json(&result);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_parse_json_values() {
        assert_eq!(
            parse_assignment("age=24").expect("parse"),
            ("age".to_string(), json!(24))
        );
        assert_eq!(
            parse_assignment("done=true").expect("parse"),
            ("done".to_string(), json!(true))
        );
    }

    #[test]
    fn assignments_fall_back_to_strings() {
        assert_eq!(
            parse_assignment("user email=ann@example.com").expect("parse"),
            ("user email".to_string(), json!("ann@example.com"))
        );
        assert_eq!(
            parse_assignment("note=a=b").expect("parse"),
            ("note".to_string(), json!("a=b"))
        );
    }

    #[test]
    fn assignments_need_a_field() {
        assert!(parse_assignment("no-equals").is_err());
        assert!(parse_assignment("=value").is_err());
    }
}
