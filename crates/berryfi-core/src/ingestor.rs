//! # Ingestor Module
//!
//! Schema classification and ingestion for Berryfi CORE.
//!
//! - Classify every raw type record into exactly one origin
//! - Build the App → Type → Field graph from an unordered flat list
//! - Deduplicate by id (fields, types) and by name (apps)
//! - Never drop a structural error

use crate::app::App;
use crate::field::Field;
use crate::meta::{HasFlags, HasRecord};
use crate::primitives::{META_DOMAIN, META_PRIMITIVE, SYSTEM_PREFIX, namespace};
use crate::raw::{RawTypeRecord, WorkspaceInfo, parse_type_records};
use crate::type_def::Type;
use crate::types::{BerryfiError, Origin};
use crate::workspace::Workspace;
use serde_json::Value;

/// What one ingestion pass added to the workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub records: usize,
    pub primitives: usize,
    pub user_types: usize,
    pub auxiliary_types: usize,
    pub apps: usize,
    pub fields: usize,
}

/// The Ingestor turns raw schema records into the workspace graph.
pub struct Ingestor;

impl Ingestor {
    /// Assign exactly one origin to a raw type record.
    ///
    /// Rules, in priority order:
    /// 1. A name descriptor or metadata declaring itself primitive
    /// 2. A domain type whose name is outside the `fibery/` namespace
    /// 3. Anything else is auxiliary
    #[must_use]
    pub fn classify(raw: &RawTypeRecord) -> Origin {
        if raw.name.declares_primitive() || raw.meta.flag(META_PRIMITIVE) {
            return Origin::Primitive;
        }

        let system = raw.name().is_none_or(|name| name.starts_with(SYSTEM_PREFIX));
        if raw.meta.flag(META_DOMAIN) && !system {
            return Origin::UserCreated;
        }

        Origin::Auxiliary
    }

    /// Ingest the result of a `fibery.schema/query` command.
    ///
    /// Also caches the workspace identity that travels with the schema.
    ///
    /// # Errors
    /// `MissingSchema` when the result carries no type list.
    pub fn ingest_schema(
        workspace: &mut Workspace,
        result: &Value,
    ) -> Result<IngestReport, BerryfiError> {
        let records = parse_type_records(result)?;
        let report = Self::ingest_records(workspace, &records)?;
        workspace.set_info(WorkspaceInfo::from_schema(result));

        tracing::info!(
            records = report.records,
            apps = workspace.apps().len(),
            types = workspace.types().len(),
            fields = workspace.fields().len(),
            "schema ingested"
        );
        Ok(report)
    }

    /// Ingest already-parsed type records, in any order.
    pub fn ingest_records(
        workspace: &mut Workspace,
        records: &[RawTypeRecord],
    ) -> Result<IngestReport, BerryfiError> {
        let mut report = IngestReport {
            records: records.len(),
            ..IngestReport::default()
        };

        for raw in records {
            match Self::classify(raw) {
                Origin::Primitive => Self::ingest_primitive(workspace, raw, &mut report),
                Origin::UserCreated => Self::ingest_user_type(workspace, raw, &mut report)?,
                Origin::Auxiliary => Self::ingest_auxiliary(workspace, raw, &mut report)?,
            }
        }

        Ok(report)
    }

    /// Register a standalone primitive. The first record with a given id wins.
    fn ingest_primitive(workspace: &mut Workspace, raw: &RawTypeRecord, report: &mut IngestReport) {
        if workspace.fields.has(&raw.id) {
            tracing::debug!(id = %raw.id, "duplicate primitive ignored");
            return;
        }
        workspace.fields.set(raw.id.clone(), Field::primitive(raw));
        report.primitives += 1;
    }

    /// Build a user type, its fields and its app.
    ///
    /// A type seen before is extended in place, so entities made through it survive.
    fn ingest_user_type(
        workspace: &mut Workspace,
        raw: &RawTypeRecord,
        report: &mut IngestReport,
    ) -> Result<(), BerryfiError> {
        let name = raw.name().ok_or_else(|| {
            BerryfiError::MalformedRecord(format!("user type {} has no name", raw.id))
        })?;
        let app_name = namespace(name).to_string();

        let Some(mut ty) = Self::claim_type(workspace, raw, Origin::UserCreated) else {
            return Ok(());
        };
        if !workspace.types.has(&raw.id) {
            report.user_types += 1;
        }
        Self::attach_fields(workspace, &mut ty, raw, Origin::UserCreated, report)?;

        if !workspace.apps.has(&app_name) {
            tracing::debug!(app = %app_name, "app created");
            workspace.apps.set(app_name.clone(), App::new(&app_name));
            report.apps += 1;
        }
        if let Some(app) = workspace.apps.get_mut(&app_name) {
            app.append(&mut ty)?;
        }

        workspace.types.set(raw.id.clone(), ty);
        Ok(())
    }

    /// Register a helper type. Auxiliary types never join an app.
    fn ingest_auxiliary(
        workspace: &mut Workspace,
        raw: &RawTypeRecord,
        report: &mut IngestReport,
    ) -> Result<(), BerryfiError> {
        let Some(mut ty) = Self::claim_type(workspace, raw, Origin::Auxiliary) else {
            return Ok(());
        };
        if !workspace.types.has(&raw.id) {
            report.auxiliary_types += 1;
        }
        Self::attach_fields(workspace, &mut ty, raw, Origin::Auxiliary, report)?;
        workspace.types.set(raw.id.clone(), ty);
        Ok(())
    }

    /// The type a record should build into, keyed by id.
    ///
    /// The first record with a given id wins. A later record with the same
    /// id extends that type when it has the same origin and name, and is
    /// skipped otherwise.
    fn claim_type(workspace: &Workspace, raw: &RawTypeRecord, origin: Origin) -> Option<Type> {
        let flags = origin.container_flags();
        let Some(existing) = workspace.types.get(&raw.id) else {
            return Some(Type::new(raw, flags));
        };
        if existing.flags() == flags && existing.name() == raw.name() {
            return Some(existing.clone());
        }

        tracing::warn!(
            id = %raw.id,
            name = raw.name().unwrap_or_default(),
            kept = existing.name().unwrap_or_default(),
            "conflicting type record with a known id skipped"
        );
        None
    }

    fn attach_fields(
        workspace: &mut Workspace,
        ty: &mut Type,
        raw: &RawTypeRecord,
        origin: Origin,
        report: &mut IngestReport,
    ) -> Result<(), BerryfiError> {
        for raw_field in &raw.fields {
            if let Some(known) = workspace.fields.get(&raw_field.id) {
                if known.parent_type() != Some(ty.id()) {
                    tracing::warn!(
                        id = %raw_field.id,
                        type_id = %ty.id(),
                        "field id already registered elsewhere, skipped"
                    );
                    continue;
                }
            } else {
                report.fields += 1;
            }
            let field = Field::from_raw(raw_field, origin.nested_field_flags());
            ty.append_field(field)?;
            if let Some(attached) = ty.fields().get(&raw_field.id) {
                workspace.fields.set(raw_field.id.clone(), attached.clone());
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
