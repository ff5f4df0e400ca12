//! Audit Trail - snapshot building and the append-only mutation log
//!
//! Entries are written inside the same transaction as the mutation they
//! describe: a failed append fails the write, and an aborted write leaves no
//! audit row behind. Nothing in this module updates or deletes existing rows.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::{Map, Value};

use crate::domain::errors::DomainError;
use crate::models::audit_trail::{self, Entity as AuditTrail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionType {
    Insert,
    Update,
    Delete,
}

impl ExecutionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionType::Insert => "INSERT",
            ExecutionType::Update => "UPDATE",
            ExecutionType::Delete => "DELETE",
        }
    }
}

/// Implemented by every audited entity model.
///
/// `snapshot_fields` returns the table's fixed field list in its declared
/// order; that order is what ends up in the stored snapshot text.
pub trait Audited {
    fn audit_id(&self) -> &str;
    fn is_active(&self) -> bool;
    fn snapshot_fields(&self) -> Vec<(&'static str, Value)>;
}

/// The module a generated entity id belongs to: the id's prefix up to the
/// first separator ('VDR-0007' -> 'VDR').
pub fn module_of(entity_id: &str) -> &str {
    entity_id.split('-').next().unwrap_or(entity_id)
}

/// Serialize a row's fields into the snapshot text stored on an audit entry.
///
/// Null fields are recorded as empty strings. Values go through serde_json,
/// so delimiters and control characters inside field values cannot corrupt
/// the snapshot.
pub fn build_snapshot<T: Audited>(row: &T) -> String {
    let mut fields = Map::new();
    for (name, value) in row.snapshot_fields() {
        let value = match value {
            Value::Null => Value::String(String::new()),
            other => other,
        };
        fields.insert(name.to_owned(), value);
    }
    Value::Object(fields).to_string()
}

fn classify_update(old_active: bool, new_active: bool) -> ExecutionType {
    // Soft delete: an update that flips the active flag off is a DELETE
    if old_active && !new_active {
        ExecutionType::Delete
    } else {
        ExecutionType::Update
    }
}

/// Append one audit entry. Runs on the caller's connection or transaction.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    actor_id: &str,
    module: &str,
    old_data: Option<String>,
    new_data: String,
    execution_type: ExecutionType,
    executed_at: &str,
) -> Result<(), DomainError> {
    let entry = audit_trail::ActiveModel {
        actor_id: Set(actor_id.to_owned()),
        module: Set(module.to_owned()),
        old_data: Set(old_data),
        new_data: Set(new_data),
        execution_type: Set(execution_type.as_str().to_owned()),
        executed_at: Set(executed_at.to_owned()),
        ..Default::default()
    };

    AuditTrail::insert(entry).exec(conn).await?;
    Ok(())
}

/// Record the insertion of a new row.
pub async fn record_insert<C: ConnectionTrait, T: Audited>(
    conn: &C,
    actor_id: &str,
    row: &T,
) -> Result<(), DomainError> {
    let now = chrono::Utc::now().to_rfc3339();
    record(
        conn,
        actor_id,
        module_of(row.audit_id()),
        None,
        build_snapshot(row),
        ExecutionType::Insert,
        &now,
    )
    .await
}

/// Record an update, with before and after snapshots.
///
/// An update that flips the soft-delete flag from active to inactive is
/// recorded as a DELETE.
pub async fn record_update<C: ConnectionTrait, T: Audited>(
    conn: &C,
    actor_id: &str,
    old: &T,
    new: &T,
) -> Result<(), DomainError> {
    let now = chrono::Utc::now().to_rfc3339();
    record(
        conn,
        actor_id,
        module_of(new.audit_id()),
        Some(build_snapshot(old)),
        build_snapshot(new),
        classify_update(old.is_active(), new.is_active()),
        &now,
    )
    .await
}

/// Filter parameters for listing audit entries
#[derive(Debug, Default, Clone)]
pub struct AuditFilter {
    pub module: Option<String>,
    pub actor_id: Option<String>,
    pub execution_type: Option<String>,
}

/// List audit entries, newest first
pub async fn list_audit_trails(
    db: &DatabaseConnection,
    filter: AuditFilter,
) -> Result<Vec<audit_trail::Model>, DomainError> {
    let mut condition = Condition::all();

    if let Some(module) = filter.module {
        condition = condition.add(audit_trail::Column::Module.eq(module));
    }

    if let Some(actor_id) = filter.actor_id {
        condition = condition.add(audit_trail::Column::ActorId.eq(actor_id));
    }

    if let Some(execution_type) = filter.execution_type {
        condition = condition.add(audit_trail::Column::ExecutionType.eq(execution_type));
    }

    let entries = AuditTrail::find()
        .filter(condition)
        .order_by_desc(audit_trail::Column::Id)
        .all(db)
        .await?;

    Ok(entries)
}
