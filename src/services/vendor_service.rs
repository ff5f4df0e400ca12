//! Vendor Service - master-data writes with numbering and audit in one transaction
//!
//! This is the write path the numbering and audit subsystems exist for: every
//! mutation opens a transaction, mints or loads the row inside it, appends the
//! audit entry, and only then commits.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::{Value, json};

use crate::domain::errors::DomainError;
use crate::models::vendor::{self, Entity as Vendor, VendorDto};
use crate::services::audit_service::{self, Audited};
use crate::services::numbering_service;

/// Screen id of the vendor master counter.
pub const VENDOR_SCREEN: &str = "VDR";

impl Audited for vendor::Model {
    fn audit_id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn snapshot_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", json!(self.id)),
            ("name", json!(self.name)),
            ("email", json!(self.email)),
            ("phone", json!(self.phone)),
            ("address", json!(self.address)),
            ("city", json!(self.city)),
            ("country", json!(self.country)),
            ("is_active", json!(self.is_active)),
        ]
    }
}

/// Create a new vendor with a minted id
pub async fn create_vendor(
    db: &DatabaseConnection,
    actor_id: &str,
    dto: VendorDto,
) -> Result<vendor::Model, DomainError> {
    if dto.name.trim().is_empty() {
        return Err(DomainError::Validation(
            "Vendor name must not be empty".to_string(),
        ));
    }

    let now = Utc::now().to_rfc3339();
    let txn = db.begin().await?;

    // 1. Mint the vendor id
    let id = numbering_service::next_code(&txn, VENDOR_SCREEN, Utc::now().date_naive()).await?;

    // 2. Insert the vendor row
    let new_vendor = vendor::ActiveModel {
        id: Set(id),
        name: Set(dto.name),
        email: Set(dto.email),
        phone: Set(dto.phone),
        address: Set(dto.address),
        city: Set(dto.city),
        country: Set(dto.country),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };
    let saved = new_vendor.insert(&txn).await?;

    // 3. Record the audit entry alongside the write
    audit_service::record_insert(&txn, actor_id, &saved).await?;

    txn.commit().await?;

    tracing::info!("Created vendor {} ({})", saved.id, saved.name);
    Ok(saved)
}

/// Update an existing vendor
pub async fn update_vendor(
    db: &DatabaseConnection,
    actor_id: &str,
    id: &str,
    dto: VendorDto,
) -> Result<vendor::Model, DomainError> {
    if dto.name.trim().is_empty() {
        return Err(DomainError::Validation(
            "Vendor name must not be empty".to_string(),
        ));
    }

    let now = Utc::now().to_rfc3339();
    let txn = db.begin().await?;

    // 1. Load the current state
    let old = Vendor::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound)?;

    // 2. Apply the changes
    let mut active: vendor::ActiveModel = old.clone().into();
    active.name = Set(dto.name);
    active.email = Set(dto.email);
    active.phone = Set(dto.phone);
    active.address = Set(dto.address);
    active.city = Set(dto.city);
    active.country = Set(dto.country);
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    // 3. Record the audit entry with before/after snapshots
    audit_service::record_update(&txn, actor_id, &old, &updated).await?;

    txn.commit().await?;

    Ok(updated)
}

/// Soft-delete a vendor by flipping its active flag.
///
/// The audit recorder classifies this update as a DELETE.
pub async fn deactivate_vendor(
    db: &DatabaseConnection,
    actor_id: &str,
    id: &str,
) -> Result<vendor::Model, DomainError> {
    let now = Utc::now().to_rfc3339();
    let txn = db.begin().await?;

    // 1. Load the current state
    let old = Vendor::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound)?;

    if !old.is_active {
        return Err(DomainError::Validation(
            "Vendor is already inactive".to_string(),
        ));
    }

    // 2. Flip the soft-delete flag
    let mut active: vendor::ActiveModel = old.clone().into();
    active.is_active = Set(false);
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    // 3. Record the audit entry
    audit_service::record_update(&txn, actor_id, &old, &updated).await?;

    txn.commit().await?;

    tracing::info!("Deactivated vendor {}", updated.id);
    Ok(updated)
}

/// Fetch a single vendor by id
pub async fn get_vendor(db: &DatabaseConnection, id: &str) -> Result<vendor::Model, DomainError> {
    Vendor::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

/// List vendors, active only by default
pub async fn list_vendors(
    db: &DatabaseConnection,
    include_inactive: bool,
) -> Result<Vec<vendor::Model>, DomainError> {
    let mut condition = Condition::all();

    if !include_inactive {
        condition = condition.add(vendor::Column::IsActive.eq(true));
    }

    let vendors = Vendor::find()
        .filter(condition)
        .order_by_asc(vendor::Column::Id)
        .all(db)
        .await?;

    Ok(vendors)
}

/// Count all vendors
pub async fn count_vendors(db: &DatabaseConnection) -> Result<i64, DomainError> {
    let count = Vendor::find().count(db).await?;
    Ok(count as i64)
}
