//! Category registry operations.

use std::collections::HashSet;

use sea_orm::{ConnectionTrait, DbErr, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Category, Engine, EngineError, ResultEngine, ValidationReport, ViolationKind, categories,
    categories::normalize_name,
};

const MAX_NAME_LEN: usize = 50;

/// Snapshot of every category display name, for exact-match lookups
/// during record validation.
pub(super) async fn category_names<C: ConnectionTrait>(conn: &C) -> Result<HashSet<String>, DbErr> {
    let models = categories::Entity::find().all(conn).await?;
    Ok(models.into_iter().map(|m| m.name).collect())
}

fn checked_name(name: &str) -> Result<String, ValidationReport> {
    let mut report = ValidationReport::default();
    let trimmed = name.trim();
    if trimmed.is_empty() {
        report.push("name", ViolationKind::InvalidText, "name cannot be empty");
    } else if trimmed.chars().count() > MAX_NAME_LEN {
        report.push(
            "name",
            ViolationKind::InvalidText,
            format!("name must be at most {MAX_NAME_LEN} characters"),
        );
    }
    if report.is_empty() {
        Ok(trimmed.to_owned())
    } else {
        Err(report)
    }
}

impl Engine {
    /// Lists every category, ordered by case-insensitive name with the id
    /// as a stable tie-break.
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::NameNorm)
            .order_by_asc(categories::Column::Id)
            .all(self.database())
            .await?;

        models.into_iter().map(Category::try_from).collect()
    }

    /// Registers a new category. The display name keeps its original
    /// casing; uniqueness is case-insensitive on the trimmed name.
    pub async fn create_category(&self, name: &str) -> ResultEngine<Category> {
        let name = checked_name(name)?;

        let clash = categories::Entity::find()
            .filter(categories::Column::NameNorm.eq(normalize_name(&name)))
            .one(self.database())
            .await?;
        if clash.is_some() {
            return Err(EngineError::DuplicateCategory(name));
        }

        let category = Category {
            id: Uuid::new_v4(),
            name,
        };
        categories::ActiveModel::from(&category)
            .insert(self.database())
            .await?;
        Ok(category)
    }

    /// Renames a category in place. Existing records keep the old name;
    /// a rename never rewrites their category snapshots.
    pub async fn rename_category(&self, id: Uuid, name: &str) -> ResultEngine<Category> {
        let name = checked_name(name)?;

        let model = categories::Entity::find_by_id(id.to_string())
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::NotFound("category".to_string()))?;

        let norm = normalize_name(&name);
        let clash = categories::Entity::find()
            .filter(categories::Column::NameNorm.eq(norm))
            .filter(categories::Column::Id.ne(model.id.clone()))
            .one(self.database())
            .await?;
        if clash.is_some() {
            return Err(EngineError::DuplicateCategory(name));
        }

        let category = Category { id, name };
        categories::ActiveModel::from(&category)
            .update(self.database())
            .await?;
        Ok(category)
    }

    /// Removes a category from the registry. Records that reference it
    /// keep their snapshot name; only future writes are affected.
    pub async fn delete_category(&self, id: Uuid) -> ResultEngine<()> {
        let outcome = categories::Entity::delete_by_id(id.to_string())
            .exec(self.database())
            .await?;
        if outcome.rows_affected == 0 {
            return Err(EngineError::NotFound("category".to_string()));
        }
        Ok(())
    }
}
