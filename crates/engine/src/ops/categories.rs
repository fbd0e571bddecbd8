use chrono::Utc;

use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Category, CategoryKind, EngineError, EntryKind, ResultEngine, categories,
    util::normalize_required_name,
};

use super::Engine;

impl Engine {
    pub async fn new_category(&self, name: &str, kind: CategoryKind) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        let model = categories::ActiveModel::new_category(name, kind, Utc::now())
            .insert(&self.database)
            .await?;
        Category::try_from(model)
    }

    pub async fn category(&self, category_id: i32) -> ResultEngine<Category> {
        let model = self.require_category(&self.database, category_id).await?;
        Category::try_from(model)
    }

    /// Categories sorted by name, optionally restricted to one kind.
    pub async fn list_categories(&self, kind: Option<CategoryKind>) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find();
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        query
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    /// Deletes a category. Transactions that used it become uncategorized.
    pub async fn delete_category(&self, category_id: i32) -> ResultEngine<()> {
        let res = categories::Entity::delete_by_id(category_id)
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }
        Ok(())
    }

    pub(super) async fn require_category<C: ConnectionTrait>(
        &self,
        db: &C,
        category_id: i32,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    /// Checks that `category_id` exists and may label an entry of `kind`.
    pub(super) async fn require_category_for<C: ConnectionTrait>(
        &self,
        db: &C,
        category_id: i32,
        kind: EntryKind,
    ) -> ResultEngine<()> {
        let model = self.require_category(db, category_id).await?;
        let category_kind = CategoryKind::try_from(model.kind.as_str())?;
        if category_kind != kind.category_kind() {
            return Err(EngineError::CategoryMismatch(format!(
                "category '{}' is {}, transaction is {}",
                model.name,
                category_kind.as_str(),
                kind.transaction_type().as_str()
            )));
        }
        Ok(())
    }
}
