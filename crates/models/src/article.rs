use sea_orm::{
    entity::prelude::*, sea_query::LikeExpr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Unchanged,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a new row; `id` is assigned by the database.
pub async fn insert(
    db: &DatabaseConnection,
    title: &str,
    content: &str,
    created_at: DateTimeWithTimeZone,
    updated_at: DateTimeWithTimeZone,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Overwrite the mutable columns of an existing row. `created_at` is left untouched.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    title: &str,
    content: &str,
    updated_at: DateTimeWithTimeZone,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Unchanged(id),
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        updated_at: Set(updated_at),
        ..Default::default()
    };
    match am.update(db).await {
        Ok(m) => Ok(m),
        Err(DbErr::RecordNotUpdated) => Err(ModelError::NotFound(format!("article {id}"))),
        Err(e) => Err(e.into()),
    }
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn exists(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let n = Entity::find().filter(Column::Id.eq(id)).count(db).await?;
    Ok(n > 0)
}

/// All rows, newest first; ties on `created_at` fall back to the higher id.
pub async fn list_newest_first(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}

/// At most `limit` rows, newest first.
pub async fn latest(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(db)
        .await?)
}

/// Rows whose title contains `needle`, case-sensitively, in id order.
///
/// `LIKE` narrows the scan; SQLite's `LIKE` ignores ASCII case, so the exact
/// containment check is re-applied on the fetched rows.
pub async fn find_title_containing(db: &DatabaseConnection, needle: &str) -> Result<Vec<Model>, ModelError> {
    let pattern = format!("%{}%", escape_like(needle));
    let rows = Entity::find()
        .filter(Column::Title.like(LikeExpr::new(pattern).escape('\\')))
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().filter(|m| m.title.contains(needle)).collect())
}

/// Hard delete; returns whether a row was removed.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
