use anyhow::Result;
use chrono::{Duration, SubsecRound, Utc};
use sea_orm::{entity::prelude::DateTimeWithTimeZone, DatabaseConnection, EntityTrait};

use crate::{article, db::connect_memory, errors::ModelError};

fn now() -> DateTimeWithTimeZone {
    Utc::now().trunc_subsecs(6).into()
}

async fn seed(db: &DatabaseConnection, title: &str, at: DateTimeWithTimeZone) -> Result<article::Model> {
    Ok(article::insert(db, title, "body", at, at).await?)
}

#[tokio::test]
async fn insert_assigns_sequential_ids() -> Result<()> {
    let db = connect_memory().await?;
    let t = now();
    let a = seed(&db, "first", t).await?;
    let b = seed(&db, "second", t).await?;
    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);

    let found = article::find(&db, a.id).await?.expect("row exists");
    assert_eq!(found, a);
    Ok(())
}

#[tokio::test]
async fn update_keeps_created_at() -> Result<()> {
    let db = connect_memory().await?;
    let created = now();
    let a = seed(&db, "draft", created).await?;

    let later = created + Duration::seconds(5);
    let u = article::update(&db, a.id, "final", "edited", later).await?;
    assert_eq!(u.id, a.id);
    assert_eq!(u.title, "final");
    assert_eq!(u.content, "edited");
    assert_eq!(u.created_at, created);
    assert_eq!(u.updated_at, later);
    Ok(())
}

#[tokio::test]
async fn update_missing_row_is_not_found() -> Result<()> {
    let db = connect_memory().await?;
    let err = article::update(&db, 42, "t", "c", now()).await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first_with_id_tiebreak() -> Result<()> {
    let db = connect_memory().await?;
    let t0 = now();
    let old = seed(&db, "old", t0 - Duration::minutes(1)).await?;
    let a = seed(&db, "same-a", t0).await?;
    let b = seed(&db, "same-b", t0).await?;

    let ids: Vec<i32> = article::list_newest_first(&db).await?.into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![b.id, a.id, old.id]);

    let top: Vec<i32> = article::latest(&db, 2).await?.into_iter().map(|m| m.id).collect();
    assert_eq!(top, vec![b.id, a.id]);
    Ok(())
}

#[tokio::test]
async fn title_search_is_case_sensitive_and_literal() -> Result<()> {
    let db = connect_memory().await?;
    let t = now();
    let rust = seed(&db, "Rust ownership", t).await?;
    seed(&db, "rusty nails", t).await?;
    let pct = seed(&db, "100% done", t).await?;
    seed(&db, "1000 done", t).await?;

    let hits = article::find_title_containing(&db, "Rust").await?;
    assert_eq!(hits.iter().map(|m| m.id).collect::<Vec<_>>(), vec![rust.id]);

    let hits = article::find_title_containing(&db, "0%").await?;
    assert_eq!(hits.iter().map(|m| m.id).collect::<Vec<_>>(), vec![pct.id]);

    assert!(article::find_title_containing(&db, "missing").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_is_permanent() -> Result<()> {
    let db = connect_memory().await?;
    let a = seed(&db, "doomed", now()).await?;
    assert!(article::exists(&db, a.id).await?);

    assert!(article::delete(&db, a.id).await?);
    assert!(!article::exists(&db, a.id).await?);
    assert!(article::Entity::find_by_id(a.id).one(&db).await?.is_none());

    // second delete touches nothing
    assert!(!article::delete(&db, a.id).await?);
    Ok(())
}

#[test]
fn model_serializes_camel_case() {
    let t: DateTimeWithTimeZone = Utc::now().into();
    let m = article::Model { id: 7, title: "t".into(), content: "c".into(), created_at: t, updated_at: t };
    let v = serde_json::to_value(&m).unwrap();
    assert_eq!(v["id"], 7);
    assert!(v.get("createdAt").is_some());
    assert!(v.get("updatedAt").is_some());
    assert!(v.get("created_at").is_none());
}
