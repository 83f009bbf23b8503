//! Database schema validation tests
//!
//! Verifies the initialized catalog schema: composite primary keys on the
//! entity tables, the five-column membership key, and no synthetic id
//! columns anywhere.

use mxs_common::db::init_database;
use sqlx::SqlitePool;
use tempfile::TempDir;

#[derive(Debug, sqlx::FromRow)]
struct ColumnInfo {
    #[allow(dead_code)]
    cid: i32,
    name: String,
    #[allow(dead_code)]
    r#type: String,
    notnull: i32,
    pk: i32,
}

async fn create_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_mixshare.db");
    let pool = init_database(&db_path).await.unwrap();
    (temp_dir, pool)
}

async fn table_columns(pool: &SqlitePool, table_name: &str) -> Vec<ColumnInfo> {
    let query = format!("PRAGMA table_info({})", table_name);
    sqlx::query_as::<_, ColumnInfo>(&query)
        .fetch_all(pool)
        .await
        .unwrap()
}

async fn table_names(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

/// Primary key column names of a table, in key order
fn pk_columns(columns: &[ColumnInfo]) -> Vec<&str> {
    let mut keyed: Vec<_> = columns.iter().filter(|c| c.pk > 0).collect();
    keyed.sort_by_key(|c| c.pk);
    keyed.iter().map(|c| c.name.as_str()).collect()
}

#[tokio::test]
async fn test_expected_tables_exist() {
    let (_tmp, pool) = create_test_db().await;

    let tables = table_names(&pool).await;
    for expected in ["settings", "playlists", "songs", "playlist_songs"] {
        assert!(
            tables.contains(&expected.to_string()),
            "table '{}' should exist after init, found {:?}",
            expected,
            tables
        );
    }
}

#[tokio::test]
async fn test_playlists_have_composite_natural_key() {
    let (_tmp, pool) = create_test_db().await;

    let columns = table_columns(&pool, "playlists").await;
    assert_eq!(pk_columns(&columns), ["name", "author_name"]);

    // No synthetic identifier
    assert!(!columns.iter().any(|c| c.name == "id" || c.name == "guid"));
}

#[tokio::test]
async fn test_songs_have_composite_natural_key() {
    let (_tmp, pool) = create_test_db().await;

    let columns = table_columns(&pool, "songs").await;
    assert_eq!(pk_columns(&columns), ["name", "author_name", "playlist_name"]);
    assert!(!columns.iter().any(|c| c.name == "id" || c.name == "guid"));

    // Every attribute column is NOT NULL
    assert!(columns.iter().all(|c| c.notnull == 1 || c.pk > 0));
}

#[tokio::test]
async fn test_membership_key_spans_both_endpoints() {
    let (_tmp, pool) = create_test_db().await;

    let columns = table_columns(&pool, "playlist_songs").await;
    assert_eq!(
        pk_columns(&columns),
        [
            "song_name",
            "song_author",
            "song_playlist",
            "playlist_name",
            "playlist_author"
        ]
    );
}

#[tokio::test]
async fn test_foreign_keys_are_enforced() {
    let (_tmp, pool) = create_test_db().await;

    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(enabled, 1);

    // A song insert referencing a missing playlist must fail closed
    let result = sqlx::query(
        r#"
        INSERT INTO songs (name, author_name, playlist_name, picture_url, song_url)
        VALUES ('orphan', 'alice', 'missing', 'https://e.com/a.png', 'https://e.com/a.mp3')
        "#,
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_mixshare.db");

    let pool = init_database(&db_path).await.unwrap();
    pool.close().await;

    // Re-opening an existing database runs the same statements again
    let pool = init_database(&db_path).await.unwrap();
    let tables = table_names(&pool).await;
    assert!(tables.contains(&"songs".to_string()));
}
