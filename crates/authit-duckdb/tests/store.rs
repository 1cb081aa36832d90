use authit_core::{
    lead::{upsert_lead, Lead},
    store::{Statement, Store},
    visit::{record_visit, PageVisit},
};
use authit_duckdb::DuckDbStore;

fn lead(email: &str, name: Option<&str>, phone: Option<&str>) -> Lead {
    Lead {
        email: email.to_string(),
        name: name.map(str::to_string),
        phone: phone.map(str::to_string),
    }
}

fn visit(page: &str, duration_seconds: i64) -> PageVisit {
    PageVisit {
        ip_address: "unknown".to_string(),
        country: "unknown".to_string(),
        city: "unknown".to_string(),
        page_path: page.to_string(),
        duration_seconds,
        user_agent: None,
    }
}

async fn lead_row(store: &DuckDbStore, email: &str) -> Vec<(Option<String>, Option<String>)> {
    let conn = store.conn_for_test().await;
    let mut stmt = conn
        .prepare("SELECT name, phone FROM leads WHERE email = ?1")
        .expect("prepare lead query");
    let rows = stmt
        .query_map(authit_duckdb::duckdb::params![email], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .expect("query leads");
    let out = rows.collect::<Result<Vec<_>, _>>().expect("collect leads");
    out
}

async fn visit_count(store: &DuckDbStore) -> i64 {
    let conn = store.conn_for_test().await;
    let count = conn
        .query_row("SELECT COUNT(*) FROM page_visits", [], |row| row.get(0))
        .expect("count visits");
    count
}

#[tokio::test]
async fn upsert_keeps_one_row_and_last_write_wins() {
    let store = DuckDbStore::open_in_memory().expect("in-memory DuckDB");

    upsert_lead(&store, &lead("a@b.com", Some("Ada"), Some("111")))
        .await
        .expect("first upsert");
    upsert_lead(&store, &lead("a@b.com", Some("Grace"), None))
        .await
        .expect("second upsert");

    let rows = lead_row(&store, "a@b.com").await;
    assert_eq!(rows, vec![(Some("Grace".to_string()), None)]);
}

#[tokio::test]
async fn repeat_upsert_refreshes_updated_at_only() {
    let store = DuckDbStore::open_in_memory().expect("in-memory DuckDB");
    upsert_lead(&store, &lead("a@b.com", Some("Ada"), None))
        .await
        .expect("first upsert");
    {
        let conn = store.conn_for_test().await;
        conn.execute_batch(
            "UPDATE leads SET created_at = TIMESTAMP '2000-01-01 00:00:00', \
             updated_at = TIMESTAMP '2000-01-01 00:00:00'",
        )
        .expect("backdate lead");
    }

    upsert_lead(&store, &lead("a@b.com", Some("Ada"), Some("222")))
        .await
        .expect("second upsert");

    let conn = store.conn_for_test().await;
    let (created_kept, updated_moved): (bool, bool) = conn
        .query_row(
            "SELECT created_at = TIMESTAMP '2000-01-01 00:00:00', \
                    updated_at > TIMESTAMP '2000-01-01 00:00:00' \
             FROM leads WHERE email = 'a@b.com'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("read timestamps");
    assert!(created_kept);
    assert!(updated_moved);
}

#[tokio::test]
async fn visits_are_append_only() {
    let store = DuckDbStore::open_in_memory().expect("in-memory DuckDB");

    for _ in 0..3 {
        record_visit(&store, &visit("/", 5)).await.expect("insert visit");
    }
    record_visit(&store, &visit("/pricing", 0))
        .await
        .expect("insert visit");

    assert_eq!(visit_count(&store).await, 4);
}

#[tokio::test]
async fn visit_ids_are_store_assigned() {
    let store = DuckDbStore::open_in_memory().expect("in-memory DuckDB");
    record_visit(&store, &visit("/", 1)).await.expect("insert visit");
    record_visit(&store, &visit("/", 1)).await.expect("insert visit");

    let conn = store.conn_for_test().await;
    let distinct: i64 = conn
        .query_row("SELECT COUNT(DISTINCT id) FROM page_visits", [], |row| {
            row.get(0)
        })
        .expect("count ids");
    assert_eq!(distinct, 2);
}

#[tokio::test]
async fn rejected_statement_is_a_store_error() {
    let store = DuckDbStore::open_in_memory().expect("in-memory DuckDB");
    let bad = Statement::new("INSERT INTO no_such_table (x) VALUES ($1)").bind(1_i64);

    assert!(store.execute(&bad).await.is_err());
    // The store keeps serving after a rejected statement.
    assert!(store.ping().await.is_ok());
}
