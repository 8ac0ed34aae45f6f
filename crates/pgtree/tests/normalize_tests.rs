//! Integration tests for normalization

use pgtree::{normalize, normalize_async, AstError};

fn equivalent_pairs() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        (
            "casing differences",
            "SelEct * from a JOIN b On a.id = b.id",
            "select * from a join b on a.id = b.id",
        ),
        (
            "spacing differences",
            "\n      select *\n      from a\n      ",
            " select *\n\n      from a",
        ),
        (
            "comments",
            "\n  select * from\n  -- comment\n  a join b \n  -- c2\n  on a.id = b.id",
            "select * from a join b on a.id = b.id",
        ),
        (
            "functions",
            "\n      select generate_Series(0, 100)\n      ",
            " select generate_Series (0, 100)",
        ),
        (
            "DDL",
            "\n      create TabLe testy (a int,\n        b int\n        )\n      ",
            "create table testy (a int, B int)",
        ),
        (
            "multi-statement queries",
            "select 1; \n      select 2; \n      select 3;",
            "select 1; select 2; select 3;",
        ),
    ]
}

#[test]
fn test_normalize_equivalent_queries() {
    for (name, q1, q2) in equivalent_pairs() {
        let n1 = normalize(q1);
        let n2 = normalize(q2);
        assert!(n1.is_ok(), "{name}: {:?}", n1.err());
        assert!(n2.is_ok(), "{name}: {:?}", n2.err());
        assert_eq!(n1.unwrap(), n2.unwrap(), "{name}");
    }
}

#[tokio::test]
async fn test_normalize_async_equivalent_queries() {
    for (name, q1, q2) in equivalent_pairs() {
        let n1 = normalize_async(q1).await.unwrap();
        let n2 = normalize_async(q2).await.unwrap();
        assert_eq!(n1, n2, "{name}");
        assert_eq!(n1, normalize(q1).unwrap(), "{name}");
    }
}

#[test]
fn test_different_queries_stay_different() {
    assert_ne!(
        normalize("select * from a where x = 1").unwrap(),
        normalize("select * from a where x = 2").unwrap()
    );
    assert_ne!(
        normalize("select 'A'").unwrap(),
        normalize("select 'a'").unwrap()
    );
}

#[test]
fn test_normalize_utility_statements() {
    for (sql, expected) in [
        ("truncate table a restart identity", "TRUNCATE a RESTART IDENTITY"),
        ("Show ALL", "SHOW ALL"),
        ("show search_path", "SHOW search_path"),
        ("checkpoint", "CHECKPOINT"),
    ] {
        let result = normalize(sql);
        assert!(result.is_ok(), "{sql}: {:?}", result.err());
        let normalized = result.unwrap();
        assert_eq!(normalized, expected);
        assert_eq!(normalize(&normalized).unwrap(), normalized, "{sql}");
    }
}

#[test]
fn test_normalize_unrenderable_statement() {
    let result = normalize("listen chan");
    assert!(matches!(result, Err(AstError::Render(_))), "{:?}", result);
}

#[test]
fn test_normalize_rejects_nul_byte() {
    let result = normalize("select 1\0");
    assert!(matches!(result, Err(AstError::Syntax(_))), "{:?}", result);
}
