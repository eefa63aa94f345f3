//! Count-Min Sketch Command Tests

mod common;

use bloomkv::{AsyncCountMinCommands, CountMinCommands, CountMinInfo, Error, Reply};
use common::{bulk, info, int, ints, ok, AsyncMock, MockConnection};

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_init_by_dim() {
    let mut conn = MockConnection::new().reply(ok());
    assert!(conn.cms_init_by_dim("cms", 2000, 5).unwrap());

    assert_eq!(conn.last().0, "CMS.INITBYDIM");
    assert_eq!(conn.last_args(), vec!["cms", "2000", "5"]);
}

#[test]
fn test_init_by_prob() {
    let mut conn = MockConnection::new().reply(ok());
    assert!(conn.cms_init_by_prob("cms", 0.001, 0.01).unwrap());

    assert_eq!(conn.last().0, "CMS.INITBYPROB");
    assert_eq!(conn.last_args(), vec!["cms", "0.001", "0.01"]);
}

#[test]
fn test_init_existing_key_is_server_error() {
    let mut conn = MockConnection::new().server_error("CMS: key already exists");
    assert!(matches!(conn.cms_init_by_dim("cms", 10, 2), Err(Error::Server(_))));
}

// =============================================================================
// Increment / Query
// =============================================================================

#[test]
fn test_incr_by_accepts_scalar_or_single_element_array() {
    let mut conn = MockConnection::new().reply(int(5)).reply(ints(&[7]));

    assert_eq!(conn.cms_incr_by("cms", "a", 5).unwrap(), 5);
    assert_eq!(conn.last_args(), vec!["cms", "a", "5"]);
    assert_eq!(conn.cms_incr_by("cms", "a", 2).unwrap(), 7);
}

#[test]
fn test_incr_by_rejects_multi_element_array() {
    let mut conn = MockConnection::new().reply(ints(&[1, 2]));
    assert!(matches!(conn.cms_incr_by("cms", "a", 1), Err(Error::Decode(_))));
}

#[test]
fn test_incr_by_many_interleaves_pairs() {
    let mut conn = MockConnection::new().reply(ints(&[3, 9]));
    let counts = conn.cms_incr_by_many("cms", &[("a", 3), ("b", 9)]).unwrap();

    assert_eq!(counts, vec![3, 9]);
    assert_eq!(conn.last().0, "CMS.INCRBY");
    assert_eq!(conn.last_args(), vec!["cms", "a", "3", "b", "9"]);
}

#[test]
fn test_query_keeps_item_order() {
    let mut conn = MockConnection::new().reply(ints(&[10, 0, 4]));
    assert_eq!(conn.cms_query("cms", &["a", "b", "c"]).unwrap(), vec![10, 0, 4]);
    assert_eq!(conn.last_args(), vec!["cms", "a", "b", "c"]);
}

#[test]
fn test_query_and_incr_by_many_reject_wrong_length() {
    let mut conn = MockConnection::new().reply(ints(&[10, 0])).reply(ints(&[3]));

    assert!(matches!(conn.cms_query("cms", &["a", "b", "c"]), Err(Error::Decode(_))));
    assert!(matches!(
        conn.cms_incr_by_many("cms", &[("a", 3), ("b", 9)]),
        Err(Error::Decode(_))
    ));
}

// =============================================================================
// Merge
// =============================================================================

#[test]
fn test_merge_counts_sources() {
    let mut conn = MockConnection::new().reply(ok());
    assert!(conn.cms_merge("dest", &["s1", "s2"]).unwrap());

    assert_eq!(conn.last().0, "CMS.MERGE");
    assert_eq!(conn.last_args(), vec!["dest", "2", "s1", "s2"]);
}

#[test]
fn test_merge_weighted_appends_weights_after_keys() {
    let mut conn = MockConnection::new().reply(ok());
    assert!(conn.cms_merge_weighted("dest", &[("s1", 1), ("s2", 3)]).unwrap());

    assert_eq!(conn.last_args(), vec!["dest", "2", "s1", "s2", "WEIGHTS", "1", "3"]);
}

// =============================================================================
// Info
// =============================================================================

#[test]
fn test_info_fields() {
    let mut conn = MockConnection::new().reply(info(vec![
        ("width", int(2000)),
        ("depth", int(5)),
        ("count", int(17)),
        ("future", bulk("ignored")),
    ]));

    assert_eq!(
        conn.cms_info("cms").unwrap(),
        CountMinInfo {
            width: 2000,
            depth: 5,
            count: 17,
        }
    );
}

#[test]
fn test_info_missing_fields_default_to_zero() {
    let mut conn = MockConnection::new().reply(Reply::Array(vec![]));
    assert_eq!(conn.cms_info("cms").unwrap(), CountMinInfo::default());
}

// =============================================================================
// Async
// =============================================================================

#[tokio::test]
async fn test_async_merge_matches_blocking() {
    let mut blocking = MockConnection::new().reply(ok());
    blocking.cms_merge_weighted("d", &[("a", 2)]).unwrap();

    let mut deferred = AsyncMock(MockConnection::new().reply(ok()));
    deferred.cms_merge_weighted("d", &[("a", 2)]).await.unwrap();

    assert_eq!(deferred.0.sent, blocking.sent);
}

#[tokio::test]
async fn test_async_incr_by() {
    let mut conn = AsyncMock(MockConnection::new().reply(ints(&[4])));
    assert_eq!(conn.cms_incr_by("cms", "x", 4).await.unwrap(), 4);
}
