//! Bloom Filter Command Tests
//!
//! Argument order, optional flags, reply decoding and the dump/restore loop
//! for the `BF.*` family, run against a scripted connection.

mod common;

use bloomkv::bloom::{self, InsertOptions, ReserveOptions};
use bloomkv::{AsyncBloomCommands, BloomCommands, BloomInfo, Error, Reply, ScanChunk};
use bytes::Bytes;
use common::{bulk, info, int, ints, ok, AsyncMock, MockConnection};

// =============================================================================
// Reserve
// =============================================================================

#[test]
fn test_reserve_puts_error_rate_before_capacity() {
    let mut conn = MockConnection::new().reply(ok());
    assert!(conn.bf_reserve("bf", 1000, 0.01, &ReserveOptions::default()).unwrap());

    assert_eq!(conn.last().0, "BF.RESERVE");
    assert_eq!(conn.last_args(), vec!["bf", "0.01", "1000"]);
}

#[test]
fn test_reserve_with_expansion_and_nonscaling() {
    let mut conn = MockConnection::new().reply(ok());
    let options = ReserveOptions {
        expansion: Some(4),
        non_scaling: true,
    };
    conn.bf_reserve("bf", 100, 0.001, &options).unwrap();

    assert_eq!(
        conn.last_args(),
        vec!["bf", "0.001", "100", "EXPANSION", "4", "NONSCALING"]
    );
}

#[test]
fn test_reserve_non_ok_status_is_false() {
    let mut conn = MockConnection::new().reply(Reply::Status("QUEUED".into()));
    assert!(!conn.bf_reserve("bf", 10, 0.1, &ReserveOptions::default()).unwrap());
}

#[test]
fn test_reserve_server_error_is_propagated() {
    let mut conn = MockConnection::new().server_error("ERR item exists");
    let err = conn
        .bf_reserve("bf", 10, 0.1, &ReserveOptions::default())
        .unwrap_err();

    match err {
        Error::Server(msg) => assert_eq!(msg, "ERR item exists"),
        other => panic!("Expected server error, got {:?}", other),
    }
}

// =============================================================================
// Add / Exists
// =============================================================================

#[test]
fn test_add_and_exists() {
    let mut conn = MockConnection::new().reply(int(1)).reply(int(0)).reply(int(1));

    assert!(conn.bf_add("bf", "alice").unwrap());
    assert!(!conn.bf_add("bf", "alice").unwrap());
    assert!(conn.bf_exists("bf", "alice").unwrap());

    assert_eq!(conn.sent[0], ("BF.ADD".to_string(), vec!["bf".to_string(), "alice".to_string()]));
    assert_eq!(conn.sent[2].0, "BF.EXISTS");
}

#[test]
fn test_madd_and_mexists_keep_item_order() {
    let mut conn = MockConnection::new().reply(ints(&[1, 1, 0])).reply(ints(&[1, 0, 1]));

    assert_eq!(conn.bf_madd("bf", &["a", "b", "a"]).unwrap(), vec![true, true, false]);
    assert_eq!(conn.last_args(), vec!["bf", "a", "b", "a"]);

    assert_eq!(conn.bf_mexists("bf", &["a", "z", "b"]).unwrap(), vec![true, false, true]);
    assert_eq!(conn.last().0, "BF.MEXISTS");
}

#[test]
fn test_add_rejects_array_reply() {
    let mut conn = MockConnection::new().reply(ints(&[1]));
    assert!(matches!(conn.bf_add("bf", "x"), Err(Error::Decode(_))));
}

#[test]
fn test_madd_rejects_reply_shorter_than_items() {
    let mut conn = MockConnection::new().reply(ints(&[1]));
    assert!(matches!(conn.bf_madd("bf", &["a", "b", "c"]), Err(Error::Decode(_))));
}

#[test]
fn test_mexists_and_insert_reject_reply_longer_than_items() {
    let mut conn = MockConnection::new().reply(ints(&[1, 0, 1])).reply(ints(&[1, 1]));

    assert!(matches!(conn.bf_mexists("bf", &["a", "b"]), Err(Error::Decode(_))));
    assert!(matches!(
        conn.bf_insert("bf", &InsertOptions::default(), &["a"]),
        Err(Error::Decode(_))
    ));
}

// =============================================================================
// Insert
// =============================================================================

#[test]
fn test_insert_without_options() {
    let mut conn = MockConnection::new().reply(ints(&[1, 1]));
    conn.bf_insert("bf", &InsertOptions::default(), &["a", "b"]).unwrap();

    assert_eq!(conn.last().0, "BF.INSERT");
    assert_eq!(conn.last_args(), vec!["bf", "ITEMS", "a", "b"]);
}

#[test]
fn test_insert_with_every_option() {
    let mut conn = MockConnection::new().reply(ints(&[1]));
    let options = InsertOptions {
        capacity: Some(500),
        error_rate: Some(0.05),
        expansion: Some(2),
        no_create: true,
        non_scaling: true,
    };
    conn.bf_insert("bf", &options, &["x"]).unwrap();

    assert_eq!(
        conn.last_args(),
        vec![
            "bf", "CAPACITY", "500", "ERROR", "0.05", "EXPANSION", "2", "NOCREATE",
            "NONSCALING", "ITEMS", "x"
        ]
    );
}

#[test]
fn test_insert_emits_present_zero_capacity() {
    let mut conn = MockConnection::new().reply(ints(&[1]));
    let options = InsertOptions {
        capacity: Some(0),
        ..Default::default()
    };
    conn.bf_insert("bf", &options, &["x"]).unwrap();

    assert_eq!(conn.last_args(), vec!["bf", "CAPACITY", "0", "ITEMS", "x"]);
}

#[test]
fn test_insert_with_no_items_still_sends_marker() {
    let mut conn = MockConnection::new().reply(Reply::Array(vec![]));
    let flags = conn.bf_insert("bf", &InsertOptions::default(), &[]).unwrap();

    assert!(flags.is_empty());
    assert_eq!(conn.last_args(), vec!["bf", "ITEMS"]);
}

// =============================================================================
// Info
// =============================================================================

#[test]
fn test_info_decodes_known_labels() {
    let mut conn = MockConnection::new().reply(info(vec![
        ("Capacity", int(100)),
        ("Size", int(296)),
        ("Number of filters", int(1)),
        ("Number of items inserted", int(3)),
        ("Expansion rate", int(2)),
    ]));

    let record = conn.bf_info("bf").unwrap();
    assert_eq!(
        record,
        BloomInfo {
            capacity: 100,
            size: 296,
            number_of_filters: 1,
            number_of_items_inserted: 3,
            expansion_rate: Some(2),
        }
    );
}

#[test]
fn test_info_skips_unknown_labels_and_nil_expansion() {
    let mut conn = MockConnection::new().reply(info(vec![
        ("Capacity", int(100)),
        ("Some new field", bulk("whatever")),
        ("Expansion rate", Reply::Nil),
        ("Size", int(8)),
    ]));

    let record = conn.bf_info("bf").unwrap();
    assert_eq!(record.capacity, 100);
    assert_eq!(record.size, 8);
    assert_eq!(record.expansion_rate, None);
    assert_eq!(record.number_of_filters, 0);
}

#[test]
fn test_info_rejects_non_integer_field() {
    let mut conn = MockConnection::new().reply(info(vec![("Capacity", Reply::Array(vec![]))]));
    match conn.bf_info("bf") {
        Err(Error::Decode(msg)) => assert!(msg.contains("Capacity")),
        other => panic!("Expected decode error, got {:?}", other),
    }
}

// =============================================================================
// Scan Dump / Load Chunk
// =============================================================================

fn chunk_reply(iterator: i64, data: &str) -> Reply {
    Reply::Array(vec![int(iterator), bulk(data)])
}

#[test]
fn test_dump_runs_until_iterator_returns_to_zero() {
    let mut conn = MockConnection::new()
        .reply(chunk_reply(1, "header"))
        .reply(chunk_reply(129, "body"))
        .reply(Reply::Array(vec![int(0), Reply::Nil]));

    let chunks = bloom::dump(&mut conn, "bf").unwrap();

    assert_eq!(
        chunks,
        vec![
            ScanChunk { iterator: 1, data: Bytes::from_static(b"header") },
            ScanChunk { iterator: 129, data: Bytes::from_static(b"body") },
        ]
    );

    let iterators: Vec<&str> = conn.sent.iter().map(|(_, args)| args[1].as_str()).collect();
    assert_eq!(iterators, vec!["0", "1", "129"]);
    assert!(conn.sent.iter().all(|(kw, _)| kw == "BF.SCANDUMP"));
}

#[test]
fn test_restore_feeds_chunks_in_order() {
    let chunks = vec![
        ScanChunk { iterator: 1, data: Bytes::from_static(b"header") },
        ScanChunk { iterator: 129, data: Bytes::from_static(b"body") },
    ];
    let mut conn = MockConnection::new().reply(ok()).reply(ok());

    bloom::restore(&mut conn, "copy", &chunks).unwrap();

    assert_eq!(conn.sent.len(), 2);
    assert_eq!(conn.sent[0].0, "BF.LOADCHUNK");
    assert_eq!(conn.sent[0].1, vec!["copy", "1", "header"]);
    assert_eq!(conn.sent[1].1, vec!["copy", "129", "body"]);
}

#[test]
fn test_restore_stops_on_unacknowledged_chunk() {
    let chunks = vec![
        ScanChunk { iterator: 1, data: Bytes::from_static(b"a") },
        ScanChunk { iterator: 2, data: Bytes::from_static(b"b") },
    ];
    let mut conn = MockConnection::new().reply(Reply::Status("NOPE".into()));

    assert!(matches!(bloom::restore(&mut conn, "copy", &chunks), Err(Error::Decode(_))));
    assert_eq!(conn.sent.len(), 1);
}

#[test]
fn test_scandump_of_empty_filter() {
    let mut conn = MockConnection::new().reply(Reply::Array(vec![int(0), Reply::Nil]));
    let chunk = conn.bf_scandump("bf", 0).unwrap();
    assert!(chunk.is_last());
    assert!(bloom::dump(&mut MockConnection::new().reply(chunk_reply(0, "")), "bf")
        .unwrap()
        .is_empty());
}

// =============================================================================
// Async
// =============================================================================

#[tokio::test]
async fn test_async_matches_blocking_arguments() {
    let options = InsertOptions {
        capacity: Some(10),
        non_scaling: true,
        ..Default::default()
    };

    let mut blocking = MockConnection::new().reply(ints(&[1, 0]));
    let expected = blocking.bf_insert("bf", &options, &["a", "b"]).unwrap();

    let mut deferred = AsyncMock(MockConnection::new().reply(ints(&[1, 0])));
    let actual = deferred.bf_insert("bf", &options, &["a", "b"]).await.unwrap();

    assert_eq!(actual, expected);
    assert_eq!(deferred.0.sent, blocking.sent);
}

#[tokio::test]
async fn test_async_server_error_is_propagated() {
    let mut conn = AsyncMock(MockConnection::new().server_error("ERR not found"));
    let err = conn.bf_info("missing").await.unwrap_err();
    assert!(err.is_server_error());
}

#[tokio::test]
async fn test_async_dump_and_restore() {
    let mut source = AsyncMock(
        MockConnection::new()
            .reply(chunk_reply(7, "payload"))
            .reply(Reply::Array(vec![int(0), Reply::Nil])),
    );
    let chunks = bloom::dump_async(&mut source, "bf").await.unwrap();
    assert_eq!(chunks.len(), 1);

    let mut target = AsyncMock(MockConnection::new().reply(ok()));
    bloom::restore_async(&mut target, "bf2", &chunks).await.unwrap();
    assert_eq!(target.0.last_args(), vec!["bf2", "7", "payload"]);
}
