use perch::{BatchPolicy, Command, Config, Engine, EngineError, ManualClock, Output, Unit};
use std::sync::Arc;
use std::time::Duration;

fn engine_with_manual_clock() -> (Engine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_000_000));
    let engine = Engine::with_clock(Config::default(), clock.clone());
    (engine, clock)
}

#[tokio::test]
async fn ttl_read_before_expiry_hits_after_misses() {
    let (engine, clock) = engine_with_manual_clock();

    engine
        .set_ex("name", "test", Duration::from_secs(3))
        .await
        .unwrap();
    assert_eq!(engine.get("name").await.unwrap(), Some("test".to_string()));

    clock.advance(Duration::from_secs(5));
    assert_eq!(engine.get("name").await.unwrap(), None);
    assert!(!engine.exists("name").await);
}

#[tokio::test]
async fn ttl_boundary_is_exclusive_of_the_last_instant() {
    let (engine, clock) = engine_with_manual_clock();

    engine
        .set_ex("k", "v", Duration::from_millis(100))
        .await
        .unwrap();
    clock.advance(Duration::from_millis(99));
    assert!(engine.get("k").await.unwrap().is_some());
    clock.advance(Duration::from_millis(1));
    assert!(engine.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn set_without_ttl_clears_pending_expiry() {
    let (engine, clock) = engine_with_manual_clock();

    engine
        .set_ex("k", "short-lived", Duration::from_secs(1))
        .await
        .unwrap();
    engine.set("k", "permanent").await;
    assert_eq!(engine.ttl_millis("k").await, -1);

    clock.advance(Duration::from_secs(60));
    assert_eq!(engine.get("k").await.unwrap(), Some("permanent".to_string()));
}

#[tokio::test]
async fn expire_and_persist_round_trip() {
    let (engine, clock) = engine_with_manual_clock();

    engine.set("k", "v").await;
    assert!(engine.expire("k", Duration::from_secs(2)).await.unwrap());
    assert_eq!(engine.ttl_millis("k").await, 2_000);
    assert!(engine.persist("k").await);
    clock.advance(Duration::from_secs(10));
    assert!(engine.exists("k").await);

    assert!(!engine.expire("missing", Duration::from_secs(1)).await.unwrap());
    assert_eq!(engine.ttl_millis("missing").await, -2);
}

#[tokio::test]
async fn zero_ttl_is_rejected() {
    let engine = Engine::default();
    let err = engine.set_ex("k", "v", Duration::ZERO).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
    assert!(!engine.exists("k").await);
}

#[tokio::test]
async fn list_preserves_fifo_order() {
    let engine = Engine::default();

    engine.push_right("queue", "a").await.unwrap();
    engine.push_right("queue", "b").await.unwrap();
    engine.push_right("queue", "c").await.unwrap();

    assert_eq!(engine.pop_left("queue").await.unwrap(), Some("a".to_string()));
    assert_eq!(engine.pop_left("queue").await.unwrap(), Some("b".to_string()));
    assert_eq!(engine.pop_left("queue").await.unwrap(), Some("c".to_string()));
    // drained and absent lists miss rather than error
    assert_eq!(engine.pop_left("queue").await.unwrap(), None);
    assert_eq!(engine.pop_right("never-existed").await.unwrap(), None);
}

#[tokio::test]
async fn list_push_ends_and_range() {
    let engine = Engine::default();

    engine.push_right("l", "middle").await.unwrap();
    engine.push_left("l", "first").await.unwrap();
    engine.push_right("l", "last").await.unwrap();

    assert_eq!(
        engine.list_range("l", 0, -1).await.unwrap(),
        vec!["first", "middle", "last"]
    );
    assert_eq!(engine.list_len("l").await.unwrap(), 3);
    assert_eq!(engine.pop_right("l").await.unwrap(), Some("last".to_string()));
}

#[tokio::test]
async fn set_add_is_idempotent() {
    let engine = Engine::default();

    assert!(engine.set_add("s", "x").await.unwrap());
    assert!(!engine.set_add("s", "x").await.unwrap());
    assert_eq!(engine.set_cardinality("s").await.unwrap(), 1);

    engine.set_add("s", "y").await.unwrap();
    assert_eq!(engine.set_members("s").await.unwrap(), vec!["x", "y"]);
    assert!(engine.set_is_member("s", "y").await.unwrap());
    assert!(!engine.set_is_member("s", "z").await.unwrap());
}

#[tokio::test]
async fn sorted_set_range_and_pop_max() {
    let engine = Engine::default();

    engine.zadd("board", "Eko", 100.0).await.unwrap();
    engine.zadd("board", "Jhon", 85.0).await.unwrap();
    engine.zadd("board", "Santy", 95.0).await.unwrap();

    let members: Vec<String> = engine
        .zrange("board", 0, -1)
        .await
        .unwrap()
        .into_iter()
        .map(|(m, _)| m)
        .collect();
    assert_eq!(members, vec!["Jhon", "Santy", "Eko"]);

    assert_eq!(
        engine.zpop_max("board").await.unwrap(),
        Some(("Eko".to_string(), 100.0))
    );
    assert_eq!(
        engine.zpop_max("board").await.unwrap(),
        Some(("Santy".to_string(), 95.0))
    );
    assert_eq!(
        engine.zpop_max("board").await.unwrap(),
        Some(("Jhon".to_string(), 85.0))
    );
    assert_eq!(engine.zpop_max("board").await.unwrap(), None);
}

#[tokio::test]
async fn sorted_set_rejects_nan_scores() {
    let engine = Engine::default();
    let err = engine.zadd("z", "m", f64::NAN).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn hash_fields_overwrite_and_snapshot() {
    let engine = Engine::default();

    assert!(engine.hset("user:1", "name", "Eko").await.unwrap());
    assert!(engine.hset("user:1", "email", "eko@example.com").await.unwrap());
    assert!(engine.hset("user:1", "age", "30").await.unwrap());
    // overwrite in place, not a new field
    assert!(!engine.hset("user:1", "age", "31").await.unwrap());

    let all = engine.hgetall("user:1").await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all["name"], "Eko");
    assert_eq!(all["email"], "eko@example.com");
    assert_eq!(all["age"], "31");

    // non-destructive snapshot
    assert_eq!(engine.hlen("user:1").await.unwrap(), 3);
    assert_eq!(engine.hget("user:1", "name").await.unwrap(), Some("Eko".to_string()));
}

#[tokio::test]
async fn geo_distance_and_radius_search() {
    let engine = Engine::default();

    engine
        .geo_add("stores", "shop-a", 106.827153, -6.175392)
        .await
        .unwrap();
    engine
        .geo_add("stores", "shop-b", 106.827853, -6.170492)
        .await
        .unwrap();

    let km = engine
        .geo_dist("stores", "shop-a", "shop-b", Unit::Kilometers)
        .await
        .unwrap();
    assert!((km - 0.5504).abs() < 0.01, "got {km} km");

    let hits = engine
        .geo_search("stores", 106.827153, -6.175392, 5.0, Unit::Kilometers)
        .await
        .unwrap();
    let names: Vec<&str> = hits.iter().map(|h| h.member.as_str()).collect();
    assert_eq!(names, vec!["shop-a", "shop-b"]);

    let err = engine
        .geo_dist("stores", "shop-a", "ghost", Unit::Meters)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::MemberNotFound("ghost".to_string()));
}

#[tokio::test]
async fn estimator_counts_distinct_elements_across_adds() {
    let engine = Engine::default();

    engine
        .pf_add("visitors", ["eko", "kurniawan", "khannedy"])
        .await
        .unwrap();
    engine
        .pf_add("visitors", ["eko", "budi", "joko", "rully"])
        .await
        .unwrap();
    engine
        .pf_add("visitors", ["budi", "nugraha", "pratama", "gardika"])
        .await
        .unwrap();

    // 9 distinct elements; the sketch is effectively exact at this scale
    let count = engine.pf_count("visitors").await.unwrap() as i64;
    assert!((count - 9).abs() <= 1, "estimate {count} for 9 elements");
}

#[tokio::test]
async fn estimator_merge_unions_sketches() {
    let engine = Engine::default();

    engine.pf_add("a", ["x", "y"]).await.unwrap();
    engine.pf_add("b", ["y", "z"]).await.unwrap();
    engine
        .pf_merge("merged", &["a".to_string(), "b".to_string()])
        .await
        .unwrap();

    let count = engine.pf_count("merged").await.unwrap() as i64;
    assert!((count - 3).abs() <= 1, "estimate {count} for 3 elements");
}

#[tokio::test]
async fn wrong_type_operations_fail_without_corrupting_state() {
    let engine = Engine::default();

    engine.set("plain", "string-value").await;
    assert_eq!(engine.pop_left("plain").await.unwrap_err(), EngineError::WrongType);
    assert_eq!(engine.set_add("plain", "m").await.unwrap_err(), EngineError::WrongType);
    assert_eq!(engine.hgetall("plain").await.unwrap_err(), EngineError::WrongType);
    assert_eq!(engine.zpop_max("plain").await.unwrap_err(), EngineError::WrongType);
    assert_eq!(engine.pf_count("plain").await.unwrap_err(), EngineError::WrongType);

    // the original value survives every failed attempt
    assert_eq!(
        engine.get("plain").await.unwrap(),
        Some("string-value".to_string())
    );
    assert_eq!(engine.type_name("plain").await, Some("string"));
}

#[tokio::test]
async fn expired_key_frees_the_slot_for_a_new_type() {
    let (engine, clock) = engine_with_manual_clock();

    engine
        .set_ex("slot", "text", Duration::from_secs(1))
        .await
        .unwrap();
    clock.advance(Duration::from_secs(2));

    // expired string no longer blocks a list write
    engine.push_right("slot", "first").await.unwrap();
    assert_eq!(engine.type_name("slot").await, Some("list"));
}

#[tokio::test]
async fn incr_by_requires_an_integer() {
    let engine = Engine::default();

    assert_eq!(engine.incr_by("counter", 5).await.unwrap(), 5);
    assert_eq!(engine.incr_by("counter", -2).await.unwrap(), 3);

    engine.set("text", "abc").await;
    assert!(matches!(
        engine.incr_by("text", 1).await.unwrap_err(),
        EngineError::InvalidArgument(_)
    ));
}

#[tokio::test]
async fn batch_effects_become_visible_together() {
    let (engine, _clock) = engine_with_manual_clock();

    let write = vec![
        Command::SetEx {
            key: "left".to_string(),
            value: "1".to_string(),
            ttl: Duration::from_secs(60),
        },
        Command::SetEx {
            key: "right".to_string(),
            value: "1".to_string(),
            ttl: Duration::from_secs(60),
        },
    ];
    let read = vec![
        Command::Get { key: "left".to_string() },
        Command::Get { key: "right".to_string() },
    ];

    let before = engine.run_batch(&read).await.unwrap();
    assert_eq!(before[0], Ok(Output::MaybeValue(None)));
    assert_eq!(before[1], Ok(Output::MaybeValue(None)));

    let results = engine.run_batch(&write).await.unwrap();
    assert!(results.iter().all(|r| r.is_ok()));

    let after = engine.run_batch(&read).await.unwrap();
    assert_eq!(after[0], Ok(Output::MaybeValue(Some("1".to_string()))));
    assert_eq!(after[1], Ok(Output::MaybeValue(Some("1".to_string()))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_batches_never_expose_half_a_batch() {
    let engine = Engine::default();
    engine.set("left", "0").await;
    engine.set("right", "0").await;

    let writer = {
        let engine = engine.clone();
        tokio::spawn(async move {
            for i in 1..=200u32 {
                let batch = vec![
                    Command::Set {
                        key: "left".to_string(),
                        value: i.to_string(),
                    },
                    Command::Set {
                        key: "right".to_string(),
                        value: i.to_string(),
                    },
                ];
                engine.run_batch(&batch).await.unwrap();
            }
        })
    };

    let reader = {
        let engine = engine.clone();
        tokio::spawn(async move {
            let read = vec![
                Command::Get { key: "left".to_string() },
                Command::Get { key: "right".to_string() },
            ];
            for _ in 0..200 {
                let snapshot = engine.run_batch(&read).await.unwrap();
                let left = match &snapshot[0] {
                    Ok(Output::MaybeValue(Some(v))) => v.clone(),
                    other => panic!("unexpected read result: {other:?}"),
                };
                let right = match &snapshot[1] {
                    Ok(Output::MaybeValue(Some(v))) => v.clone(),
                    other => panic!("unexpected read result: {other:?}"),
                };
                assert_eq!(left, right, "batch observed half-applied");
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
}

#[tokio::test]
async fn batch_error_policies() {
    let engine = Engine::default();
    engine.set("str", "x").await;

    let commands = vec![
        Command::PopLeft { key: "str".to_string() }, // wrong type
        Command::Set {
            key: "after".to_string(),
            value: "applied".to_string(),
        },
    ];

    // default policy keeps going
    let results = engine.run_batch(&commands).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], Err(EngineError::WrongType));
    assert_eq!(results[1], Ok(Output::Unit));
    assert!(engine.exists("after").await);

    // stop-on-error truncates
    engine.del("after").await;
    let results = engine
        .run_batch_with_policy(&commands, BatchPolicy::StopOnError)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
    assert!(!engine.exists("after").await);
}

#[tokio::test]
async fn empty_batch_is_rejected_at_submission() {
    let engine = Engine::default();
    let err = engine.run_batch(&[]).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[tokio::test(start_paused = true)]
async fn background_sweeper_reclaims_expired_keys() {
    let clock = Arc::new(ManualClock::new(0));
    let engine = Engine::with_clock(Config::default(), clock.clone());
    let sweeper = engine.spawn_expiry_sweeper();

    for i in 0..10 {
        engine
            .set_ex(&format!("volatile-{i}"), "x", Duration::from_secs(1))
            .await
            .unwrap();
    }
    engine.set("stable", "y").await;
    assert_eq!(engine.key_count().await, 11);

    clock.advance(Duration::from_secs(5));

    // let the paused-time interval fire enough sweep cycles
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        if engine.key_count().await == 1 {
            break;
        }
    }
    assert_eq!(engine.key_count().await, 1);
    assert!(engine.exists("stable").await);

    sweeper.abort();
}

#[tokio::test]
async fn keys_lists_only_live_entries() {
    let (engine, clock) = engine_with_manual_clock();

    engine.set("alpha", "1").await;
    engine
        .set_ex("beta", "2", Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(engine.keys().await, vec!["alpha", "beta"]);

    clock.advance(Duration::from_secs(2));
    assert_eq!(engine.keys().await, vec!["alpha"]);
}
