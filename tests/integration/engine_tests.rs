//! Cycle-level behavior of the sync engine against fake gateways.

use star_relay::engine::{CycleReport, SyncEngine};
use star_relay::models::item::{ItemKind, StarredItem};

use super::test_helpers::{
    ack_channels, author, calls, channel_context, message_item, new_call_log, other_item,
    FakeSink, FakeSource, GatewayCall,
};

const TS: &str = "1690000000.000100";

#[tokio::test]
async fn empty_feed_is_a_no_op() {
    let log = new_call_log();
    let source = FakeSource::new(log.clone());
    let sink = FakeSink::new(log.clone());
    let engine = SyncEngine::new(source, sink, "example");

    let report = engine.run_cycle().await.expect("cycle succeeds");

    assert_eq!(report, CycleReport::default());
    assert_eq!(calls(&log), vec![GatewayCall::ListStarred]);
}

#[tokio::test]
async fn non_message_items_trigger_no_lookups() {
    let log = new_call_log();
    let mut source = FakeSource::new(log.clone());
    source.items = vec![other_item(), other_item()];
    let sink = FakeSink::new(log.clone());
    let engine = SyncEngine::new(source, sink, "example");

    let report = engine.run_cycle().await.expect("cycle succeeds");

    assert_eq!(report.skipped, 2);
    assert_eq!(report.processed, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(calls(&log), vec![GatewayCall::ListStarred]);
}

#[tokio::test]
async fn channel_message_flows_end_to_end() {
    let log = new_call_log();
    let mut source = FakeSource::new(log.clone());
    source.items = vec![message_item("C042", "U7", "ship it", TS)];
    source.authors.insert("U7".into(), author("U7", "Dana"));
    source
        .contexts
        .insert("C042".into(), channel_context("C042", "eng"));
    let sink = FakeSink::new(log.clone());
    let created = sink.created_tasks();
    let engine = SyncEngine::new(source, sink, "example");

    let report = engine.run_cycle().await.expect("cycle succeeds");

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);

    let created = created.lock().expect("created tasks");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].title, "<Dana> ship it");
    assert!(created[0].notes.contains("In #eng"));
    assert!(created[0]
        .notes
        .contains("https://example.slack.com/archives/C042/p1690000000000100"));

    assert_eq!(
        calls(&log),
        vec![
            GatewayCall::ListStarred,
            GatewayCall::ResolveAuthor("U7".into()),
            GatewayCall::ResolveContext("C042".into()),
            GatewayCall::CreateTask("<Dana> ship it".into()),
            GatewayCall::Acknowledge {
                channel: "C042".into(),
                ts: TS.into()
            },
        ]
    );
}

#[tokio::test]
async fn poisoned_item_does_not_block_the_rest() {
    let log = new_call_log();
    let mut source = FakeSource::new(log.clone());
    source.items = vec![
        message_item("C1", "U7", "first", TS),
        message_item("C2", "U7", "second", TS),
        message_item("C3", "U7", "third", TS),
    ];
    source.authors.insert("U7".into(), author("U7", "Dana"));
    source.contexts.insert("C1".into(), channel_context("C1", "one"));
    source.contexts.insert("C3".into(), channel_context("C3", "three"));
    source.fail_context_for = vec!["C2".into()];
    let sink = FakeSink::new(log.clone());
    let created = sink.created_tasks();
    let engine = SyncEngine::new(source, sink, "example");

    let report = engine.run_cycle().await.expect("cycle succeeds");

    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(created.lock().expect("created tasks").len(), 2);
    assert_eq!(ack_channels(&log), vec!["C1".to_owned(), "C3".to_owned()]);
}

#[tokio::test]
async fn create_failure_leaves_the_star_in_place() {
    let log = new_call_log();
    let mut source = FakeSource::new(log.clone());
    source.items = vec![message_item("C042", "U7", "ship it", TS)];
    source.authors.insert("U7".into(), author("U7", "Dana"));
    source
        .contexts
        .insert("C042".into(), channel_context("C042", "eng"));
    let mut sink = FakeSink::new(log.clone());
    sink.fail = true;
    let engine = SyncEngine::new(source, sink, "example");

    let report = engine.run_cycle().await.expect("cycle succeeds");

    assert_eq!(report.failed, 1);
    assert_eq!(report.processed, 0);
    assert!(ack_channels(&log).is_empty(), "no acknowledge after a failed create");
}

#[tokio::test]
async fn ack_failure_still_files_the_task() {
    // The accepted at-least-once gap: when star removal fails after the
    // task is created, the item stays starred and the next cycle will
    // file a duplicate.
    let log = new_call_log();
    let mut source = FakeSource::new(log.clone());
    source.items = vec![message_item("C042", "U7", "ship it", TS)];
    source.authors.insert("U7".into(), author("U7", "Dana"));
    source
        .contexts
        .insert("C042".into(), channel_context("C042", "eng"));
    source.fail_ack_for = vec!["C042".into()];
    let sink = FakeSink::new(log.clone());
    let created = sink.created_tasks();
    let engine = SyncEngine::new(source, sink, "example");

    let report = engine.run_cycle().await.expect("cycle succeeds");

    assert_eq!(report.failed, 1);
    assert_eq!(created.lock().expect("created tasks").len(), 1);
}

#[tokio::test]
async fn message_without_payload_is_a_format_failure() {
    let log = new_call_log();
    let mut source = FakeSource::new(log.clone());
    source.items = vec![StarredItem {
        kind: ItemKind::Message,
        channel: Some("C042".into()),
        message: None,
    }];
    let sink = FakeSink::new(log.clone());
    let engine = SyncEngine::new(source, sink, "example");

    let report = engine.run_cycle().await.expect("cycle succeeds");

    assert_eq!(report.failed, 1);
    assert_eq!(
        calls(&log),
        vec![GatewayCall::ListStarred],
        "no lookups for an item with no payload"
    );
}

#[tokio::test]
async fn listing_failure_aborts_the_cycle() {
    let log = new_call_log();
    let mut source = FakeSource::new(log.clone());
    source.fail_list = true;
    source.items = vec![message_item("C042", "U7", "ship it", TS)];
    let sink = FakeSink::new(log.clone());
    let engine = SyncEngine::new(source, sink, "example");

    let err = engine.run_cycle().await.expect_err("cycle fails");

    assert!(err.to_string().starts_with("transport:"));
    assert_eq!(calls(&log), vec![GatewayCall::ListStarred]);
}
