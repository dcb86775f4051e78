//! Live ticker lifecycle against a real backend

use std::time::Duration as StdDuration;

use chrono::Duration;
use tickbook_core::{ActiveBlockTicker, TickerConfig};

mod support;
use support::{nine_am, Harness, Op};

fn fast_config() -> TickerConfig {
    TickerConfig { period: StdDuration::from_secs(1), stop_timeout: StdDuration::from_secs(2) }
}

async fn running_harness() -> (Harness, String) {
    let harness = Harness::logged_in().await;
    harness.backend.start_task(&harness.task("T-1"), &harness.activity("A-1")).await;
    harness.backend.list_day_timeline(None).await.expect("timeline loads");
    let block_id = harness.backend.snapshot().active_block().expect("active block").id.clone();
    (harness, block_id)
}

#[tokio::test(start_paused = true)]
async fn ticks_move_the_active_block_end() {
    let (harness, block_id) = running_harness().await;
    let mut ticker = ActiveBlockTicker::with_config(harness.backend.clone(), fast_config());

    ticker.sync_with(&harness.backend.snapshot()).await.unwrap();
    assert_eq!(ticker.block_id(), Some(block_id.as_str()));

    harness.clock.advance(Duration::seconds(5));
    tokio::time::sleep(StdDuration::from_millis(1_100)).await;

    let block = harness.backend.snapshot().find_block(&block_id).cloned().unwrap();
    assert_eq!(block.end, nine_am() + Duration::seconds(5));
    assert_eq!(harness.connector.calls(Op::UpdateTimelineItem), 0);

    ticker.stop().await.unwrap();
    assert!(!ticker.is_running());
}

#[tokio::test(start_paused = true)]
async fn starting_the_same_block_twice_keeps_one_loop() {
    let (harness, block_id) = running_harness().await;
    let mut ticker = ActiveBlockTicker::with_config(harness.backend.clone(), fast_config());

    assert!(ticker.start(&block_id).unwrap());
    assert!(!ticker.start(&block_id).unwrap());
    assert!(ticker.start("other-block").unwrap());
    assert_eq!(ticker.block_id(), Some("other-block"));

    ticker.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn sync_stops_once_the_task_is_stopped() {
    let (harness, _block_id) = running_harness().await;
    let mut ticker = ActiveBlockTicker::with_config(harness.backend.clone(), fast_config());
    ticker.sync_with(&harness.backend.snapshot()).await.unwrap();
    assert!(ticker.is_running());

    harness.clock.advance(Duration::minutes(30));
    harness.backend.stop_task(&harness.task("T-1")).await;
    harness.backend.list_day_timeline(None).await.unwrap();

    let state = harness.backend.snapshot();
    assert!(state.active_block().is_none());
    ticker.sync_with(&state).await.unwrap();
    assert!(!ticker.is_running());
    assert!(ticker.block_id().is_none());
}

#[tokio::test]
async fn stop_without_start_is_a_no_op() {
    let harness = Harness::new();
    let mut ticker = ActiveBlockTicker::new(harness.backend.clone());
    ticker.stop().await.unwrap();
    assert!(!ticker.is_running());
}
