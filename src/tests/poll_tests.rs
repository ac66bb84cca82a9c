// Poll loop tests - run on a paused clock so intervals are deterministic

use crate::connectivity::{ConnectivitySignal, LinkProbe, LinkWatcher, NetworkIdentity, PollLoop};
use super::fakes::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const OFFICE: &str = "203.0.113.10";

fn office() -> NetworkIdentity {
    NetworkIdentity::new("Office", ip(OFFICE))
}

#[tokio::test(start_paused = true)]
async fn test_poll_loop_ticks_on_interval() {
    let harness = Harness::new(ScriptedProbe::constant(Ok(ip(OFFICE))));
    harness.identity.save(&office()).unwrap();
    let (_signal_tx, signal_rx) = mpsc::channel(4);

    let handle = PollLoop::new(harness.monitor.clone(), Duration::from_secs(1)).spawn(signal_rx);
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    assert!(harness.probe.calls() >= 3, "expected at least 3 probes, got {}", harness.probe.calls());
    assert_eq!(harness.notifier.count(), 1);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_poll_loop_never_overlaps_probes() {
    let harness = Harness::new(
        ScriptedProbe::constant(Ok(ip(OFFICE))).with_delay(Duration::from_millis(2_500)),
    );
    let (_signal_tx, signal_rx) = mpsc::channel(4);

    let handle = PollLoop::new(harness.monitor.clone(), Duration::from_secs(1)).spawn(signal_rx);
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(harness.probe.max_in_flight(), 1);
    assert!(harness.probe.calls() <= 4, "ticks were queued: {} probes", harness.probe.calls());

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_try_run_cycle_skips_while_cycle_in_flight() {
    let harness = Harness::new(
        ScriptedProbe::constant(Ok(ip(OFFICE))).with_delay(Duration::from_secs(1)),
    );

    let monitor = harness.monitor.clone();
    let running = tokio::spawn(async move { monitor.run_cycle().await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(harness.monitor.try_run_cycle().await.is_none());

    running.await.unwrap();
    assert!(harness.monitor.try_run_cycle().await.is_some());
    assert_eq!(harness.probe.max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_signal_triggers_immediate_probe() {
    let harness = Harness::new(ScriptedProbe::constant(Ok(ip(OFFICE))));
    let (signal_tx, signal_rx) = mpsc::channel(4);

    let handle = PollLoop::new(harness.monitor.clone(), Duration::from_secs(3_600)).spawn(signal_rx);

    // First tick fires immediately
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(harness.probe.calls(), 1);

    signal_tx.send(ConnectivitySignal::BecameReachable).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(harness.probe.calls(), 2);

    signal_tx.send(ConnectivitySignal::BecameUnreachable).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(harness.probe.calls(), 3);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_closed_signal_source_keeps_polling() {
    let harness = Harness::new(ScriptedProbe::constant(Ok(ip(OFFICE))));
    let (signal_tx, signal_rx) = mpsc::channel(4);
    drop(signal_tx);

    let handle = PollLoop::new(harness.monitor.clone(), Duration::from_secs(1)).spawn(signal_rx);
    tokio::time::sleep(Duration::from_millis(2_500)).await;

    assert!(harness.probe.calls() >= 2);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_polling() {
    let harness = Harness::new(ScriptedProbe::constant(Ok(ip(OFFICE))));
    let (_signal_tx, signal_rx) = mpsc::channel(4);

    let handle = PollLoop::new(harness.monitor.clone(), Duration::from_secs(1)).spawn(signal_rx);
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(!handle.is_finished());

    handle.shutdown().await;
    let calls = harness.probe.calls();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(harness.probe.calls(), calls);
}

struct ToggleLink {
    up: AtomicBool,
}

impl LinkProbe for ToggleLink {
    fn has_route(&self) -> bool {
        self.up.load(Ordering::SeqCst)
    }
}

#[tokio::test(start_paused = true)]
async fn test_link_watcher_emits_edges_only() {
    let link = Arc::new(ToggleLink {
        up: AtomicBool::new(true),
    });
    let (mut signals, task) = LinkWatcher::new(link.clone(), Duration::from_secs(1)).subscribe();

    // Steady link produces nothing
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert!(signals.try_recv().is_err());

    link.up.store(false, Ordering::SeqCst);
    assert_eq!(signals.recv().await, Some(ConnectivitySignal::BecameUnreachable));

    link.up.store(true, Ordering::SeqCst);
    assert_eq!(signals.recv().await, Some(ConnectivitySignal::BecameReachable));

    task.abort();
}

#[tokio::test(start_paused = true)]
async fn test_link_watcher_stops_when_receiver_dropped() {
    let link = Arc::new(ToggleLink {
        up: AtomicBool::new(true),
    });
    let (signals, task) = LinkWatcher::new(link.clone(), Duration::from_secs(1)).subscribe();
    drop(signals);

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    link.up.store(false, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(task.is_finished());
}
