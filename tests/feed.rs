use std::time::Duration;

use fleetiq::{FeedHandle, FeedSettings, LiveStats};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::{
    sync::broadcast::error::{RecvError, TryRecvError},
    time::Instant,
};

fn settings() -> FeedSettings {
    FeedSettings {
        period: Duration::from_secs(5),
        ..FeedSettings::default()
    }
}

fn feed(seed: u64) -> FeedHandle {
    FeedHandle::spawn(settings(), ChaCha8Rng::seed_from_u64(seed))
}

#[tokio::test(start_paused = true)]
async fn first_update_arrives_after_one_period() {
    let start = Instant::now();
    let handle = feed(1);
    let mut updates = handle.subscribe();

    let initial = handle.latest();
    assert_eq!(initial.sequence, 0);
    assert_eq!(initial.stats, LiveStats::default());

    let frame = updates.recv().await.unwrap();
    assert_eq!(frame.sequence, 1);
    assert!(start.elapsed() >= Duration::from_secs(5));
    assert!((247..=249).contains(&frame.stats.total_calls));
    assert_eq!(handle.latest(), frame);
}

#[tokio::test(start_paused = true)]
async fn updates_keep_a_fixed_cadence() {
    let handle = feed(2);
    tokio::time::sleep(Duration::from_millis(16_500)).await;
    assert_eq!(handle.latest().sequence, 3);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_published_after_cancel() {
    let mut handle = feed(3);
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    let before = handle.latest();
    assert_eq!(before.sequence, 2);

    handle.cancel();
    assert!(handle.is_cancelled());
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(handle.latest(), before);

    handle.cancel();
    assert!(handle.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_closes_the_update_stream() {
    let handle = feed(4);
    let mut updates = handle.subscribe();
    drop(handle);

    let outcome = tokio::time::timeout(Duration::from_secs(60), updates.recv()).await;
    assert!(matches!(outcome, Ok(Err(RecvError::Closed))));
}

#[tokio::test(start_paused = true)]
async fn sessions_tick_independently() {
    let mut first = feed(5);
    let second = feed(5);
    tokio::time::sleep(Duration::from_millis(5_500)).await;
    first.cancel();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(first.latest().sequence, 1);
    assert_eq!(second.latest().sequence, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancel_is_final_on_a_threaded_runtime() {
    for seed in 0..200 {
        let mut handle = FeedHandle::spawn(
            FeedSettings {
                period: Duration::from_micros(200),
                ..FeedSettings::default()
            },
            ChaCha8Rng::seed_from_u64(seed),
        );
        let mut updates = handle.subscribe();
        tokio::time::sleep(Duration::from_micros(50 * (seed % 20))).await;

        handle.cancel();
        let last = handle.latest();
        tokio::time::sleep(Duration::from_millis(2)).await;

        assert_eq!(handle.latest(), last, "seed {seed}");
        loop {
            match updates.try_recv() {
                Ok(frame) => assert!(frame.sequence <= last.sequence, "seed {seed}"),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    }
}
