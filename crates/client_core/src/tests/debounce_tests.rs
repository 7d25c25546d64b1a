use super::*;
use tokio::time::{sleep, timeout, Instant};

const QUIET: Duration = Duration::from_millis(500);

#[tokio::test(start_paused = true)]
async fn emits_only_the_last_value_of_a_burst_after_the_quiet_period() {
    let start = Instant::now();
    let mut search = DebouncedValue::new(String::new(), QUIET);
    let mut rx = search.subscribe();

    search.set("p".to_string());
    sleep(Duration::from_millis(50)).await;
    search.set("ph".to_string());
    sleep(Duration::from_millis(50)).await;
    search.set("pho".to_string());
    sleep(Duration::from_millis(400)).await;
    search.set("phone".to_string());
    assert!(!rx.has_changed().expect("sender alive"));

    rx.changed().await.expect("debounced value");
    assert!(
        start.elapsed() >= Duration::from_millis(1000),
        "emitted too early: {:?}",
        start.elapsed()
    );
    assert_eq!(*rx.borrow_and_update(), "phone");

    assert!(
        timeout(Duration::from_secs(5), rx.changed()).await.is_err(),
        "no further emission expected"
    );
}

#[tokio::test(start_paused = true)]
async fn keeps_working_after_each_settle() {
    let mut search = DebouncedValue::new(String::new(), QUIET);
    let mut rx = search.subscribe();

    search.set("milk".to_string());
    assert!(search.is_pending());
    rx.changed().await.expect("first value");
    assert_eq!(*rx.borrow_and_update(), "milk");

    sleep(Duration::from_millis(10)).await;
    assert!(!search.is_pending());

    search.set("bread".to_string());
    rx.changed().await.expect("second value");
    assert_eq!(*rx.borrow_and_update(), "bread");
    assert_eq!(search.current(), "bread");
}

#[tokio::test(start_paused = true)]
async fn settling_on_the_current_value_does_not_notify() {
    let mut search = DebouncedValue::new("tea".to_string(), QUIET);
    let mut rx = search.subscribe();

    search.set("teapot".to_string());
    sleep(Duration::from_millis(100)).await;
    search.set("tea".to_string());
    sleep(QUIET * 2).await;

    assert!(!rx.has_changed().expect("sender alive"));
    assert_eq!(search.current(), "tea");
}

#[tokio::test(start_paused = true)]
async fn dropping_cancels_the_pending_update() {
    let mut search = DebouncedValue::new(String::new(), QUIET);
    let mut rx = search.subscribe();

    search.set("coffee".to_string());
    drop(search);
    sleep(QUIET * 3).await;

    assert!(rx.changed().await.is_err(), "channel closes without a value");
    assert_eq!(*rx.borrow(), "");
}

#[tokio::test(start_paused = true)]
async fn cancel_discards_the_pending_update() {
    let mut search = DebouncedValue::new(String::new(), QUIET);
    let rx = search.subscribe();

    search.set("juice".to_string());
    search.cancel();
    sleep(QUIET * 2).await;

    assert!(!rx.has_changed().expect("sender alive"));
    assert!(!search.is_pending());
    assert_eq!(search.quiet_period(), QUIET);
}
