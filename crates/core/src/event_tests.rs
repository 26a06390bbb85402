use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn per_kind_subscriber_only_sees_its_kind() {
    let bus = EventBus::new();
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    bus.subscribe(EventKind::TaskQueued, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    bus.emit(Event::new(EventKind::TaskStarted, Utc::now()));
    assert_eq!(count.load(Ordering::SeqCst), 0);
    bus.emit(Event::new(EventKind::TaskQueued, Utc::now()));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn any_subscriber_sees_every_kind() {
    let bus = EventBus::new();
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    bus.subscribe_any(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    bus.emit(Event::new(EventKind::TaskQueued, Utc::now()));
    bus.emit(Event::new(EventKind::DaemonHeartbeat, Utc::now()));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn listeners_fire_in_fifo_registration_order() {
    let bus = EventBus::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for i in 0..5 {
        let order = order.clone();
        bus.subscribe(EventKind::TaskQueued, move |_| order.lock().push(i));
    }
    bus.emit(Event::new(EventKind::TaskQueued, Utc::now()));
    assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn a_panicking_listener_does_not_stop_later_listeners() {
    let bus = EventBus::new();
    bus.subscribe(EventKind::TaskQueued, |_| panic!("boom"));
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    bus.subscribe(EventKind::TaskQueued, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    bus.emit(Event::new(EventKind::TaskQueued, Utc::now()));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn unsubscribe_stops_future_deliveries() {
    let bus = EventBus::new();
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let handle = bus.subscribe(EventKind::TaskQueued, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    bus.emit(Event::new(EventKind::TaskQueued, Utc::now()));
    handle.unsubscribe();
    bus.emit(Event::new(EventKind::TaskQueued, Utc::now()));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn event_data_round_trips() {
    let event = Event::new(EventKind::ScanCompleted, Utc::now()).with("scanner", "tlp-headers");
    assert_eq!(event.data.get("scanner").unwrap(), "tlp-headers");
}
