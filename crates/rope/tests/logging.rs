use log::{Level, Log, Metadata, Record};
use std::sync::Mutex;
use treap_rope::Priorities;

struct Capture(Mutex<Vec<(Level, String)>>);

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.0.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

#[test]
fn seed_sources_log_at_debug() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(log::LevelFilter::Trace);

    let _ = Priorities::new();
    let _ = Priorities::with_seed(3);

    let records = CAPTURE.0.lock().unwrap();
    let seeding: Vec<_> = records.iter().filter(|(_, message)| message.starts_with("seeding")).collect();
    assert_eq!(2, seeding.len());
    assert!(seeding.iter().all(|(level, _)| *level == Level::Debug));
    assert!(seeding[0].1.contains("thread-local"));
    assert!(seeding[1].1.contains("fixed seed 3"));
}
