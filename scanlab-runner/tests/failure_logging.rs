//! Failure logging for the batch scan.
//!
//! Kept in its own test binary: the `log` logger is process-global, so any
//! other test running alongside would add records to the capture.

use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};

use scanlab_core::data::SourceId;
use scanlab_core::strategy::RsiEmaStrategy;
use scanlab_runner::{BatchScanner, ScanConfig};

struct Capture(Mutex<Vec<(Level, String)>>);

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.0
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

fn write_csv(dir: &Path, symbol: &str) -> SourceId {
    let base = chrono::DateTime::parse_from_rfc3339("2024-05-02T01:00:00+00:00").unwrap();
    let mut csv = String::from("Datetime,Open,High,Low,Close,Volume\n");
    for i in 0..60 {
        let ts = base + chrono::Duration::minutes(5 * i as i64);
        let close = 100.0 + i as f64;
        csv.push_str(&format!("{},{close},{close},{close},{close},1000\n", ts.to_rfc3339()));
    }
    let path = dir.join(format!("{symbol}.csv"));
    std::fs::write(&path, csv).unwrap();
    SourceId::from(path)
}

#[test]
fn missing_source_logs_exactly_one_error() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Debug);

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("2330.csv");
    let sources = [
        write_csv(dir.path(), "1101"),
        SourceId::from(missing.clone()),
        write_csv(dir.path(), "2317"),
    ];

    let scanner = BatchScanner::new(&ScanConfig::default(), Arc::new(RsiEmaStrategy::new())).unwrap();
    let outcome = scanner.scan(&sources);
    assert_eq!(outcome.evaluated, 2);
    assert_eq!(outcome.failed_symbols(), vec!["2330".to_string()]);

    let records = CAPTURE.0.lock().unwrap();
    let errors: Vec<&String> = records
        .iter()
        .filter(|(level, _)| *level == Level::Error)
        .map(|(_, message)| message)
        .collect();
    assert_eq!(errors.len(), 1, "error records: {errors:?}");
    assert!(errors[0].contains("2330"));
    assert!(errors[0].contains(&missing.display().to_string()));
}
