//! Host-Sender und Ampel-Controller über eine gemeinsame Leitung

mod common;

use std::time::{Duration, Instant};

use ampel_core::{ControllerConfig, DetectionController, DetectionLevel, Pattern};
use ampel_host::DetectionLink;
use common::{MockLedWriter, MockSerialPort};

/// Ein Detektions-Frame alle 100 ms, Bytes des Hosts direkt in die Ampel
fn run_detection(counts: impl Fn(u64) -> usize, duration_ms: u64) -> DetectionController<1> {
    let config = ControllerConfig::DEFAULT.with_pattern(Pattern::Fill);
    let mut ctrl = DetectionController::<1>::new(config);
    let mut serial = MockSerialPort::new();
    let mut led = MockLedWriter::new();
    ctrl.start(0, &mut serial, &mut led).unwrap();

    let start = Instant::now();
    let mut link = DetectionLink::new(Vec::new());
    for now_ms in (0..duration_ms).step_by(100) {
        link.report_count_at(counts(now_ms), start + Duration::from_millis(now_ms))
            .unwrap();
        let sent = std::mem::take(link.port_mut());
        serial.feed(&sent);
        ctrl.poll(now_ms, &mut serial, &mut led).unwrap();
    }
    ctrl
}

#[test]
fn test_continuous_detection_stays_red() {
    let ctrl = run_detection(|_| 3, 10_000);
    assert_eq!(ctrl.level(), DetectionLevel::Danger);
}

#[test]
fn test_detection_ending_returns_to_green() {
    let ctrl = run_detection(|now_ms| if now_ms < 5_000 { 2 } else { 0 }, 10_000);
    assert_eq!(ctrl.level(), DetectionLevel::None);
}

#[test]
fn test_silent_host_falls_back_to_green() {
    let config = ControllerConfig::DEFAULT.with_pattern(Pattern::Fill);
    let mut ctrl = DetectionController::<1>::new(config);
    let mut serial = MockSerialPort::new();
    let mut led = MockLedWriter::new();
    ctrl.start(0, &mut serial, &mut led).unwrap();

    let mut link = DetectionLink::new(Vec::new());
    link.report_count_at(1, Instant::now()).unwrap();
    serial.feed(&link.into_inner());

    // Host hängt: keine Wiederholung mehr
    for now_ms in (0..4_000).step_by(100) {
        ctrl.poll(now_ms, &mut serial, &mut led).unwrap();
    }
    assert_eq!(ctrl.level(), DetectionLevel::None);
}
