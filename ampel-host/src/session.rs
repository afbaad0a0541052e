//! Verbindungstest: spielt Farbfolgen auf der Ampel ab

use std::io::{Read, Write};
use std::time::Duration;

use ampel_core::DetectionLevel;
use log::{info, warn};

use crate::{DetectionLink, LinkResult};

/// Pause zwischen Farbwechsel und Puls im Puls-Test
pub const PULSE_LEAD_IN: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TestMode {
    /// Grün → Orange → Rot, `cycles` mal, danach Grün
    Basic,
    /// Einmal Grün → Orange → Rot → Grün
    Advanced,
    /// Jede Farbe mit anschließendem Puls
    Pulse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestPlan {
    pub mode: TestMode,
    pub cycles: u32,
    pub delay: Duration,
}

const SEQUENCE: [DetectionLevel; 3] = [
    DetectionLevel::None,
    DetectionLevel::Warn,
    DetectionLevel::Danger,
];

/// Setzt eine Stufe und protokolliert die Quittungen der Ampel
fn show<P: Read + Write>(link: &mut DetectionLink<P>, level: DetectionLevel) -> LinkResult<()> {
    info!("{} LED", level.color_name());
    link.set_level(level)?;
    check_acks(link, Some(level))
}

fn check_acks<P: Read + Write>(
    link: &mut DetectionLink<P>,
    expected: Option<DetectionLevel>,
) -> LinkResult<()> {
    for ack in link.read_acks()? {
        match expected {
            Some(level) if level != ack => {
                warn!("Quittung S:{} passt nicht zu {}", ack.digit() as char, level.color_name())
            }
            _ => info!("Quittung S:{}", ack.digit() as char),
        }
    }
    Ok(())
}

/// Führt den Test aus
///
/// `sleep` wird für alle Wartezeiten genutzt (in Tests ein No-op).
pub fn run<P, F>(link: &mut DetectionLink<P>, plan: &TestPlan, mut sleep: F) -> LinkResult<()>
where
    P: Read + Write,
    F: FnMut(Duration),
{
    match plan.mode {
        TestMode::Basic => {
            info!("Basis-Test ({} Zyklen)", plan.cycles);
            for cycle in 0..plan.cycles {
                info!("Zyklus {}/{}", cycle + 1, plan.cycles);
                for level in SEQUENCE {
                    show(link, level)?;
                    sleep(plan.delay);
                }
            }
            show(link, DetectionLevel::None)?;
        }
        TestMode::Advanced => {
            info!("Erweiterter Test");
            for level in SEQUENCE.into_iter().chain([DetectionLevel::None]) {
                show(link, level)?;
                sleep(plan.delay);
            }
        }
        TestMode::Pulse => {
            info!("Puls-Test");
            for level in SEQUENCE {
                show(link, level)?;
                sleep(PULSE_LEAD_IN);
                link.pulse()?;
                check_acks(link, None)?;
                sleep(plan.delay);
            }
            show(link, DetectionLevel::None)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Port-Attrappe: schreibt in einen Vec, Lesen liefert sofort Timeout
    #[derive(Default)]
    struct RecordingPort {
        written: Vec<u8>,
    }

    impl Read for RecordingPort {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::ErrorKind::TimedOut.into())
        }
    }

    impl Write for RecordingPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_plan(mode: TestMode, cycles: u32) -> (Vec<u8>, usize) {
        let mut link = DetectionLink::new(RecordingPort::default());
        let plan = TestPlan {
            mode,
            cycles,
            delay: Duration::from_millis(1),
        };
        let mut sleeps = 0;
        run(&mut link, &plan, |_| sleeps += 1).unwrap();
        (link.into_inner().written, sleeps)
    }

    #[test]
    fn test_basic_mode_sequence() {
        // Das erste Grün wird unterdrückt, die Ampel startet grün
        let (written, sleeps) = run_plan(TestMode::Basic, 2);
        assert_eq!(written, b"120120".to_vec());
        assert_eq!(sleeps, 6);
    }

    #[test]
    fn test_advanced_mode_sequence() {
        let (written, sleeps) = run_plan(TestMode::Advanced, 5);
        assert_eq!(written, b"120".to_vec());
        assert_eq!(sleeps, 4);
    }

    #[test]
    fn test_pulse_mode_sequence() {
        let (written, sleeps) = run_plan(TestMode::Pulse, 1);
        assert_eq!(written, b"p1p2p0".to_vec());
        assert_eq!(sleeps, 6);
    }
}
