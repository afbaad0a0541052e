//! Serielle Ports finden und öffnen

use std::thread;
use std::time::Duration;

use log::info;
use serialport::SerialPort;

use crate::{LinkError, LinkResult};

/// Wartezeit nach dem Öffnen: das Board startet beim Verbinden neu
pub const RESET_SETTLE: Duration = Duration::from_secs(2);

/// Lese-Timeout; kurz, damit `read_acks` nicht lange blockiert
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Filtert Portnamen auf typische USB-Seriell-Adapter
pub fn candidate_ports<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(Into::into)
        .filter(|name| ["USB", "ACM", "COM"].iter().any(|tag| name.contains(tag)))
        .collect()
}

/// Bevorzugt einen ACM-Port, sonst den ersten Kandidaten
pub fn pick_default(candidates: &[String]) -> Option<&str> {
    candidates
        .iter()
        .find(|name| name.contains("ACM"))
        .or_else(|| candidates.first())
        .map(String::as_str)
}

/// Alle passenden Ports dieses Systems
pub fn available_candidates() -> LinkResult<Vec<String>> {
    let ports = serialport::available_ports()?;
    Ok(candidate_ports(ports.into_iter().map(|p| p.port_name)))
}

/// Wählt automatisch einen Port oder meldet `NoPortFound`
pub fn detect_port() -> LinkResult<String> {
    let candidates = available_candidates()?;
    pick_default(&candidates)
        .map(str::to_owned)
        .ok_or(LinkError::NoPortFound)
}

/// Öffnet den Port und wartet, bis das Board nach dem Reset bereit ist
pub fn open(port: &str, baud: u32) -> LinkResult<Box<dyn SerialPort>> {
    let handle = serialport::new(port, baud).timeout(READ_TIMEOUT).open()?;
    info!("Verbunden mit {} ({} Baud), warte auf Reset...", port, baud);
    thread::sleep(RESET_SETTLE);
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_ports_filter() {
        let names = ["/dev/ttyS0", "/dev/ttyUSB0", "/dev/ttyACM0", "COM3", "/dev/tty.Bluetooth"];
        assert_eq!(
            candidate_ports(names),
            vec!["/dev/ttyUSB0", "/dev/ttyACM0", "COM3"]
        );
    }

    #[test]
    fn test_pick_default_prefers_acm() {
        let candidates = candidate_ports(["/dev/ttyUSB0", "/dev/ttyACM1"]);
        assert_eq!(pick_default(&candidates), Some("/dev/ttyACM1"));
    }

    #[test]
    fn test_pick_default_falls_back_to_first() {
        let candidates = candidate_ports(["COM4", "COM7"]);
        assert_eq!(pick_default(&candidates), Some("COM4"));
        assert_eq!(pick_default(&[]), None);
    }
}
