//! Ampel Host - Detection-Host-Seite der seriellen Leitung
//!
//! Sendet Ein-Byte-Kommandos an die Ampel, liest die `S:<ziffer>`-Quittungen
//! und findet passende serielle Ports. Die Detektion selbst ist nicht Teil
//! dieser Crate, sie liefert nur die Anzahl erkannter Objekte.

pub mod link;
pub mod ports;
pub mod session;

pub use link::DetectionLink;
pub use session::{TestMode, TestPlan};

/// Fehler auf der Host-Seite
#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    #[error("serial I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("no serial port found (USB/ACM/COM)")]
    NoPortFound,
}

pub type LinkResult<T> = Result<T, LinkError>;
