//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use rgb::RGB8;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
}

/// Fehler-Typ für die serielle Leitung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    ReadFailed,
    WriteFailed,
}

/// Sammel-Fehler für einen Controller-Durchlauf
///
/// Transport-Fehler sind nur für die aktuelle Operation fatal,
/// der nächste Schleifendurchlauf versucht es erneut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    Led(LedError),
    Serial(SerialError),
}

impl From<LedError> for ControllerError {
    fn from(e: LedError) -> Self {
        Self::Led(e)
    }
}

impl From<SerialError> for ControllerError {
    fn from(e: SerialError) -> Self {
        Self::Serial(e)
    }
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf RGB LEDs (WS2812/Neopixel), einzeln oder als Matrix.
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter {
    /// Schreibt einen kompletten Frame (ein Eintrag pro Pixel)
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError>;
}

/// Trait für die serielle Kommando-Leitung
///
/// # Implementierungen
/// - **Production:** UartSerialPort (ESP32 UART, 9600 Baud)
/// - **Testing:** MockSerialPort
pub trait SerialPort {
    /// Liest ein Byte, falls sofort verfügbar
    ///
    /// `Ok(None)` heißt: im Moment liegen keine weiteren Bytes an.
    fn read_byte(&mut self) -> Result<Option<u8>, SerialError>;

    /// Schreibt eine Zeile inklusive Zeilenende
    fn write_line(&mut self, line: &str) -> Result<(), SerialError>;
}

#[cfg(feature = "defmt")]
impl defmt::Format for ControllerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ControllerError::Led(LedError::WriteFailed) => defmt::write!(fmt, "LED write failed"),
            ControllerError::Serial(SerialError::ReadFailed) => {
                defmt::write!(fmt, "Serial read failed")
            }
            ControllerError::Serial(SerialError::WriteFailed) => {
                defmt::write!(fmt, "Serial write failed")
            }
        }
    }
}
