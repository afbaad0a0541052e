//! Core Types für die Detektions-Ampel
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;

/// Grün: keine Detektion (volle Skala, Helligkeit wird beim Schreiben begrenzt)
pub const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };
/// Orange: Warnung
pub const ORANGE: RGB8 = RGB8 { r: 255, g: 100, b: 0 };
/// Rot: Gefahr
pub const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
/// Alle Pixel aus
pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Detektions-Stufe - bestimmt die Farbe der Ampel
///
/// Startzustand ist immer `None`. Nach einem Idle-Timeout fällt die
/// Ampel ebenfalls auf `None` zurück.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionLevel {
    /// Keine Detektion (grün)
    #[default]
    None,
    /// Objekt erkannt (orange, dauerhaft)
    Warn,
    /// Gefahr (rot, blinkend)
    Danger,
}

impl DetectionLevel {
    /// Ordnet ein Kommando-Zeichen ('0', '1', '2') einer Stufe zu
    pub fn from_digit(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(Self::None),
            b'1' => Some(Self::Warn),
            b'2' => Some(Self::Danger),
            _ => None,
        }
    }

    /// Ziffer für Kommando und Status-Quittung (`S:<ziffer>`)
    pub fn digit(self) -> u8 {
        match self {
            Self::None => b'0',
            Self::Warn => b'1',
            Self::Danger => b'2',
        }
    }

    pub fn color(self) -> RGB8 {
        match self {
            Self::None => GREEN,
            Self::Warn => ORANGE,
            Self::Danger => RED,
        }
    }

    /// Nur die höchste Stufe blinkt
    pub fn blinks(self) -> bool {
        matches!(self, Self::Danger)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "keine Detektion",
            Self::Warn => "Warnung",
            Self::Danger => "Gefahr",
        }
    }

    pub fn color_name(self) -> &'static str {
        match self {
            Self::None => "Grün",
            Self::Warn => "Orange",
            Self::Danger => "Rot",
        }
    }

    /// Abbildung Anzahl Detektionen → Stufe, wie sie der Detection Host nutzt
    ///
    /// 0 Objekte → grün, alles andere → rot.
    pub fn from_count(count: usize) -> Self {
        if count == 0 { Self::None } else { Self::Danger }
    }
}

/// Kommando vom Detection Host
///
/// Wird aus dem ersten Zeichen einer Kommandozeile gebildet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// '0', '1', '2' - setzt die Detektions-Stufe
    SetLevel(DetectionLevel),
    /// 'p' - Puls-Animation auf der aktuellen Farbe
    Pulse,
    /// 'v' - Verbose-Ausgabe umschalten
    ToggleVerbose,
}

impl Command {
    /// Parst ein einzelnes Kommando-Byte
    ///
    /// Unbekannte Bytes ergeben `None` und werden vom Controller ignoriert.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'p' => Some(Self::Pulse),
            b'v' => Some(Self::ToggleVerbose),
            other => DetectionLevel::from_digit(other).map(Self::SetLevel),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::SetLevel(level) => level.digit(),
            Self::Pulse => b'p',
            Self::ToggleVerbose => b'v',
        }
    }
}

/// Darstellungsmuster auf dem LED-Peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Alle Pixel in der Zielfarbe
    Fill,
    /// Nur Pixel innerhalb des Kreises; auf anderen Pixel-Zahlen als
    /// der 8×8 Matrix wird stattdessen gefüllt
    Circle,
}

/// Laufzeit-Parameter des Controllers
///
/// In der Firmware sind das Compile-Time-Konstanten (siehe `config.rs`),
/// Tests setzen z.B. kürzere Timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Helligkeits-Obergrenze (0-255), wird beim Schreiben angewendet
    pub brightness: u8,
    pub pattern: Pattern,
    /// Stille auf der seriellen Leitung bis zum Rückfall auf grün
    pub idle_timeout_ms: u64,
    /// Gesamtdauer einer Überblendung
    pub fade_duration_ms: u64,
    /// Anzahl diskreter Schritte einer Überblendung
    pub fade_steps: u16,
    pub blink_interval_ms: u64,
    /// Anzahl Puls-Zyklen (ab- und wieder aufblenden)
    pub pulse_repeats: u8,
    /// Untergrenze der Puls-Helligkeit in Prozent
    pub pulse_floor_percent: u8,
    pub pulse_step_percent: u8,
    pub pulse_step_ms: u64,
    /// Verbose-Ausgabe beim Start
    pub verbose: bool,
}

impl ControllerConfig {
    pub const DEFAULT: Self = Self {
        brightness: 50,
        pattern: Pattern::Circle,
        idle_timeout_ms: 3000,
        fade_duration_ms: 300,
        fade_steps: 20,
        blink_interval_ms: 500,
        pulse_repeats: 2,
        pulse_floor_percent: 20,
        pulse_step_percent: 10,
        pulse_step_ms: 20,
        verbose: false,
    };

    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    pub const fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub const fn with_idle_timeout_ms(mut self, ms: u64) -> Self {
        self.idle_timeout_ms = ms;
        self
    }

    pub const fn with_fade_duration_ms(mut self, ms: u64) -> Self {
        self.fade_duration_ms = ms;
        self
    }

    pub const fn with_blink_interval_ms(mut self, ms: u64) -> Self {
        self.blink_interval_ms = ms;
        self
    }

    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Dauer eines einzelnen Überblend-Schritts (mindestens 1 ms)
    pub const fn fade_step_ms(&self) -> u64 {
        let steps = if self.fade_steps == 0 { 1 } else { self.fade_steps as u64 };
        let step = self.fade_duration_ms / steps;
        if step == 0 { 1 } else { step }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for DetectionLevel {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.color_name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Command::SetLevel(level) => defmt::write!(fmt, "SetLevel({})", level),
            Command::Pulse => defmt::write!(fmt, "Pulse"),
            Command::ToggleVerbose => defmt::write!(fmt, "ToggleVerbose"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_byte_levels() {
        assert_eq!(
            Command::from_byte(b'0'),
            Some(Command::SetLevel(DetectionLevel::None))
        );
        assert_eq!(
            Command::from_byte(b'1'),
            Some(Command::SetLevel(DetectionLevel::Warn))
        );
        assert_eq!(
            Command::from_byte(b'2'),
            Some(Command::SetLevel(DetectionLevel::Danger))
        );
    }

    #[test]
    fn test_command_from_byte_unknown() {
        assert_eq!(Command::from_byte(b'3'), None);
        assert_eq!(Command::from_byte(b'P'), None);
        assert_eq!(Command::from_byte(b' '), None);
    }

    #[test]
    fn test_command_byte_matches_protocol() {
        for byte in [b'0', b'1', b'2', b'p', b'v'] {
            let cmd = Command::from_byte(byte).unwrap();
            assert_eq!(cmd.as_byte(), byte);
        }
    }

    #[test]
    fn test_only_danger_blinks() {
        assert!(!DetectionLevel::None.blinks());
        assert!(!DetectionLevel::Warn.blinks());
        assert!(DetectionLevel::Danger.blinks());
    }

    #[test]
    fn test_from_count() {
        assert_eq!(DetectionLevel::from_count(0), DetectionLevel::None);
        assert_eq!(DetectionLevel::from_count(1), DetectionLevel::Danger);
        assert_eq!(DetectionLevel::from_count(17), DetectionLevel::Danger);
    }

    #[test]
    fn test_fade_step_ms() {
        assert_eq!(ControllerConfig::DEFAULT.fade_step_ms(), 15);
        let instant = ControllerConfig::DEFAULT.with_fade_duration_ms(0);
        assert_eq!(instant.fade_step_ms(), 1);
    }
}
