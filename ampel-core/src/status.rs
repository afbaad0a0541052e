//! Status-Zeilen auf der seriellen Leitung
//!
//! Jedes Stufen-Kommando wird mit `S:<ziffer>` quittiert. Im Verbose-Modus
//! folgt der Quittung ein lesbarer Text in derselben Zeile, die Zeile bleibt
//! damit für den Host auswertbar.

use core::fmt::Write;

use heapless::String;

use crate::types::DetectionLevel;

/// Maximale Länge einer Status-Zeile (ohne Zeilenende)
pub const STATUS_CAPACITY: usize = 64;

pub type StatusLine = String<STATUS_CAPACITY>;

/// Präfix jeder Quittung
pub const ACK_PREFIX: &str = "S:";

fn line(args: core::fmt::Arguments<'_>) -> StatusLine {
    let mut out = StatusLine::new();
    // Zu lange Zeilen werden abgeschnitten
    let _ = out.write_fmt(args);
    out
}

/// Knappe Quittung, z.B. `S:1`
pub fn ack(level: DetectionLevel) -> StatusLine {
    line(format_args!("{}{}", ACK_PREFIX, level.digit() as char))
}

/// Quittung mit Klartext, z.B. `S:2 Gefahr (Rot)`
pub fn verbose_level(level: DetectionLevel) -> StatusLine {
    line(format_args!(
        "{}{} {} ({})",
        ACK_PREFIX,
        level.digit() as char,
        level.name(),
        level.color_name()
    ))
}

pub fn verbose_toggle(enabled: bool) -> StatusLine {
    line(format_args!(
        "Verbose-Ausgabe {}",
        if enabled { "an" } else { "aus" }
    ))
}

pub fn pulse(level: DetectionLevel) -> StatusLine {
    line(format_args!("Puls-Effekt auf {}", level.color_name()))
}

pub fn timeout(idle_timeout_ms: u64) -> StatusLine {
    line(format_args!(
        "Keine Daten seit {} ms, zurück auf Grün",
        idle_timeout_ms
    ))
}

pub fn ready() -> StatusLine {
    line(format_args!("Ampel bereit"))
}

/// Liest die Stufe aus einer Quittungszeile
///
/// Akzeptiert `S:<ziffer>` mit optionalem Klartext nach einem Leerzeichen.
pub fn parse_ack(line: &str) -> Option<DetectionLevel> {
    let rest = line.trim_end().strip_prefix(ACK_PREFIX)?;
    let mut bytes = rest.bytes();
    let level = DetectionLevel::from_digit(bytes.next()?)?;
    match bytes.next() {
        None | Some(b' ') => Some(level),
        Some(_) => None,
    }
}
