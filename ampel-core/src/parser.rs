//! Kommando-Parser für die serielle Leitung
//!
//! Sammelt eingehende Bytes bis zu einem Zeilenende (`\n` / `\r`) oder bis
//! die Leitung im Moment keine weiteren Bytes liefert. Ausgewertet wird nur
//! das ERSTE gesammelte Zeichen, der Rest der Zeile wird verworfen.
//! Hosts verlassen sich auf dieses Verhalten (`"12"` ohne Zeilenende = `'1'`).

use heapless::Vec;

/// Kapazität des Zeilenpuffers; überzählige Bytes werden verworfen
pub const PENDING_CAPACITY: usize = 16;

#[derive(Debug, Default)]
pub struct CommandParser {
    pending: Vec<u8, PENDING_CAPACITY>,
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

impl CommandParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nimmt ein Byte entgegen
    ///
    /// Gibt bei einem Zeilenende das erste Zeichen der Zeile zurück.
    /// Leere Zeilen ergeben kein Kommando.
    pub fn push(&mut self, byte: u8) -> Option<u8> {
        if is_terminator(byte) {
            return self.flush();
        }
        // Voller Puffer: nur das erste Zeichen zählt ohnehin
        let _ = self.pending.push(byte);
        None
    }

    /// Schließt die aktuelle Zeile ab (keine weiteren Bytes verfügbar)
    pub fn flush(&mut self) -> Option<u8> {
        let first = self.pending.first().copied();
        self.pending.clear();
        first
    }

    /// Noch nicht abgeschlossene Bytes
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminated_line_dispatches_first_char() {
        let mut parser = CommandParser::new();
        assert_eq!(parser.push(b'1'), None);
        assert_eq!(parser.push(b'\n'), Some(b'1'));
        assert!(parser.pending().is_empty());
    }

    #[test]
    fn test_extra_chars_are_discarded() {
        let mut parser = CommandParser::new();
        parser.push(b'2');
        parser.push(b'0');
        parser.push(b'p');
        assert_eq!(parser.push(b'\r'), Some(b'2'));
    }

    #[test]
    fn test_empty_line_dispatches_nothing() {
        let mut parser = CommandParser::new();
        assert_eq!(parser.push(b'\r'), None);
        assert_eq!(parser.push(b'\n'), None);
    }

    #[test]
    fn test_flush_bare_byte() {
        let mut parser = CommandParser::new();
        parser.push(b'0');
        assert_eq!(parser.flush(), Some(b'0'));
        assert_eq!(parser.flush(), None);
    }

    #[test]
    fn test_crlf_after_flush_is_ignored() {
        let mut parser = CommandParser::new();
        parser.push(b'1');
        assert_eq!(parser.flush(), Some(b'1'));
        assert_eq!(parser.push(b'\r'), None);
        assert_eq!(parser.push(b'\n'), None);
    }

    #[test]
    fn test_overflow_keeps_first_char() {
        let mut parser = CommandParser::new();
        parser.push(b'v');
        for _ in 0..(PENDING_CAPACITY * 2) {
            parser.push(b'x');
        }
        assert_eq!(parser.pending().len(), PENDING_CAPACITY);
        assert_eq!(parser.push(b'\n'), Some(b'v'));
    }
}
