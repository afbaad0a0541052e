// UART Kommando-Leitung
//
// Implementiert den SerialPort-Trait aus ampel-core über UART1.
// Gelesen wird nur, was bereits im RX-FIFO liegt (nie blockierend).

use ampel_core::{SerialError, SerialPort};
use esp_hal::Blocking;
use esp_hal::uart::Uart;

/// Serielle Leitung zum Detection Host (9600 Baud, 8N1)
pub struct UartSerialPort<'a> {
    uart: Uart<'a, Blocking>,
}

impl<'a> UartSerialPort<'a> {
    pub fn new(uart: Uart<'a, Blocking>) -> Self {
        Self { uart }
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<(), SerialError> {
        while !data.is_empty() {
            let written = self
                .uart
                .write(data)
                .map_err(|_| SerialError::WriteFailed)?;
            data = &data[written..];
        }
        Ok(())
    }
}

impl SerialPort for UartSerialPort<'_> {
    fn read_byte(&mut self) -> Result<Option<u8>, SerialError> {
        if !self.uart.read_ready() {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(_) => Err(SerialError::ReadFailed),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\r\n")?;
        self.uart.flush().map_err(|_| SerialError::WriteFailed)
    }
}
