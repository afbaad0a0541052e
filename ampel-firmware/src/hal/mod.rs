// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul implementiert die Traits aus ampel-core
// für die echte Hardware (RMT für LEDs, UART für Kommandos).

pub mod led_writer;
pub mod serial_port;

pub use led_writer::{LED_BUFFER_SIZE, RmtLedWriter};
pub use serial_port::UartSerialPort;
