// Ampel Task - liest Kommandos über UART und steuert die LED-Matrix
use defmt::{error, info, warn};
use embassy_time::{Duration, Instant, Timer};
use esp_hal::uart::{Config as UartConfig, Uart};
use esp_hal_smartled::smart_led_buffer;

use crate::config::{CONTROLLER_CONFIG, LED_COUNT, LOOP_DELAY_MS, RMT_CLOCK_MHZ, UART_BAUD};
use crate::hal::{RmtLedWriter, UartSerialPort};
use crate::{DetectionController, DetectionLevel, SerialPort, SmartLedWriter};

/// Millisekunden seit dem Boot (monoton)
fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Ampel Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// Diese Funktion enthält den kompletten Polling-Loop:
/// - Liest Kommandos von der seriellen Leitung
/// - Schaltet Überblendung, Puls und Blinken weiter
/// - Fällt nach Stille auf Grün zurück
/// - Schläft `LOOP_DELAY_MS` zwischen zwei Durchläufen
///
/// Fehler beim Lesen/Schreiben sind nur für den aktuellen Durchlauf fatal,
/// der nächste Durchlauf versucht es erneut.
///
/// # Trait-basierte Abstraktion
/// Die generischen Parameter ermöglichen:
/// - Real Hardware (UartSerialPort, RmtLedWriter) im Production-Code
/// - Mock Implementierungen in Tests
pub async fn ampel_logic<S: SerialPort, L: SmartLedWriter>(mut serial: S, mut led: L) -> ! {
    let mut controller = DetectionController::<LED_COUNT>::new(CONTROLLER_CONFIG);

    if let Err(e) = controller.start(now_ms(), &mut serial, &mut led) {
        error!("Ampel: Start failed: {}", e);
    }
    info!(
        "Ampel: Ready (idle timeout {} ms, verbose {})",
        CONTROLLER_CONFIG.idle_timeout_ms,
        controller.is_verbose()
    );

    let mut last_level = controller.level();
    let mut last_verbose = controller.is_verbose();

    loop {
        if let Err(e) = controller.poll(now_ms(), &mut serial, &mut led) {
            warn!("Ampel: Poll error: {}", e);
        }

        // Zustandswechsel im defmt-Log festhalten
        let level = controller.level();
        if level != last_level {
            if level == DetectionLevel::None
                && now_ms().saturating_sub(controller.last_activity_ms())
                    > CONTROLLER_CONFIG.idle_timeout_ms
            {
                info!("Ampel: Idle timeout, back to {}", level);
            } else {
                info!("Ampel: Level {} -> {}", last_level, level);
            }
            last_level = level;
        }
        if controller.is_verbose() != last_verbose {
            last_verbose = controller.is_verbose();
            info!("Ampel: Verbose {}", last_verbose);
        }

        // Async Delay: gibt CPU an den Executor zurück
        Timer::after(Duration::from_millis(LOOP_DELAY_MS)).await;
    }
}

/// Ampel Task - Embassy Task für die Ausführung auf dem ESP32-C6
///
/// Dieser Task übernimmt die Hardware-Initialisierung und ruft dann
/// die testbare `ampel_logic()` Funktion auf.
///
/// # Parameter
/// - `gpio8`: GPIO8 Peripheral für LED-Datenleitung
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `uart1`: UART1 Peripheral für die Kommando-Leitung
/// - `rx_pin` / `tx_pin`: GPIO4 (RX) und GPIO5 (TX)
#[embassy_executor::task]
pub async fn ampel_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    uart1: esp_hal::peripherals::UART1<'static>,
    rx_pin: esp_hal::peripherals::GPIO4<'static>,
    tx_pin: esp_hal::peripherals::GPIO5<'static>,
) {
    // UART initialisieren: 9600 Baud, 8N1
    let uart_config = UartConfig::default().with_baudrate(UART_BAUD);
    let uart = match Uart::new(uart1, uart_config) {
        Ok(uart) => uart.with_rx(rx_pin).with_tx(tx_pin),
        Err(_) => {
            error!("Ampel: UART init failed, task stopped");
            return;
        }
    };
    let serial = UartSerialPort::new(uart);

    // Buffer für SmartLED Daten erstellen (64 LEDs)
    // Macro allokiert Speicher im richtigen Format für RMT
    let mut rmt_buffer = smart_led_buffer!(LED_COUNT);

    // Hardware initialisieren: RmtLedWriter kapselt RMT + SmartLED
    let led = match RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(led) => led,
        Err(_) => {
            error!("Ampel: RMT init failed, task stopped");
            return;
        }
    };

    // Business Logic aufrufen (läuft endlos)
    ampel_logic(serial, led).await
}
