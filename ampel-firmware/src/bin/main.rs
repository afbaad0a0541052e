// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use ampel_led::config::{LED_COUNT, LED_GPIO_PIN, UART_BAUD, UART_RX_GPIO_PIN, UART_TX_GPIO_PIN};
use ampel_led::tasks::ampel_task;
use defmt::{error, info};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, startet Embassy Runtime und spawnt den Ampel-Task.
/// Danach schläft main() - die Arbeit läuft im Task.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    info!(
        "Ampel: {} LEDs an GPIO{}, UART1 {} Baud (RX GPIO{}, TX GPIO{})",
        LED_COUNT, LED_GPIO_PIN, UART_BAUD, UART_RX_GPIO_PIN, UART_TX_GPIO_PIN
    );

    // Spawn Ampel Task (einziger Task: kooperativer Polling-Loop)
    if spawner
        .spawn(ampel_task(
            peripherals.GPIO8,
            peripherals.RMT,
            peripherals.UART1,
            peripherals.GPIO4,
            peripherals.GPIO5,
        ))
        .is_err()
    {
        error!("Ampel: Failed to spawn task");
    }

    // Main-Loop: schläft (alle Arbeit läuft im Task)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
