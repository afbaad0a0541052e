use std::time::Duration;

use ampel_host::{DetectionLink, TestMode, TestPlan, ports, session};
use anyhow::Context;
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Verbindungstest für die serielle Detektions-Ampel")]
struct Args {
    /// Serieller Port der Ampel (ohne Angabe: automatische Erkennung)
    #[arg(long)]
    port: Option<String>,
    /// Nur verfügbare Ports auflisten
    #[arg(long, default_value_t = false)]
    scan: bool,
    #[arg(long, value_enum, default_value_t = TestMode::Basic)]
    mode: TestMode,
    /// Anzahl Farbzyklen im Basis-Test
    #[arg(long, default_value_t = 3)]
    cycles: u32,
    /// Wartezeit zwischen Farben in Sekunden
    #[arg(long, default_value_t = 1.0)]
    delay: f64,
    #[arg(long, default_value_t = 9600)]
    baud: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.scan {
        let candidates = ports::available_candidates()?;
        if candidates.is_empty() {
            println!("Keine seriellen Ports gefunden.");
        } else {
            println!("Gefundene serielle Ports:");
            for name in &candidates {
                println!("  - {}", name);
            }
            println!("\nTest starten mit: ampel-link --port <PORT>");
        }
        return Ok(());
    }

    let port = match args.port {
        Some(port) => port,
        None => {
            let port = ports::detect_port().context("no --port given and auto-detection failed")?;
            info!("Port automatisch gewählt: {}", port);
            port
        }
    };

    let delay = Duration::try_from_secs_f64(args.delay)
        .with_context(|| format!("invalid --delay {}", args.delay))?;
    let plan = TestPlan {
        mode: args.mode,
        cycles: args.cycles,
        delay,
    };

    let handle = ports::open(&port, args.baud).with_context(|| format!("failed to open {}", port))?;
    let mut link = DetectionLink::new(handle);
    session::run(&mut link, &plan, std::thread::sleep)
        .with_context(|| format!("connection test on {} failed", port))?;

    info!("Verbindungstest erfolgreich");
    Ok(())
}
