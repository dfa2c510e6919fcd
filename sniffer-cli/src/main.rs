use sniffer_capture::{list_interfaces, CaptureWriter, PcapSource};
use sniffer_cli::{fatal_message, Cli, Sniffer, StopReason};
use sniffer_core::{Error, Result};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.log_level());

    if cli.list_interfaces {
        print_interfaces();
        return ExitCode::SUCCESS;
    }

    let stop = Arc::new(AtomicBool::new(false));
    watch_ctrl_c(Arc::clone(&stop));

    match run(&cli, stop) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, stop: Arc<AtomicBool>) -> Result<()> {
    let source = PcapSource::open(cli.interface.as_deref(), &cli.capture_config())?
        .with_stop_flag(Arc::clone(&stop));
    info!("Capturing on {}", source.interface().name);

    let writer = CaptureWriter::create(cli.out.as_ref())?;

    let sniffer = Sniffer::new(cli.sniffer_config()).with_stop_flag(stop);
    let stdout = std::io::stdout();
    let report = sniffer.run(source, writer, &mut stdout.lock())?;

    if report.reason == StopReason::Limit {
        info!("Frame limit reached");
    }
    info!("{}", report.stats.format());
    Ok(())
}

fn init_tracing(level: Level) {
    let builder = tracing_subscriber::fmt().with_writer(std::io::stderr);

    if std::env::var_os("RUST_LOG").is_some() {
        builder.with_env_filter(EnvFilter::from_default_env()).init();
    } else {
        builder.with_max_level(level).init();
    }
}

/// Raise `stop` on Ctrl+C; the capture loop notices within one read timeout
fn watch_ctrl_c(stop: Arc<AtomicBool>) {
    let spawned = thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    warn!("Failed to start signal runtime: {}", e);
                    return;
                }
            };

            match runtime.block_on(tokio::signal::ctrl_c()) {
                Ok(()) => {
                    info!("Interrupt received, stopping");
                    stop.store(true, Ordering::Relaxed);
                }
                Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
            }
        });

    if let Err(e) = spawned {
        warn!("Failed to spawn Ctrl+C watcher: {}", e);
    }
}

fn report_error(err: &Error) {
    eprintln!("{}", fatal_message(err));
}

fn print_interfaces() {
    println!("Available interfaces:");
    for iface in list_interfaces() {
        let ips: Vec<String> = iface.ips.iter().map(ToString::to_string).collect();
        println!(
            "  {:<16} {:<18} {}{}",
            iface.name,
            iface.mac.as_deref().unwrap_or("-"),
            if iface.is_up { "up" } else { "down" },
            if ips.is_empty() {
                String::new()
            } else {
                format!("  {}", ips.join(", "))
            }
        );
    }
}
