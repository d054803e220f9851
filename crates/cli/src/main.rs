use clap::{Parser, Subcommand};
use lib::panel::{GatewayClient, Panel, Speaker, TranscriptEntry};

#[derive(Parser)]
#[command(name = "alden")]
#[command(about = "Alden home-care staffing demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the notification gateway (HTTP bridge to the SMS provider).
    /// Provider credentials come from TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN,
    /// TWILIO_FROM_NUMBER, and DEMO_PHONE_NUMBER.
    Gateway {
        /// HTTP port (default: PORT env or 3001)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Print the clock-in roster.
    Roster,

    /// Text a caregiver a clock-in reminder via a running gateway and wait
    /// for the reply on the demo phone. Ctrl+C closes the panel.
    Text {
        /// Caregiver id from the roster (e.g. "liam")
        caregiver_id: String,

        /// Gateway base URL (default derived from PORT/ALDEN_BIND)
        #[arg(long, value_name = "URL")]
        gateway_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("alden {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Gateway { port }) => {
            if let Err(e) = run_gateway(port).await {
                log::error!("gateway failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Roster) => {
            print_roster();
        }
        Some(Commands::Text {
            caregiver_id,
            gateway_url,
        }) => {
            if let Err(e) = run_text(caregiver_id, gateway_url).await {
                log::error!("text failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_gateway(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = lib::config::load_config();
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting gateway on {}:{}",
        config.gateway.bind,
        config.gateway.port
    );
    lib::gateway::run_gateway(config).await
}

fn print_roster() {
    println!(
        "{:<16} {:<9} {:<16} {:<12} {:<13} {:<8} {}",
        "Caregiver", "Shift", "Status", "Coordinator", "Texted?", "Called?", "Review?"
    );
    for cg in lib::fixtures::roster() {
        println!(
            "{:<16} {:<9} {:<16} {:<12} {:<13} {:<8} {}",
            cg.name, cg.shift_time, cg.status, cg.coordinator, cg.texted, cg.called, cg.needs_review
        );
    }
}

fn print_entry(entry: &TranscriptEntry, caregiver_first_name: &str) {
    let who = match entry.speaker {
        Speaker::Us => "Alden",
        Speaker::Them => caregiver_first_name,
    };
    println!("[{}] {}:", entry.ts.format("%H:%M"), who);
    for line in entry.text.lines() {
        println!("    {}", line);
    }
}

async fn run_text(caregiver_id: String, gateway_url: Option<String>) -> anyhow::Result<()> {
    let cg = lib::fixtures::caregiver(&caregiver_id).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown caregiver id: {} (textable: {})",
            caregiver_id,
            lib::fixtures::textable_ids().join(", ")
        )
    })?;
    let config = lib::config::load_config();
    let base_url = gateway_url
        .unwrap_or_else(|| format!("http://{}:{}", config.gateway.bind, config.gateway.port));
    let first_name = lib::reminder::first_name(cg.name);

    let client = GatewayClient::new(base_url);
    let panel = Panel::open(client, caregiver_id, cg.name, cg.shift_time);

    println!("texting {} ({}) about the {} shift...", cg.name, cg.phone, cg.shift_time);
    let reply_rx = panel
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("failed to send: {}", e))?;
    for entry in panel.transcript() {
        print_entry(&entry, first_name);
    }
    println!("SMS delivered, waiting for a reply on the demo phone (Ctrl+C closes the panel)...");

    tokio::select! {
        reply = reply_rx => match reply {
            Ok(reply) => {
                print_entry(
                    &TranscriptEntry {
                        speaker: Speaker::Them,
                        text: reply.text,
                        ts: reply.ts,
                    },
                    first_name,
                );
                println!("reply received and logged");
            }
            Err(_) => {
                println!("panel closed before a reply arrived");
            }
        },
        _ = tokio::signal::ctrl_c() => {
            panel.close();
            println!("panel closed, reply polling stopped");
        }
    }

    Ok(())
}
