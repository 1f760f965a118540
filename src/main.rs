use chatroom::core::config::{self, CliOverrides};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "chatroom", about = "Terminal chat room")]
struct Args {
    /// Post as this user id
    #[arg(long)]
    uid: Option<String>,

    /// Avatar reference attached to your messages
    #[arg(long)]
    photo_url: Option<String>,

    /// Profile endpoint of the identity service
    #[arg(long)]
    identity_endpoint: Option<String>,

    /// Log level written to chatroom.log (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<LevelFilter>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to chatroom.log in current directory.
    // The level is narrowed once the config is resolved.
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("chatroom.log") {
        let _ = WriteLogger::init(LevelFilter::Trace, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        config::ChatConfig::default()
    });
    let cli = CliOverrides {
        uid: args.uid,
        photo_url: args.photo_url,
        identity_endpoint: args.identity_endpoint,
        log_level: args.log_level,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::set_max_level(resolved.log_level);

    log::info!(
        "Chat room starting up as {} (app: {})",
        resolved.uid,
        resolved.app_name
    );

    chatroom::tui::run(resolved)
}
