//! RESORT-TI CLI
//!
//! Usage:
//!   resort-ti --text "最近仕事がつらい"                    # Single message
//!   resort-ti --interactive                                # Chat loop
//!   resort-ti --serve                                      # HTTP API server
//!   resort-ti --text "..." --json                          # JSON output
//!   resort-ti --interactive --backend-url http://host:8000 # Remote replies

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::error;
use tracing_subscriber::EnvFilter;

use resort_ti::config::EngineConfig;
use resort_ti::core::{run_server, AnalysisEngine, AppState, ChatBackend, ChatSession};
use resort_ti::error::EngineError;
use resort_ti::types::{ChatReply, FortuneResult, TimingStatus};
use resort_ti::{REMOTE_TIMEOUT_SECS, VERSION};

/// Shown when a turn fails for a reason the user cannot fix
const APOLOGY: &str = "申し訳ありません。少し調子が悪いようです。もう一度お話しいただけますか？";

#[derive(Parser, Debug)]
#[command(
    name = "resort-ti",
    version = VERSION,
    about = "RESORT-TI - Need, sentiment and timing analysis for fortune chat",
    long_about = "RESORT-TI scores every message of a fortune-telling chat.\n\n\
                  It detects five conversational needs, estimates sentiment,\n\
                  tracks how much personal context has been shared, and folds\n\
                  it all into the seven-factor RESORT-TI index. A timing gate\n\
                  decides when fortune menus may be proposed.\n\n\
                  Modes:\n  \
                  --text         Single message\n  \
                  --interactive  Chat loop (commands: menus, fortune <id>, scores, quit)\n  \
                  --serve        HTTP API server mode\n\n\
                  Timing status:\n  \
                  NOT_READY   - Keep listening\n  \
                  APPROACHING - Almost time to propose\n  \
                  READY       - Menus are suggested"
)]
struct Args {
    /// Message to analyse (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Interactive chat mode - read lines from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show score breakdown
    #[arg(long)]
    verbose: bool,

    /// Chat backend base URL (offline when omitted)
    #[arg(long)]
    backend_url: Option<String>,

    /// Backend timeout in seconds
    #[arg(long, default_value_t = REMOTE_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Lexicon TOML file (built-in tables when omitted)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Event log file; a directory of per-session files with --serve
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            backend_url: self.backend_url.clone(),
            timeout_secs: self.timeout_secs,
            lexicon_path: self.lexicon.clone(),
            log_path: self.log_file.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.engine_config();
    let engine = match config.build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "lexicon could not be loaded");
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let backend = match config.build_backend() {
        Ok(backend) => backend,
        Err(e) => {
            error!(error = %e, "backend client could not be built");
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.serve {
        run_serve(&args, engine, backend).await
    } else if let Some(ref text) = args.text {
        run_single(text, &args, engine, backend).await
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args, engine, backend).await
    }
}

/// Logs go to stderr so stdout stays parseable
fn init_tracing(verbose: bool) {
    let default = if verbose { "resort_ti=debug" } else { "resort_ti=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn new_session(
    args: &Args,
    engine: Arc<AnalysisEngine>,
    backend: Arc<dyn ChatBackend>,
) -> ChatSession {
    let session = ChatSession::new(engine, backend);
    match &args.log_file {
        Some(path) => session.with_log_path(path.clone()),
        None => session,
    }
}

/// Run single message evaluation
async fn run_single(
    text: &str,
    args: &Args,
    engine: Arc<AnalysisEngine>,
    backend: Arc<dyn ChatBackend>,
) -> ExitCode {
    let mut session = new_session(args, engine, backend);
    match session.handle_message(text).await {
        Ok(reply) => {
            print_reply(&reply, args);
            ExitCode::SUCCESS
        }
        Err(EngineError::EmptyUtterance) => {
            eprintln!("error: empty message");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "turn failed");
            println!("{}", APOLOGY);
            ExitCode::FAILURE
        }
    }
}

/// Run interactive chat mode
async fn run_interactive(
    args: &Args,
    engine: Arc<AnalysisEngine>,
    backend: Arc<dyn ChatBackend>,
) -> ExitCode {
    let mut session = new_session(args, engine, backend);

    print_header("Chat Mode", args.no_color);
    println!("Type a message and press Enter. Commands: menus, fortune <id>, scores, quit");
    println!("Goal: reach READY (timing >= 70) and receive menu suggestions");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", format_prompt(&session, args.no_color));
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Turns: {}", session.state().turn_count);
            break;
        }
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("menus") {
            for menu in session.ranked_menus() {
                println!("  {:>3}  {:<20} {}", menu.match_score, menu.id, menu.title);
            }
            continue;
        }
        if line.eq_ignore_ascii_case("scores") {
            print!("{}", session.analysis().to_breakdown_string());
            continue;
        }
        if let Some(menu) = line.strip_prefix("fortune ") {
            match session.fortune(menu).await {
                Ok(result) => print_fortune(&result, args),
                Err(EngineError::UnknownMenu(id)) => println!("  unknown menu: {}", id),
                Err(e) => {
                    error!(error = %e, "fortune failed");
                    println!("{}", APOLOGY);
                }
            }
            continue;
        }

        match session.handle_message(line).await {
            Ok(reply) => print_reply(&reply, args),
            Err(e) => {
                error!(error = %e, "turn failed");
                println!("{}", APOLOGY);
            }
        }
    }

    ExitCode::SUCCESS
}

/// Run API server mode
async fn run_serve(
    args: &Args,
    engine: Arc<AnalysisEngine>,
    backend: Arc<dyn ChatBackend>,
) -> ExitCode {
    let mut state = AppState::new(engine, backend);
    if let Some(dir) = &args.log_file {
        state = state.with_log_dir(dir.clone());
    }

    match run_server(&args.addr, state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server error");
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  RESORT-TI v{} - {}", VERSION, mode);
        println!("========================================");
    } else {
        println!("\x1b[1m╔════════════════════════════════════════╗\x1b[0m");
        println!("\x1b[1m║  RESORT-TI v{} - {:<20}  ║\x1b[0m", VERSION, mode);
        println!("\x1b[1m╚════════════════════════════════════════╝\x1b[0m");
    }
    println!();
}

/// Format prompt with the current timing status
fn format_prompt(session: &ChatSession, no_color: bool) -> String {
    let state = session.state();
    let status = TimingStatus::from_score(state.timing_score);
    if no_color {
        format!("[{} {}] > ", status, state.timing_score)
    } else {
        format!(
            "{}{} [{} {}]{} > ",
            status.color_code(),
            status.emoji(),
            status,
            state.timing_score,
            TimingStatus::color_reset()
        )
    }
}

fn print_reply(reply: &ChatReply, args: &Args) {
    if args.json {
        match serde_json::to_string_pretty(reply) {
            Ok(json) => println!("{}", json),
            Err(e) => error!(error = %e, "reply not serialisable"),
        }
        return;
    }

    println!("🔮 {}", reply.reply);
    if args.no_color {
        println!("{}", reply.analysis.to_parseable_string());
    } else {
        println!("{}", reply.analysis.to_terminal_string());
    }
    if reply.source.is_fallback() || args.verbose {
        let dim = if args.no_color { "" } else { "\x1b[90m" };
        let reset = if args.no_color { "" } else { TimingStatus::color_reset() };
        println!("{}  └─ {}{}", dim, reply.source, reset);
    }
    if args.verbose {
        print!("{}", reply.analysis.to_breakdown_string());
    }
    if !reply.analysis.suggestions.is_empty() {
        println!("  おすすめの占い:");
        for menu in &reply.analysis.suggestions {
            println!("   - {} ({}%) [{}]", menu.title, menu.match_score, menu.id);
        }
    }
}

fn print_fortune(result: &FortuneResult, args: &Args) {
    if args.json {
        match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{}", json),
            Err(e) => error!(error = %e, "fortune not serialisable"),
        }
        return;
    }

    println!("── {} ──", result.title);
    println!("{}", result.content);
    for point in &result.key_points {
        println!("  • {}", point);
    }
    if !result.advice.is_empty() {
        println!("  ✦ {}", result.advice);
    }
}
