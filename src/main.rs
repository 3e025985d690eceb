use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use ccm::commands::{CommandOrigin, CommandRegistry, CommandStatus, PermissionLevel};
use ccm::config::{self, Config};
use ccm::host::memory::MemoryHost;
use ccm::host::{Entity, Scheduler};
use ccm::{demo, register_commands};
use clap::Parser;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use reedline::{DefaultPrompt, Reedline, Signal};
use tracing_subscriber::EnvFilter;

/// Console host for trying out custom commands.
#[derive(Debug, Parser)]
#[command(name = "ccm", version)]
struct Args {
    /// Config file (defaults to ~/.config/ccm.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Namespace for registered commands
    #[arg(long)]
    prefix: Option<String>,

    /// Permission level of the console player
    #[arg(long, value_parser = parse_permission)]
    permission: Option<PermissionLevel>,
}

fn parse_permission(value: &str) -> Result<PermissionLevel, String> {
    value.parse().map_err(|e: ccm::CommandError| e.to_string())
}

fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut cfg = match load(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            print_colored_message(&format!("Error: {}\n", e), Color::Red);
            std::process::exit(1);
        }
    };
    if let Some(permission) = args.permission {
        cfg.permission = permission;
    }

    init_logging(&cfg);

    let mut registry = CommandRegistry::with_prefix(cfg.prefix.clone());
    demo::register(&mut registry);

    let registry = Rc::new(registry);

    let host = Rc::new(MemoryHost::new());
    let scheduler: Rc<dyn Scheduler> = host.clone();
    if let Err(e) = register_commands(Rc::clone(&registry), &mut host.registry(), scheduler) {
        print_colored_message(&format!("Startup failed: {}\n", e), Color::Red);
        std::process::exit(1);
    }

    let player = host.spawn_player("Console");
    let entity: Rc<dyn Entity> = player.clone();
    let origin = CommandOrigin::entity(entity);

    let usage: Vec<String> = registry.commands().iter().map(|c| c.usage()).collect();
    print_colored_message(
        &format!(
            "Commands:\n  {}\nType /help, or /quit to exit.\n",
            usage.join("\n  ")
        ),
        Color::DarkMagenta,
    );

    let mut rl = Reedline::create();
    let prompt = DefaultPrompt::default();
    let mut launches = 0;

    loop {
        let line = match rl.read_line(&prompt) {
            Ok(Signal::Success(input)) => input.trim().to_string(),
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) | Err(_) => break,
        };

        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }

        let result = host.execute(&line, &origin, cfg.permission);
        if result.status == CommandStatus::Failure {
            let message = result.message.unwrap_or_else(|| "Command failed.".to_string());
            print_colored_message(&format!("{}\n", message), Color::Red);
            continue;
        }

        for err in host.tick() {
            print_colored_message(&format!("Error: {err:#}\n"), Color::Red);
        }
        for message in player.take_messages() {
            print_formatted(&message);
        }
        let knockbacks = player.knockbacks();
        for (_, vertical) in &knockbacks[launches..] {
            print_colored_message(
                &format!("Whoosh! Launched with strength {vertical}\n"),
                Color::Cyan,
            );
        }
        launches = knockbacks.len();
    }
}

fn load(args: &Args) -> Result<Config, config::ConfigError> {
    let mut cfg = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    if let Some(prefix) = &args.prefix {
        cfg.set_prefix(prefix)?;
    }
    Ok(cfg)
}

fn init_logging(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(cfg.log_filter.as_deref().unwrap_or("info"))
    });

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();

    if let Err(e) = result {
        eprintln!("Log system initialization failed: {e}");
    }
}

/// Print a message carrying `§` formatting codes.
fn print_formatted(message: &str) {
    let mut color = Color::Reset;
    let mut chars = message.chars();
    let mut segment = String::new();

    while let Some(c) = chars.next() {
        if c != '§' {
            segment.push(c);
            continue;
        }
        if !segment.is_empty() {
            print_colored_message(&segment, color);
            segment.clear();
        }
        color = chars.next().map(format_code_color).unwrap_or(Color::Reset);
    }
    segment.push('\n');
    print_colored_message(&segment, color);
}

fn format_code_color(code: char) -> Color {
    match code {
        '0' => Color::Black,
        '1' => Color::DarkBlue,
        '2' => Color::DarkGreen,
        '3' => Color::DarkCyan,
        '4' => Color::DarkRed,
        '5' => Color::DarkMagenta,
        '6' => Color::DarkYellow,
        '7' => Color::Grey,
        '8' => Color::DarkGrey,
        '9' => Color::Blue,
        'a' => Color::Green,
        'b' => Color::Cyan,
        'c' => Color::Red,
        'd' => Color::Magenta,
        'e' => Color::Yellow,
        'f' => Color::White,
        _ => Color::Reset,
    }
}

fn print_colored_message(message: &str, color: Color) {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(color),
        Print(message),
        ResetColor
    )
    .ok();
}
