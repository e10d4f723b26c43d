use anyhow::Result;
use clap::{Parser, Subcommand};

use taskdeck::api::TaskStatus;
use taskdeck::auth::{self, REDIRECT_DELAY};
use taskdeck::board::Board;
use taskdeck::config::ClientConfig;
use taskdeck::dashboard::{DashboardScreen, CONFIRM_DELETE, CREATED_NOTICE, DELETED_NOTICE};
use taskdeck::guard::{self, Resolution, Screen};
use taskdeck::AppContext;

#[derive(Parser)]
#[command(
    name = "taskdeck",
    about = "Taskdeck — terminal client for the Taskdeck task API",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the task API server
    #[arg(long, env = "TASKDECK_API_URL")]
    api_url: Option<String>,

    /// Data directory for the stored session and config
    #[arg(long, env = "TASKDECK_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKDECK_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "TASKDECK_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,

    /// Suppress notices and the board print-out.
    ///
    /// Errors are still printed to stderr. Use this flag when scripting.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session.
    ///
    /// On success the server's notice is shown and, after a short pause,
    /// the dashboard is rendered.
    ///
    /// Examples:
    ///   taskdeck login --email a@b.com --password secret
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and store the session.
    ///
    /// Examples:
    ///   taskdeck signup --name "Ada Lovelace" --email ada@example.com --password secret
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the stored session.
    Logout,
    /// Show the cached profile of the signed-in user.
    Whoami,
    /// Show the task board: To-Do, In-Progress, Done.
    ///
    /// Examples:
    ///   taskdeck board
    Board,
    /// Add a task to a column (default: pending).
    ///
    /// Examples:
    ///   taskdeck add "Buy milk"
    ///   taskdeck add "Write report" --status in-progress
    Add {
        title: String,
        /// Target column: pending, in-progress, or completed
        #[arg(long, default_value = "pending")]
        status: TaskStatus,
    },
    /// Move a task to another column.
    ///
    /// The id may be abbreviated to any unique prefix shown on the board.
    ///
    /// Examples:
    ///   taskdeck move 64b1f2aa in-progress
    Move {
        id: String,
        status: TaskStatus,
    },
    /// Delete a task.
    ///
    /// Examples:
    ///   taskdeck rm 64b1f2aa
    ///   taskdeck rm 64b1f2aa -y
    Rm {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// The screen each subcommand navigates to. The guard resolves it before
/// the command runs.
fn screen_for(command: &Command) -> Screen {
    match command {
        Command::Login { .. } => Screen::Login,
        Command::Signup { .. } => Screen::Signup,
        Command::Logout | Command::Whoami => Screen::Profile,
        Command::Board | Command::Add { .. } | Command::Move { .. } | Command::Rm { .. } => {
            Screen::Dashboard
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ClientConfig::new(args.api_url, args.data_dir, args.log);

    // Init once — must happen before any tracing calls.
    let _file_guard = setup_logging(&config.log, args.log_file.as_deref(), &config.log_format);

    // Config loads before the subscriber exists, so its parse failure is
    // reported here rather than inside the loader.
    if let Some(err) = &config.load_error {
        tracing::error!("{err} — using defaults");
    }

    let quiet = args.quiet;
    let ctx = AppContext::new(config)?;

    match guard::resolve(screen_for(&args.command), &ctx.session) {
        Resolution::Render(_) => {}
        Resolution::RedirectToLogin => {
            eprintln!("You are not signed in. Run `taskdeck login` first.");
            std::process::exit(1);
        }
    }

    match args.command {
        Command::Login { email, password } => {
            match auth::login(&ctx.session, &ctx.api, &email, &password).await {
                Ok(notice) => {
                    if !quiet && !notice.is_empty() {
                        println!("{notice}");
                    }
                    let tasks =
                        auth::navigate_to_dashboard(&ctx.session, &ctx.api, REDIRECT_DELAY).await;
                    if !quiet {
                        print!("{}", Board::partition(tasks).render());
                    }
                }
                Err(e) => fail(&e.to_string()),
            }
        }

        Command::Signup {
            name,
            email,
            password,
        } => match auth::signup(&ctx.session, &ctx.api, &name, &email, &password).await {
            Ok(notice) => {
                if !quiet && !notice.is_empty() {
                    println!("{notice}");
                }
                let tasks =
                    auth::navigate_to_dashboard(&ctx.session, &ctx.api, REDIRECT_DELAY).await;
                if !quiet {
                    print!("{}", Board::partition(tasks).render());
                }
            }
            Err(e) => fail(&e.to_string()),
        },

        Command::Logout => {
            auth::logout(&ctx.session)?;
            if !quiet {
                println!("Signed out. Run `taskdeck login` to sign back in.");
            }
        }

        Command::Whoami => {
            let user = auth::profile(&ctx.session);
            println!("{} <{}> [{}]", user.name, user.email, user.initials());
        }

        Command::Board => show_board(&ctx, quiet).await,

        Command::Add { title, status } => {
            let screen = DashboardScreen::new(&ctx.session, &ctx.api);
            match screen.create(&title, status).await {
                Ok(tasks) => {
                    if !quiet {
                        println!("{CREATED_NOTICE}");
                        print!("{}", Board::partition(tasks).render());
                    }
                }
                Err(e) => fail(&e.to_string()),
            }
        }

        Command::Move { id, status } => {
            let screen = DashboardScreen::new(&ctx.session, &ctx.api);
            match screen.move_task(&id, status).await {
                Ok(tasks) => {
                    if !quiet {
                        print!("{}", Board::partition(tasks).render());
                    }
                }
                Err(e) => fail(&e.to_string()),
            }
        }

        Command::Rm { id, yes } => {
            if !yes && !confirm(CONFIRM_DELETE)? {
                return Ok(());
            }
            let screen = DashboardScreen::new(&ctx.session, &ctx.api);
            match screen.delete(&id).await {
                Ok(tasks) => {
                    if !quiet {
                        println!("{DELETED_NOTICE}");
                        print!("{}", Board::partition(tasks).render());
                    }
                }
                Err(e) => fail(&e.to_string()),
            }
        }
    }

    Ok(())
}

/// Fetch and render the three-column board.
async fn show_board(ctx: &AppContext, quiet: bool) {
    let screen = DashboardScreen::new(&ctx.session, &ctx.api);
    let tasks = screen.fetch_tasks().await;
    if !quiet {
        print!("{}", Board::partition(tasks).render());
    }
}

/// Print a user-facing error and exit nonzero.
fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

/// y/N prompt on stdin. Anything but y/yes cancels.
fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write as _;
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("taskdeck.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stderr",
                dir.display()
            );
            init_stderr_only(log_level, use_json);
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else {
        init_stderr_only(log_level, use_json);
        None
    }
}

/// Logs go to stderr so the board and notices own stdout.
fn init_stderr_only(log_level: &str, use_json: bool) {
    if use_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(log_level)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
