use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::Topic;
use services::{Clock, LoadError, QuizLoopService};
use storage::repository::Storage;
use ui::{App, UiApp, build_app_context};

const DEFAULT_QUESTIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/questions");

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTopic { raw: String },
    InvalidQuestions { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTopic { raw } => {
                write!(f, "invalid --topic value: {raw} (expected html, css or js)")
            }
            ArgsError::InvalidQuestions { raw } => write!(f, "invalid --questions value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    quiz_loop: Arc<QuizLoopService>,
    initial_topic: Option<Topic>,
}

impl UiApp for DesktopApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn initial_topic(&self) -> Option<Topic> {
        self.initial_topic
    }
}

/// Where question pools are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum QuestionLocation {
    Dir(String),
    Url(String),
}

impl QuestionLocation {
    fn parse(raw: String) -> Result<Self, ArgsError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ArgsError::InvalidQuestions { raw });
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(Self::Url(trimmed.to_string()))
        } else {
            Ok(Self::Dir(trimmed.to_string()))
        }
    }

    fn open(&self) -> Result<Storage, Box<dyn std::error::Error>> {
        match self {
            Self::Dir(dir) => Ok(Storage::json_dir(dir)),
            Self::Url(url) => Ok(Storage::http(url)?),
        }
    }
}

impl fmt::Display for QuestionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dir(dir) => write!(f, "{dir}"),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

struct Args {
    questions: QuestionLocation,
    topic: Option<Topic>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--questions <dir|url>] [--topic <html|css|js>]");
    eprintln!("  cargo run -p app -- check [--questions <dir|url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions {DEFAULT_QUESTIONS_DIR}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_QUESTIONS, QUIZ_TOPIC, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

fn parse_topic(raw: String) -> Result<Topic, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidTopic { raw })
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut questions = match std::env::var("QUIZ_QUESTIONS") {
            Ok(value) => QuestionLocation::parse(value)?,
            Err(_) => QuestionLocation::Dir(DEFAULT_QUESTIONS_DIR.to_string()),
        };
        let mut topic = match std::env::var("QUIZ_TOPIC") {
            Ok(value) if !value.trim().is_empty() => Some(parse_topic(value)?),
            _ => None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    questions = QuestionLocation::parse(require_value(args, "--questions")?)?;
                }
                "--topic" if cmd == Command::Ui => {
                    topic = Some(parse_topic(require_value(args, "--topic")?)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { questions, topic })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Launch the UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = parsed.questions.open()?;
    log::info!("reading questions from {}", storage.questions.describe());
    let quiz_loop = Arc::new(QuizLoopService::new(Clock::system(), storage.questions));

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                quiz_loop,
                initial_topic: parsed.topic,
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Web Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Check => check(&quiz_loop, &parsed.questions).await,
    }
}

/// Load and validate every topic, printing one line per pool.
async fn check(
    quiz_loop: &QuizLoopService,
    location: &QuestionLocation,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut failures: Vec<(Topic, LoadError)> = Vec::new();

    println!("question banks in {location}:");
    for topic in Topic::ALL {
        match quiz_loop.load_pool(topic).await {
            Ok(pool) => println!("  {:<10} {:>3} questions", topic.label(), pool.len()),
            Err(err) => {
                println!("  {:<10} error: {err}", topic.label());
                failures.push((topic, err));
            }
        }
    }

    match failures.len() {
        0 => Ok(()),
        n => Err(format!("{n} of {} question banks failed to load", Topic::ALL.len()).into()),
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        log::error!("{err}");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
