mod commands;
mod render;

use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand};
use codenames::codenames_core::{
    parse_custom_words, CoreAction, GameId, NewGameOptions, RefreshRequest, Role, TimerSetting,
};
use codenames::{
    AppSnapshot, EngineHooks, FileSettingsStore, GameSession, GameTransport, HttpTransport,
    MemorySettingsStore, SessionOptions, SettingsStore,
};
use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::{parse_command, Command, HELP};
use crate::render::{legend, render, TurnIndicator};

const GAME_ID_ALPHABET: &str = "abcdefghijkmnpqrstuvwxyz23456789";
const GENERATED_GAME_ID_LEN: usize = 8;

#[derive(Parser)]
#[command(name = "codenames-cli", version, about = "Play codenames against a game server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ServerArgs {
    #[arg(long, env = "CODENAMES_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,
    /// File holding the persisted viewer settings.
    #[arg(long, env = "CODENAMES_SETTINGS")]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow a game and act on it from stdin.
    Play {
        #[command(flatten)]
        server: ServerArgs,
        #[arg(long)]
        game_id: String,
        #[arg(long)]
        spymaster: bool,
    },
    /// Print the current board once.
    Show {
        #[command(flatten)]
        server: ServerArgs,
        #[arg(long)]
        game_id: String,
        #[arg(long)]
        spymaster: bool,
    },
    /// Join a game, creating it if needed.
    Join {
        #[command(flatten)]
        server: ServerArgs,
        /// Random when omitted.
        #[arg(long)]
        game_id: Option<String>,
        /// Comma separated words; repeat for several sets.
        #[arg(long = "words")]
        words: Vec<String>,
        /// Word list file, comma or newline separated; repeatable.
        #[arg(long = "words-file")]
        words_files: Vec<PathBuf>,
        #[arg(long, default_value_t = 2)]
        teams: u32,
        #[arg(long)]
        timer_minutes: Option<u32>,
        #[arg(long)]
        timer_seconds: Option<u32>,
        #[arg(long)]
        enforce_timer: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, run(cli))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("codenames=info,codenames_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Play {
            server,
            game_id,
            spymaster,
        } => play(server, GameId::parse(&game_id)?, spymaster).await,
        Commands::Show {
            server,
            game_id,
            spymaster,
        } => {
            let game_id = GameId::parse(&game_id)?;
            let transport = HttpTransport::new(&server.base_url)?;
            let snapshot = transport
                .refresh(RefreshRequest::new(game_id.as_str(), None))
                .await?;
            let app = AppSnapshot {
                game: Some(Rc::new(snapshot)),
                codemaster: spymaster,
                settings: settings_store(&server).load(),
                mounted: true,
                ..AppSnapshot::default()
            };
            print!("{}", render(&app));
            Ok(())
        }
        Commands::Join {
            server,
            game_id,
            words,
            words_files,
            teams,
            timer_minutes,
            timer_seconds,
            enforce_timer,
        } => {
            let mut word_sets: Vec<Vec<String>> =
                words.iter().map(|raw| parse_custom_words(raw)).collect();
            for path in words_files {
                let raw = std::fs::read_to_string(&path)?;
                word_sets.push(parse_custom_words(&raw.replace('\n', ",")));
            }
            let timer = match (timer_minutes, timer_seconds) {
                (None, None) => None,
                (minutes, seconds) => Some(TimerSetting {
                    minutes: minutes.unwrap_or(0),
                    seconds: seconds.unwrap_or(0),
                }),
            };
            let options = NewGameOptions {
                game_id: game_id.unwrap_or_else(generate_game_id),
                word_sets,
                number_of_teams: teams,
                timer,
                enforce_timer,
            };
            let game_id = GameId::parse(&options.game_id)?;
            let request = options.into_request()?;
            let transport = HttpTransport::new(&server.base_url)?;
            let snapshot = transport.next_game(request).await?;
            info!(game_id = %game_id, words = snapshot.words.len(), "joined");
            let app = AppSnapshot {
                game: Some(Rc::new(snapshot)),
                settings: settings_store(&server).load(),
                mounted: true,
                ..AppSnapshot::default()
            };
            print!("{}", render(&app));
            println!("play with: codenames-cli play --game-id {game_id}");
            Ok(())
        }
    }
}

async fn play(server: ServerArgs, game_id: GameId, spymaster: bool) -> Result<(), Box<dyn Error>> {
    let transport: Rc<dyn GameTransport> = Rc::new(HttpTransport::new(&server.base_url)?);
    let indicator = Rc::new(TurnIndicator::new());
    let snapshot_indicator = indicator.clone();
    let event_indicator = indicator.clone();
    let hooks = EngineHooks::empty()
        .with_snapshot(move |app| {
            snapshot_indicator.on_snapshot(app);
            if app.mounted {
                print!("{}", render(app));
            }
        })
        .with_event(move |event| event_indicator.on_event(event));
    let session = GameSession::new(
        game_id.clone(),
        transport,
        SessionOptions {
            settings_store: settings_store(&server),
            hooks,
            ..SessionOptions::default()
        },
    );
    session.mount();
    if spymaster {
        session.handle_action(CoreAction::SetRole(Role::Codemaster));
    }
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Help) => println!("{HELP}"),
            Some(Command::Show) => {
                let app = session.core().snapshot();
                if let Some(game) = app.game.as_deref() {
                    println!(
                        "{}",
                        legend(game.effective_number_of_teams(), app.settings.color_blind)
                    );
                }
                print!("{}", render(&app));
            }
            Some(Command::Action(action)) => session.handle_action(action),
            None if line.trim().is_empty() => {}
            None => eprintln!("unknown command, try `help`"),
        }
    }
    session.teardown();
    info!(game_id = %game_id, "left game");
    Ok(())
}

fn settings_store(server: &ServerArgs) -> Rc<dyn SettingsStore> {
    match server.settings.as_ref() {
        Some(path) => Rc::new(FileSettingsStore::new(path.clone())),
        None => Rc::new(MemorySettingsStore::new()),
    }
}

fn generate_game_id() -> String {
    let mut rng = rand::rng();
    let alphabet = GAME_ID_ALPHABET.as_bytes();
    let mut id = String::with_capacity(GENERATED_GAME_ID_LEN);
    for _ in 0..GENERATED_GAME_ID_LEN {
        let idx = rng.random_range(0..alphabet.len());
        id.push(alphabet[idx] as char);
    }
    id
}
