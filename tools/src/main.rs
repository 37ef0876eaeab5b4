//! byteclicker: headless host for Byte Clicker.
//!
//! Usage:
//!   byteclicker --seconds 600 --save clicker_save.json
//!   byteclicker --ipc-mode --save clicker_save.json --config game.json
//!
//! Autoplay simulates a player on a virtual clock and never writes the
//! save file. IPC mode reads one JSON command per stdin line and answers
//! with one JSON state line.

use anyhow::Result;
use byteclicker_core::{
    clock::{Clock, ManualClock, SystemClock},
    config::GameConfig,
    engine::GameEngine,
    event::GameEvent,
    store::{FileSaveStore, MemorySaveStore, SaveStore, EMPTY_SAVE},
    types::{GeneratorId, Millis},
    view::{format_number, format_play_time, Dashboard},
};
use std::env;
use std::io::{self, BufRead, Write};

const ABOUT: &str = "A fun incremental game about collecting bytes!\n\n\
    Click to generate bytes and buy generators to automate your byte production.";

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Click,
    Buy {
        generator_id: GeneratorId,
    },
    NewGame,
    Save,
    Load,
    Tick {
        #[serde(default)]
        now_millis: Option<Millis>,
    },
    About,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    #[serde(flatten)]
    dashboard: Dashboard,
    events:    Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message:   Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let no_load = args.iter().any(|a| a == "--no-load");
    let seconds = parse_arg(&args, "--seconds", 600u64);

    let config = match flag_value(&args, "--config") {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let save_path = flag_value(&args, "--save")
        .map(str::to_string)
        .unwrap_or_else(|| config.save_path.clone());

    if ipc_mode {
        let mut engine = GameEngine::new(config, FileSaveStore::new(&save_path), SystemClock)?;
        if !no_load {
            engine.load();
        }
        // A --no-load session must not clobber the save it ignored.
        let stdin = io::stdin();
        run_ipc_loop(&mut engine, stdin.lock(), io::stdout(), !no_load)?;
    } else {
        println!("{}", about_title());
        println!("  save:      {save_path}");
        println!("  seconds:   {seconds}");
        println!();
        run_autoplay(config, &save_path, seconds, no_load)?;
    }

    Ok(())
}

fn run_ipc_loop<S: SaveStore, C: Clock>(
    engine: &mut GameEngine<S, C>,
    mut handle: impl BufRead,
    mut stdout: impl Write,
    save_on_quit: bool,
) -> Result<()> {
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        // Catch up on production and autosave before acting.
        let mut events = engine.pump()?;
        let mut message = None;
        let quit = matches!(cmd, IpcCommand::Quit);

        match cmd {
            IpcCommand::GetState => {}
            IpcCommand::Click => events.extend(engine.click()),
            IpcCommand::Buy { generator_id } => events.extend(engine.buy(generator_id)),
            IpcCommand::NewGame => events.extend(engine.new_game()?),
            IpcCommand::Save => events.extend(engine.save()?),
            IpcCommand::Load => events.extend(engine.load()),
            IpcCommand::Tick { now_millis } => {
                let now = now_millis.unwrap_or_else(|| engine.clock().now());
                events.extend(engine.tick(now));
            }
            IpcCommand::About => message = Some(format!("{}\n{ABOUT}", about_title())),
            IpcCommand::Quit if save_on_quit => events.extend(engine.save()?),
            IpcCommand::Quit => {
                log::info!("session {} quit without saving", engine.session_id);
            }
        }

        let state = UiState { dashboard: engine.dashboard(), events, message };
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;

        if quit {
            log::info!("session {} quit", engine.session_id);
            break;
        }
    }
    Ok(())
}

fn run_autoplay(config: GameConfig, save_path: &str, seconds: u64, no_load: bool) -> Result<()> {
    let existing = if no_load {
        EMPTY_SAVE.to_string()
    } else {
        FileSaveStore::new(save_path).load()
    };
    let step = config.tick_interval_ms;
    let clock = ManualClock::starting_at(SystemClock.now());
    let mut engine = GameEngine::new(config, MemorySaveStore::with_blob(existing), clock.clone())?;
    engine.load();

    let steps = (seconds as i64 * 1000) / step;
    let mut purchases = 0u64;
    let mut unlocks = Vec::new();
    for _ in 0..steps {
        clock.advance(step);
        let mut events = engine.pump()?;
        events.extend(engine.click());
        events.extend(buy_greedily(&mut engine));

        for event in events {
            match event {
                GameEvent::GeneratorPurchased { .. } => purchases += 1,
                GameEvent::GeneratorUnlocked { name, .. } => unlocks.push(name),
                _ => {}
            }
        }
    }

    print_summary(&engine, seconds, purchases, &unlocks);
    Ok(())
}

/// Buy the priciest affordable generator until nothing is affordable.
fn buy_greedily<S: SaveStore, C: Clock>(engine: &mut GameEngine<S, C>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    loop {
        let best = engine
            .state()
            .generators
            .iter()
            .rev()
            .find(|g| engine.state().can_afford(g.id))
            .map(|g| g.id);
        match best {
            Some(id) => events.extend(engine.buy(id)),
            None => break,
        }
    }
    events
}

fn print_summary<S: SaveStore, C: Clock>(
    engine: &GameEngine<S, C>,
    seconds: u64,
    purchases: u64,
    unlocks: &[String],
) {
    let dash = engine.dashboard();
    let started = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(engine.state().game_start)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("=== AUTOPLAY SUMMARY ===");
    println!("  session:        {}", engine.session_id);
    println!("  simulated:      {seconds}s");
    println!("  game started:   {started}");
    println!("  time played:    {}", format_play_time(dash.play_time_ms));
    println!("  bytes:          {}", format_number(dash.bytes));
    println!("  total bytes:    {}", format_number(dash.total_bytes));
    println!("  clicks:         {}", dash.clicks);
    println!("  click power:    {:.2}", dash.click_power);
    println!("  bytes/s:        {}", format_number(dash.bytes_per_second));
    println!("  purchases:      {purchases}");
    if !unlocks.is_empty() {
        println!("  unlocked:       {}", unlocks.join(", "));
    }

    println!();
    println!("=== GENERATORS ===");
    for gen in dash.generators.iter().filter(|g| g.unlocked) {
        println!(
            "  {:<18} x{:<4} | Cost: {} bytes | Producing: {} bytes/s",
            gen.name,
            gen.count,
            format_number(gen.cost),
            format_number(gen.producing)
        );
    }
}

fn about_title() -> String {
    format!("Byte Clicker v{}", env!("CARGO_PKG_VERSION"))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
