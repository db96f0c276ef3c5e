/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};

use config::GameConfig;
use sim::event::GameEvent;
use sim::host::LocalHost;
use sim::rng::SeededRandom;
use sim::screen::Screen;
use sim::session::{MoveIntent, Session};
use ui::gamepad::GamepadState;
use ui::input::{InputAction, InputState};
use ui::renderer::{screen_to_grid, Renderer};
use ui::sound::SoundEngine;

type TerminalHost = LocalHost<SeededRandom>;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() -> Result<()> {
    let (config, warnings) = GameConfig::load();

    if let Some(path) = config.log_file.as_deref() {
        if let Err(e) = init_logging(path) {
            eprintln!("logging disabled: {e:#}");
        }
    }
    for w in &warnings {
        warn!("{w}");
    }
    info!(
        "raindrop {} on {}x{} grid, seed {}",
        env!("CARGO_PKG_VERSION"),
        config.grid.width,
        config.grid.height,
        config.seed
    );

    let mut host = LocalHost::new(config.grid.width, config.grid.height, SeededRandom::new(config.seed));
    let mut session = Session::new(config.timing, config.avatar);
    session.on_init(&mut host);

    let mut renderer = Renderer::new();
    renderer.init().context("terminal init failed")?;

    let sound = SoundEngine::new();
    if sound.is_none() {
        info!("no audio output; running silent");
    }

    let result = game_loop(&mut host, &mut session, &mut renderer, sound.as_ref(), &config);
    let cleanup = renderer.cleanup().context("terminal cleanup failed");

    for w in &warnings {
        eprintln!("config: {w}");
    }
    result?;
    cleanup?;

    println!();
    println!("Thanks for playing Raindrop Journey!");
    Ok(())
}

/// Send log output to `path`. `RUST_LOG` still picks the filter.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}

fn game_loop(
    host: &mut TerminalHost,
    session: &mut Session,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad connected");
    }
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();
        let pad_actions = gp.actions();

        if kb.quit_requested() || pad_actions.contains(&InputAction::Quit) {
            info!("quit requested");
            break;
        }

        for &action in kb.actions.iter().chain(pad_actions.iter()) {
            let events = dispatch(action, session, host);
            process_sound_events(sound, &events);
        }

        if last_tick.elapsed() >= tick_rate {
            let events = host.run_tick(session);
            process_sound_events(sound, &events);
            last_tick = Instant::now();
        }

        renderer.render(&host.board, session.screen()).context("render failed")?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Route one input action to the matching session handler.
fn dispatch(action: InputAction, session: &mut Session, host: &mut TerminalHost) -> Vec<GameEvent> {
    match action {
        InputAction::Start => session.on_start_intent(host),
        InputAction::Step(dir) => session.on_move_intent(host, MoveIntent::Step(dir)),
        InputAction::Click { column, row } => match session.screen() {
            Screen::Title => session.on_start_intent(host),
            Screen::Playing => {
                let (w, h) = (host.board.width(), host.board.height());
                match screen_to_grid(column, row, w, h) {
                    Some(pos) => session.on_move_intent(host, MoveIntent::Column(pos.col)),
                    None => vec![],
                }
            }
            Screen::Ending(_) => vec![],
        },
        InputAction::Quit => vec![],
    }
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Started => sfx.play_start(),
            GameEvent::Moved { .. } => sfx.play_move(),
            GameEvent::CloudHit { .. } => sfx.play_freeze(),
            GameEvent::SunHit { .. } => sfx.play_lose(),
            GameEvent::Won => sfx.play_win(),
            GameEvent::Landed { .. } => sfx.play_land(),
            _ => {}
        }
    }
}
