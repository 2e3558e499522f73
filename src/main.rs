/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::{GameConfig, LoggingConfig};
use sim::event::{Action, GameEvent};
use sim::scheduler::TickScheduler;
use sim::session::Session;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    init_logging(&config.logging);
    for w in &config.warnings {
        warn!("{w}");
    }

    let seed = if config.seed == 0 { rand::random::<u64>() } else { config.seed };
    let mut session = Session::new(config.timing.clone(), seed, TickScheduler::new());

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.sound_enabled { SoundEngine::new() } else { None };
    if sound.is_none() {
        info!("running without sound");
    }

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!(error = %e, "game loop failed");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Bureaucracy Hero: The BärGPT Protocol!");
    println!("Final approval: {}", session.game().approval);
}

/// Install a file subscriber. The terminal belongs to the game, so without
/// a log file there is no subscriber at all.
fn init_logging(cfg: &LoggingConfig) {
    let Some(path) = &cfg.file else { return };

    let file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", path.display());
            return;
        }
    };
    let level = cfg.level.parse::<Level>().unwrap_or_else(|_| {
        eprintln!("Warning: unknown log level '{}', using info", cfg.level);
        Level::INFO
    });

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: logging disabled: {e}");
    }
}

fn game_loop(
    session: &mut Session<TickScheduler>,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad connected");
    }

    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);
    let mut last_tick = Instant::now();
    let mut anim_tick: u32 = 0;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            info!("ctrl-c");
            break;
        }

        let actions: Vec<Action> = kb.actions().iter().chain(gp.actions()).copied().collect();
        for action in actions {
            if action == Action::Quit && session.can_quit() {
                info!("quit");
                return Ok(());
            }
            let events = session.handle(action);
            process_sound_events(sound, &events);
        }

        if last_tick.elapsed() >= tick_rate {
            let events = session.tick();
            process_sound_events(sound, &events);
            anim_tick = anim_tick.wrapping_add(1);
            last_tick = Instant::now();
        }

        renderer.render(session, anim_tick)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Click | GameEvent::FaxTriggered => sfx.play_click(),
            GameEvent::Correct => sfx.play_correct(),
            GameEvent::Incorrect | GameEvent::SoftReset => sfx.play_incorrect(),
            GameEvent::EnemyAttack { damage } => sfx.play_hit(*damage),
            GameEvent::LevelComplete(level) => sfx.play_level_up(*level),
            GameEvent::Victory => sfx.play_victory(),
            GameEvent::CoffeeFound => sfx.play_coffee(),
        }
    }
}
