use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{self, Event, KeyEventKind};
use research_core::{update, AppState, Msg};
use research_engine::{EngineConfig, EngineHandle};
use research_logging::{research_debug, research_info};

use super::config::Settings;
use super::effects::EffectRunner;
use super::keys::{map_key, KeyAction};
use super::terminal::{self, Tui};
use super::ui;

/// How long to wait for a key before checking engine events again.
const INPUT_POLL: Duration = Duration::from_millis(50);

pub fn run_app(settings: Settings) -> anyhow::Result<()> {
    research_info!(
        "Starting research client base_url={} download_dir={:?}",
        settings.api.base_url,
        settings.download_dir
    );
    let engine = EngineHandle::new(EngineConfig {
        api: settings.api,
        download_dir: settings.download_dir,
    })
    .context("starting research engine")?;
    let runner = EffectRunner::new(engine);

    terminal::install_panic_hook();
    let mut tui = terminal::init().context("initializing terminal")?;
    let result = event_loop(&mut tui, &runner);
    terminal::restore().context("restoring terminal")?;
    research_info!("Research client stopped");
    result
}

fn event_loop(tui: &mut Tui, runner: &EffectRunner) -> anyhow::Result<()> {
    let mut state = AppState::new();
    let mut inbox = VecDeque::from([Msg::Started]);
    let mut view = state.view();
    tui.draw(|frame| ui::render::render(frame, &view))?;

    loop {
        while let Some(msg) = inbox.pop_front() {
            research_debug!("Dispatch {:?}", msg);
            let (next, effects) = update(state, msg);
            state = next;
            runner.enqueue(effects);
        }

        if state.consume_dirty() {
            view = state.view();
            tui.draw(|frame| ui::render::render(frame, &view))?;
        }

        if event::poll(INPUT_POLL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match map_key(&view, key) {
                        KeyAction::Send(msg) => inbox.push_back(msg),
                        KeyAction::Quit => break,
                        KeyAction::Ignore => {}
                    }
                }
                Event::Resize(..) => {
                    tui.draw(|frame| ui::render::render(frame, &view))?;
                }
                _ => {}
            }
        }

        inbox.extend(runner.drain());
    }

    Ok(())
}
