use std::time::Duration;

use anyhow::Context;
use boldscan_core::{render_summary, update, AppState, AppViewModel, Msg, ResultsPane};
use boldscan_engine::{EngineStopped, PageTarget};
use boldscan_logging::{level_for_verbosity, scan_error, scan_info, scan_warn, set_cycle};
use clap::Parser;

use super::args::Args;
use super::config::{self, API_KEY_ENV};
use super::effects::{EffectPort, EffectRunner};
use super::logging;
use super::output::PanelWriter;

const TICK: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::initialize(args.log, level_for_verbosity(args.verbose));

    let file_config = config::load(args.config.as_deref())?;
    let settings = config::resolve(file_config, &args, std::env::var(API_KEY_ENV).ok());
    if settings.panel.enrich_with_video && settings.engine.resolver.api_key.is_none() {
        scan_warn!("no search api key configured; every phrase will get the fallback video");
    }

    let panel = PanelWriter::new(args.output.clone(), args.target.as_deref())
        .with_context(|| format!("cannot write panel to {:?}", args.output))?;
    let target = args.target.as_deref().map(PageTarget::parse);
    let runner = EffectRunner::new(settings.engine, target).context("cannot start engine")?;

    let mut session = Session::new(AppState::with_options(settings.panel), runner, panel);
    session.dispatch(Msg::TriggerClicked);
    session.run_until_settled()?;

    if let Some(position) = args.copy {
        session.copy(position);
        session.run_until_settled()?;
    }

    let view = session.view();
    print!("{}", render_summary(&view));
    scan_info!("panel written to {:?}", session.panel.path());
    Ok(())
}

/// Drives one `AppState` with messages from the engine until nothing is outstanding.
struct Session<P> {
    state: AppState,
    runner: P,
    panel: PanelWriter,
}

impl<P: EffectPort> Session<P> {
    fn new(state: AppState, runner: P, panel: PanelWriter) -> Self {
        Self {
            state,
            runner,
            panel,
        }
    }

    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        set_cycle(state.cycle());
        if state.consume_dirty() {
            self.panel.write(&state.view());
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn run_until_settled(&mut self) -> Result<(), EngineStopped> {
        while !self.view().is_settled() {
            match self.runner.next_msg(TICK) {
                Ok(msg) => self.dispatch(msg.unwrap_or(Msg::Tick)),
                Err(err) => {
                    scan_error!("cycle {}: {err}; giving up", self.state.cycle());
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Presses the copy control of the 1-based `position`th phrase.
    fn copy(&mut self, position: usize) {
        let view = self.view();
        if view.pane != ResultsPane::Phrases {
            scan_warn!("--copy {position}: there are no phrases to copy");
            return;
        }
        match position
            .checked_sub(1)
            .and_then(|index| view.entries.get(index))
        {
            Some(entry) => {
                scan_info!("copying phrase {position} to the clipboard");
                self.dispatch(Msg::CopyClicked { entry: entry.entry });
            }
            None => scan_warn!(
                "--copy {position}: only {} phrases were found",
                view.entries.len()
            ),
        }
    }
}
