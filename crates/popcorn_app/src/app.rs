use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use log::LevelFilter;
use popcorn_core::{update, AppState, AppViewModel, Msg};
use popcorn_engine::{EngineEvent, EngineHandle, KeyValueStore, OmdbClient};
use popcorn_logging::{popcorn_debug, popcorn_info};

use crate::config::{AppConfig, CONFIG_FILENAME};
use crate::effects::{engine_event_to_msg, EffectRunner};
use crate::input::{parse_line, Command, HELP};
use crate::{persistence, render};

enum Input {
    Line(String),
    Engine(EngineEvent),
    Closed,
}

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load(Path::new(CONFIG_FILENAME), |key| std::env::var(key).ok())?;
    popcorn_logging::initialize(config.log_destination(), LevelFilter::Info);
    popcorn_info!("Starting popcorn; storage at {:?}", config.storage_path);

    let client = OmdbClient::new(config.omdb.clone()).context("building OMDb client")?;
    let (engine, engine_events) = EngineHandle::spawn(Arc::new(client));
    let store = KeyValueStore::new(&config.storage_path);
    let restored = persistence::load_watched(&store);

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    spawn_stdin_reader(input_tx.clone());
    spawn_engine_forwarder(engine_events, input_tx);

    let mut session = Session::new(EffectRunner::new(engine, store));
    let mut out = io::stdout().lock();
    session.dispatch(Msg::RestoreWatched(restored));
    session.render_to(&mut out)?;

    for input in input_rx {
        let msg = match input {
            Input::Engine(event) => engine_event_to_msg(event),
            Input::Closed => break,
            Input::Line(line) => match session.resolve(parse_line(&line)) {
                Resolved::Msg(msg) => msg,
                Resolved::Say(text) => {
                    writeln!(out, "{text}")?;
                    continue;
                }
                Resolved::Quit => break,
            },
        };
        if session.dispatch(msg) {
            session.render_to(&mut out)?;
        }
    }

    popcorn_info!("Shutting down");
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Closed);
    });
}

fn spawn_engine_forwarder(events: mpsc::Receiver<EngineEvent>, tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            if tx.send(Input::Engine(event)).is_err() {
                return;
            }
        }
    });
}

/// What a typed command turns into.
#[derive(Debug, PartialEq)]
pub enum Resolved {
    Msg(Msg),
    /// Text to print without touching state.
    Say(String),
    Quit,
}

/// Owns the state machine; messages are applied one at a time in arrival order.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Applies `msg`, runs its effects and reports whether a re-render is due.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        popcorn_debug!("dispatch {}", msg_name(&msg));
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.run(effects);
        let dirty = state.consume_dirty();
        self.state = state;
        dirty
    }

    pub fn resolve(&self, command: Command) -> Resolved {
        let view = self.state.view();
        match command {
            Command::Query(text) => Resolved::Msg(Msg::QueryChanged(text)),
            Command::Clear => Resolved::Msg(Msg::QueryCleared),
            Command::Open(n) => match n.checked_sub(1).and_then(|i| view.movies.get(i)) {
                Some(movie) => Resolved::Msg(Msg::MovieSelected {
                    id: movie.id.clone(),
                }),
                None => Resolved::Say(format!("no result #{n}")),
            },
            Command::Back => Resolved::Msg(Msg::SelectionClosed),
            Command::Rate(rating) => Resolved::Msg(Msg::RatingChosen(rating)),
            Command::Add => Resolved::Msg(Msg::AddToWatched),
            Command::Remove(n) => match n.checked_sub(1).and_then(|i| view.watched.get(i)) {
                Some(movie) => Resolved::Msg(Msg::WatchedRemoved {
                    id: movie.id.clone(),
                }),
                None => Resolved::Say(format!("no watched movie #{n}")),
            },
            Command::Help => Resolved::Say(HELP.to_string()),
            Command::Quit => Resolved::Quit,
            Command::Invalid(line) => {
                Resolved::Say(format!("unknown command {line:?}; :help lists them"))
            }
        }
    }

    fn render_to(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}> ", render::render(&self.state.view()))?;
        out.flush()
    }
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::QueryChanged(_) => "QueryChanged",
        Msg::QueryCleared => "QueryCleared",
        Msg::SearchSettled { .. } => "SearchSettled",
        Msg::MovieSelected { .. } => "MovieSelected",
        Msg::SelectionClosed => "SelectionClosed",
        Msg::DetailsSettled { .. } => "DetailsSettled",
        Msg::RatingChosen(_) => "RatingChosen",
        Msg::AddToWatched => "AddToWatched",
        Msg::WatchedRemoved { .. } => "WatchedRemoved",
        Msg::RestoreWatched(_) => "RestoreWatched",
    }
}
