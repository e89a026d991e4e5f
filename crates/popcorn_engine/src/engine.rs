use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use popcorn_logging::{popcorn_debug, popcorn_warn};
use tokio_util::sync::CancellationToken;

use crate::omdb::MovieSource;
use crate::{EngineEvent, RequestId};

enum Request {
    Search { query: String },
    Details { imdb_id: String },
}

enum EngineCommand {
    Start { request_id: RequestId, request: Request },
    Cancel { request_id: RequestId },
}

type InFlight = Arc<Mutex<HashMap<RequestId, CancellationToken>>>;

/// Runs requests on a background tokio runtime.
///
/// Each request owns a [`CancellationToken`]; [`EngineHandle::cancel`] fires
/// it, which aborts the transport call. Cancelled requests emit no event.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(source: Arc<dyn MovieSource>) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let in_flight: InFlight = Arc::default();

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Start {
                        request_id,
                        request,
                    } => {
                        let cancel = CancellationToken::new();
                        lock(&in_flight).insert(request_id, cancel.clone());
                        runtime.spawn(run_request(
                            source.clone(),
                            request_id,
                            request,
                            cancel,
                            event_tx.clone(),
                            in_flight.clone(),
                        ));
                    }
                    EngineCommand::Cancel { request_id } => {
                        if let Some(cancel) = lock(&in_flight).remove(&request_id) {
                            popcorn_debug!("cancelling request {}", request_id);
                            cancel.cancel();
                        }
                    }
                }
            }

            // All handles dropped: abort anything still running.
            for (_, cancel) in lock(&in_flight).drain() {
                cancel.cancel();
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn search(&self, request_id: RequestId, query: impl Into<String>) {
        self.send(EngineCommand::Start {
            request_id,
            request: Request::Search {
                query: query.into(),
            },
        });
    }

    pub fn details(&self, request_id: RequestId, imdb_id: impl Into<String>) {
        self.send(EngineCommand::Start {
            request_id,
            request: Request::Details {
                imdb_id: imdb_id.into(),
            },
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        self.send(EngineCommand::Cancel { request_id });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            popcorn_warn!("engine worker has stopped; command dropped");
        }
    }
}

fn lock(in_flight: &InFlight) -> MutexGuard<'_, HashMap<RequestId, CancellationToken>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_request(
    source: Arc<dyn MovieSource>,
    request_id: RequestId,
    request: Request,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
    in_flight: InFlight,
) {
    let event = match request {
        Request::Search { query } => {
            let result = source.search(&query, &cancel).await;
            if cancel.is_cancelled() || result.as_ref().is_err_and(|err| err.is_cancelled()) {
                None
            } else {
                Some(EngineEvent::SearchCompleted { request_id, result })
            }
        }
        Request::Details { imdb_id } => {
            let result = source.details(&imdb_id, &cancel).await;
            if cancel.is_cancelled() || result.as_ref().is_err_and(|err| err.is_cancelled()) {
                None
            } else {
                Some(EngineEvent::DetailsCompleted { request_id, result })
            }
        }
    };

    lock(&in_flight).remove(&request_id);
    match event {
        Some(event) => {
            let _ = event_tx.send(event);
        }
        None => popcorn_debug!("request {} cancelled; result dropped", request_id),
    }
}
