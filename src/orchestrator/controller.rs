//! Request lifecycle controller.
//!
//! Runs submissions requested by the UI and emits events for presentation layers.

use crate::engine::{QueryEngine, QueryError, GENERIC_FAILURE};
use crate::model::{QueryConfig, QueryEvent, QueryResult};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub(crate) const ALREADY_RUNNING: &str = "A query is already running. Please wait and try again.";

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Submit(String),
    Quit,
}

/// Run submissions one at a time based on UI commands.
///
/// The outcome of a request is only reported after its slot is released, so a
/// UI that resubmits on completion is never turned away.
pub(crate) async fn run_controller(
    cfg: &QueryConfig,
    event_tx: UnboundedSender<QueryEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let engine = Arc::new(QueryEngine::new(cfg)?);
    let mut in_flight: Option<JoinHandle<Result<QueryResult, QueryError>>> = None;

    let res = loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Submit(query)) => {
                        if in_flight.is_some() {
                            // The submitter already moved to loading; resolve it so it can retry.
                            tracing::warn!(query, "submission rejected: request already in flight");
                            let _ = event_tx.send(QueryEvent::Failed {
                                message: ALREADY_RUNNING.into(),
                            });
                        } else {
                            tracing::info!(query, "submitting query");
                            let _ = event_tx.send(QueryEvent::Started {
                                query: query.clone(),
                            });
                            let engine = engine.clone();
                            in_flight = Some(tokio::spawn(async move { engine.run(&query).await }));
                        }
                    }
                    Some(UiCommand::Quit) | None => {
                        // Requests are not cancellable; a pending one is simply abandoned.
                        if let Some(h) = in_flight.take() {
                            h.abort();
                        }
                        break Ok(());
                    }
                }
            }
            // Keep the JoinHandle in place until this branch wins so completion is never lost.
            done = async {
                match in_flight.as_mut() {
                    Some(h) => h.await,
                    None => futures::future::pending().await,
                }
            } => {
                in_flight = None;
                let ev = match done {
                    Ok(Ok(result)) => QueryEvent::Completed(Box::new(result)),
                    Ok(Err(e)) => QueryEvent::Failed {
                        message: e.user_message(),
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "query task failed");
                        QueryEvent::Failed {
                            message: GENERIC_FAILURE.to_string(),
                        }
                    }
                };
                let _ = event_tx.send(ev);
            }
        }
    };

    res
}
