use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use super::turn::{MoveReply, MoveRequest, Resolution, TurnController};
use crate::oracle::MoveOracle;
use crate::stats::TallyStore;

/// Messages delivered back to the thread that owns the controller.
#[derive(Debug)]
pub enum OracleEvent {
    Move(MoveReply),
    Health(bool),
}

/// Wait out the visual delay, then ask the oracle for a move.
pub async fn fetch_move(oracle: &dyn MoveOracle, request: &MoveRequest, delay: Duration) -> MoveReply {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let result = oracle.best_move(&request.board, &request.variant).await;
    debug!(generation = request.generation(), oracle = oracle.name(), ?result, "oracle settled");
    request.reply(result)
}

/// Run one full opponent step in place: fetch, then resolve.
pub async fn play_opponent_turn<S: TallyStore>(
    controller: &mut TurnController<S>,
    oracle: &dyn MoveOracle,
    request: MoveRequest,
    delay: Duration,
) -> Resolution {
    let reply = fetch_move(oracle, &request, delay).await;
    controller.resolve_opponent_move(reply)
}

/// Fetch a move on the runtime and send the reply to `events`. The receiver
/// applies it with [`TurnController::resolve_opponent_move`], which drops it
/// if the game has moved on in the meantime.
pub fn spawn_move_request(
    runtime: &Handle,
    oracle: Arc<dyn MoveOracle>,
    request: MoveRequest,
    delay: Duration,
    events: UnboundedSender<OracleEvent>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        let reply = fetch_move(oracle.as_ref(), &request, delay).await;
        // The receiver is gone only when the UI has shut down.
        let _ = events.send(OracleEvent::Move(reply));
    })
}

pub async fn probe_health(oracle: &dyn MoveOracle) -> bool {
    match oracle.health().await {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "health probe failed");
            false
        }
    }
}

pub fn spawn_health_probe(
    runtime: &Handle,
    oracle: Arc<dyn MoveOracle>,
    events: UnboundedSender<OracleEvent>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        let reachable = probe_health(oracle.as_ref()).await;
        let _ = events.send(OracleEvent::Health(reachable));
    })
}
