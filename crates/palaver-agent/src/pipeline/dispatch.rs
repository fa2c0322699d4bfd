//! Ordered dispatch tables.
//!
//! Precedence is data: tables are slices evaluated top-to-bottom and
//! the first matching predicate short-circuits the rest of its table.
//! A handler either replies directly (terminal) or mutates the turn
//! and falls through to the rest of the pipeline (enriching).

use std::future::Future;
use std::pin::Pin;

use palaver_core::types::Reply;
use palaver_core::Result;
use tracing::debug;

use super::Turn;

pub enum Outcome {
    Reply(Reply),
    Continue,
}

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Outcome>> + Send + 'a>>;

pub struct Command {
    pub name: &'static str,
    pub applies: fn(&Turn) -> bool,
    pub run: for<'a> fn(&'a mut Turn) -> HandlerFuture<'a>,
}

/// Run a table against the turn. `Some(reply)` ends the request;
/// `None` means no terminal handler fired and the pipeline continues.
pub async fn dispatch(table: &[Command], turn: &mut Turn) -> Result<Option<Reply>> {
    for command in table {
        if (command.applies)(turn) {
            debug!(command = command.name, "dispatching");
            return match (command.run)(turn).await? {
                Outcome::Reply(reply) => Ok(Some(reply)),
                Outcome::Continue => Ok(None),
            };
        }
    }
    Ok(None)
}
