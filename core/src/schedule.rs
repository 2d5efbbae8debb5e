use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Handle for a delayed path clear, handed to the host after a rejected submit.
///
/// The host fires it back through [`SelectionEngine::run_scheduled_clear`](crate::SelectionEngine::run_scheduled_clear)
/// once its own timer elapses. Tickets that were cancelled or superseded are ignored when fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClearTicket(u64);

impl ClearTicket {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct PendingClear {
    ticket: ClearTicket,
    due: Instant,
}

/// Holds at most one pending clear. Scheduling again supersedes the previous ticket.
#[derive(Clone, Debug, Default)]
pub struct ClearSchedule {
    issued: u64,
    pending: Option<PendingClear>,
}

impl ClearSchedule {
    pub const fn new() -> Self {
        Self {
            issued: 0,
            pending: None,
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration) -> ClearTicket {
        self.issued += 1;
        let ticket = ClearTicket(self.issued);
        if let Some(previous) = self.pending.replace(PendingClear {
            ticket,
            due: now + delay,
        }) {
            log::trace!("clear ticket {} superseded by {}", previous.ticket.0, ticket.0);
        }
        ticket
    }

    /// Drop the pending ticket, returning it if there was one.
    pub fn cancel(&mut self) -> Option<ClearTicket> {
        self.pending.take().map(|pending| pending.ticket)
    }

    pub fn pending(&self) -> Option<ClearTicket> {
        self.pending.map(|pending| pending.ticket)
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due)
    }

    /// Consume the pending ticket if it is `ticket`.
    pub fn take_if(&mut self, ticket: ClearTicket) -> bool {
        match self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending ticket if its due time has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<ClearTicket> {
        match self.pending {
            Some(pending) if pending.due <= now => {
                self.pending = None;
                Some(pending.ticket)
            }
            _ => None,
        }
    }
}
