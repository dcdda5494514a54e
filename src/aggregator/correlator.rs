//! Request/completion correlation.
//!
//! `MessageRequest` and `ReplyRequest` events open an asynchronous call keyed
//! by message id. The matching `MessageCompleted` closes it and inherits the
//! routing fields (and, for requests, the call target) of its initiator.

use crate::parser::{EventKind, FieldValue, LogEvent};
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};

/// Which event opened a pending call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initiator {
    Request,
    Reply,
}

/// An in-flight call waiting for its completion
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    pub initiator: Initiator,
    pub busid: Option<i64>,
    pub callthr: Option<i64>,
    pub tocpu: Option<i64>,
    pub opname: Option<String>,
    pub objref: Option<FieldValue>,
    pub clnm: Option<String>,
}

impl PendingCall {
    fn from_event(event: &LogEvent) -> Option<Self> {
        let initiator = match event.kind {
            EventKind::MessageRequested => Initiator::Request,
            EventKind::ReplyRequested => Initiator::Reply,
            _ => return None,
        };

        Some(Self {
            initiator,
            busid: event.busid,
            callthr: event.callthr,
            tocpu: event.tocpu,
            opname: event.opname.clone(),
            objref: event.objref.clone(),
            clnm: event.clnm.clone(),
        })
    }

    /// Copy the initiator's fields onto its completion
    fn enrich(self, completion: &mut LogEvent) {
        completion.busid = self.busid;
        completion.callthr = self.callthr;
        completion.tocpu = self.tocpu;

        if self.initiator == Initiator::Request {
            completion.opname = self.opname;
            completion.objref = self.objref;
            completion.clnm = self.clnm;
        }
    }
}

/// Pending-call table
///
/// Each pending call is consumed at most once. Calls sharing a message id are
/// consumed oldest first.
#[derive(Debug, Default)]
pub struct Correlator {
    pending: HashMap<i64, VecDeque<PendingCall>>,
    orphaned: usize,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request or reply as pending
    ///
    /// **Public** - events of other kinds, or without a message id, are ignored
    pub fn open(&mut self, event: &LogEvent) {
        let Some(call) = PendingCall::from_event(event) else {
            return;
        };
        let Some(msgid) = event.msgid else {
            debug!("{} at {} has no msgid, cannot correlate", event.kind.tag(), event.time);
            return;
        };

        self.pending.entry(msgid).or_default().push_back(call);
    }

    /// Close the pending call matching a completion and enrich the completion
    ///
    /// **Public** - called for every `MessageCompleted`
    ///
    /// # Returns
    /// `true` if a pending call was consumed. An orphaned completion is left
    /// with only its own fields.
    pub fn complete(&mut self, completion: &mut LogEvent) -> bool {
        let call = completion.msgid.and_then(|msgid| self.take(msgid));

        match call {
            Some(call) => {
                call.enrich(completion);
                true
            }
            None => {
                self.orphaned += 1;
                warn!(
                    "MessageCompleted at {} has no matching request (msgid {:?})",
                    completion.time, completion.msgid
                );
                false
            }
        }
    }

    fn take(&mut self, msgid: i64) -> Option<PendingCall> {
        let queue = self.pending.get_mut(&msgid)?;
        let call = queue.pop_front();
        if queue.is_empty() {
            self.pending.remove(&msgid);
        }
        call
    }

    /// Number of completions that matched nothing
    pub fn orphaned(&self) -> usize {
        self.orphaned
    }

    /// Number of calls still waiting for a completion
    pub fn pending(&self) -> usize {
        self.pending.values().map(VecDeque::len).sum()
    }
}
