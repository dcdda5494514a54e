//! Event kinds, the typed `LogEvent` model, and the event classifier.
//!
//! The classifier turns a tokenized line into a `LogEvent` when its kind tag
//! is one of the known log events. Unknown tags are counted, never stored.

use super::schema::TimestampSequence;
use super::tokenizer::{RawField, TokenizedLine};
use super::value::FieldValue;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of log event kinds
///
/// Serialized as the raw tag the log producer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "CPUdecl")]
    ProcessorDeclared,
    #[serde(rename = "BUSdecl")]
    BusDeclared,
    #[serde(rename = "ThreadCreate")]
    ThreadCreated,
    #[serde(rename = "ThreadSwapIn")]
    ThreadSwappedIn,
    #[serde(rename = "DelayedThreadSwapIn")]
    ThreadSwapDelayed,
    #[serde(rename = "ThreadSwapOut")]
    ThreadSwappedOut,
    #[serde(rename = "ThreadKill")]
    ThreadKilled,
    #[serde(rename = "MessageRequest")]
    MessageRequested,
    #[serde(rename = "MessageActivate")]
    MessageActivated,
    #[serde(rename = "MessageCompleted")]
    MessageCompleted,
    #[serde(rename = "OpActivate")]
    OperationActivated,
    #[serde(rename = "OpRequest")]
    OperationRequested,
    #[serde(rename = "OpCompleted")]
    OperationCompleted,
    #[serde(rename = "ReplyRequest")]
    ReplyRequested,
    #[serde(rename = "DeployObj")]
    ObjectDeployed,
}

impl EventKind {
    pub const ALL: [EventKind; 15] = [
        Self::ProcessorDeclared,
        Self::BusDeclared,
        Self::ThreadCreated,
        Self::ThreadSwappedIn,
        Self::ThreadSwapDelayed,
        Self::ThreadSwappedOut,
        Self::ThreadKilled,
        Self::MessageRequested,
        Self::MessageActivated,
        Self::MessageCompleted,
        Self::OperationActivated,
        Self::OperationRequested,
        Self::OperationCompleted,
        Self::ReplyRequested,
        Self::ObjectDeployed,
    ];

    /// Raw log tag for this kind
    pub fn tag(self) -> &'static str {
        match self {
            Self::ProcessorDeclared => "CPUdecl",
            Self::BusDeclared => "BUSdecl",
            Self::ThreadCreated => "ThreadCreate",
            Self::ThreadSwappedIn => "ThreadSwapIn",
            Self::ThreadSwapDelayed => "DelayedThreadSwapIn",
            Self::ThreadSwappedOut => "ThreadSwapOut",
            Self::ThreadKilled => "ThreadKill",
            Self::MessageRequested => "MessageRequest",
            Self::MessageActivated => "MessageActivate",
            Self::MessageCompleted => "MessageCompleted",
            Self::OperationActivated => "OpActivate",
            Self::OperationRequested => "OpRequest",
            Self::OperationCompleted => "OpCompleted",
            Self::ReplyRequested => "ReplyRequest",
            Self::ObjectDeployed => "DeployObj",
        }
    }

    /// Look up a kind by its raw log tag (case-sensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Whether events of this kind are scheduling activity on a processor
    ///
    /// Declarations and bookkeeping events are kept out of timelines.
    pub fn is_timeline_event(self) -> bool {
        !matches!(
            self,
            Self::ProcessorDeclared
                | Self::BusDeclared
                | Self::MessageActivated
                | Self::ObjectDeployed
        )
    }

    /// Whether this kind opens an asynchronous call closed by `MessageCompleted`
    pub fn opens_call(self) -> bool {
        matches!(self, Self::MessageRequested | Self::ReplyRequested)
    }
}

/// A classified log event
///
/// Attributes are populated only when the line carries them. Fields with no
/// dedicated attribute (or with an unexpected type) are kept in `extra`,
/// nested so their keys never collide with the typed attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub kind: EventKind,
    pub time: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topo: Option<Vec<i64>>,

    /// Processor the event ran on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpunm: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thid: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fromcpu: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tocpu: Option<i64>,
    /// Calling thread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callthr: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objref: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clnm: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, FieldValue>,
}

impl LogEvent {
    /// Create an event with no attributes
    pub fn new(kind: EventKind, time: u64) -> Self {
        Self {
            kind,
            time,
            id: None,
            name: None,
            expl: None,
            sys: None,
            topo: None,
            cpunm: None,
            thid: None,
            msgid: None,
            busid: None,
            fromcpu: None,
            tocpu: None,
            callthr: None,
            opname: None,
            objref: None,
            clnm: None,
            extra: BTreeMap::new(),
        }
    }

    /// Processor that owns this event
    ///
    /// Resolved from `cpunm`, then `fromcpu`, then `tocpu`, then `id`.
    pub fn owner(&self) -> Option<i64> {
        self.cpunm.or(self.fromcpu).or(self.tocpu).or(self.id)
    }

    /// Store one field on its attribute
    ///
    /// **Public** - later fields with the same key overwrite earlier ones
    pub fn set_field(&mut self, field: RawField) {
        let RawField { key, value } = field;

        let stored = match key.as_str() {
            "id" => assign_int(&mut self.id, &value),
            "cpunm" => assign_int(&mut self.cpunm, &value),
            "thid" => assign_int(&mut self.thid, &value),
            "msgid" => assign_int(&mut self.msgid, &value),
            "busid" => assign_int(&mut self.busid, &value),
            "fromcpu" => assign_int(&mut self.fromcpu, &value),
            "tocpu" => assign_int(&mut self.tocpu, &value),
            "callthr" => assign_int(&mut self.callthr, &value),
            "name" => assign_text(&mut self.name, &value),
            "sys" => assign_text(&mut self.sys, &value),
            "opname" => assign_text(&mut self.opname, &value),
            "clnm" => assign_text(&mut self.clnm, &value),
            "expl" => match value.as_bool() {
                Some(b) => {
                    self.expl = Some(b);
                    true
                }
                None => false,
            },
            "topo" => match &value {
                FieldValue::List(ids) => {
                    self.topo = Some(ids.clone());
                    true
                }
                _ => false,
            },
            "objref" => {
                self.objref = Some(value.clone());
                true
            }
            _ => false,
        };

        if !stored {
            if is_known_attribute(&key) {
                debug!(
                    "{} field '{}' has unexpected value {}, keeping it as extra",
                    self.kind.tag(),
                    key,
                    value
                );
            }
            self.extra.insert(key, value);
        }
    }
}

fn assign_int(slot: &mut Option<i64>, value: &FieldValue) -> bool {
    match value.as_i64() {
        Some(int) => {
            *slot = Some(int);
            true
        }
        None => false,
    }
}

fn assign_text(slot: &mut Option<String>, value: &FieldValue) -> bool {
    match value.to_text() {
        Some(text) => {
            *slot = Some(text);
            true
        }
        None => false,
    }
}

fn is_known_attribute(key: &str) -> bool {
    matches!(
        key,
        "id" | "cpunm"
            | "thid"
            | "msgid"
            | "busid"
            | "fromcpu"
            | "tocpu"
            | "callthr"
            | "name"
            | "sys"
            | "opname"
            | "clnm"
            | "expl"
            | "topo"
    )
}

/// Classifies tokenized lines into events
///
/// Owns the unknown-kind counters and the global distinct timestamp sequence.
#[derive(Debug, Default)]
pub struct Classifier {
    unknown: BTreeMap<String, usize>,
    timestamps: TimestampSequence,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one tokenized line
    ///
    /// **Public** - second stage of ingestion
    ///
    /// # Returns
    /// The event if its kind is known, `None` (and a counter bump) otherwise
    ///
    /// An event without a usable `time` field inherits the latest timestamp seen.
    pub fn classify(&mut self, line: TokenizedLine) -> Option<LogEvent> {
        let Some(kind) = EventKind::from_tag(&line.kind) else {
            *self.unknown.entry(line.kind).or_insert(0) += 1;
            return None;
        };

        let mut time = None;
        let mut event = LogEvent::new(kind, 0);
        for field in line.fields {
            if field.key == "time" {
                time = field.value.as_i64().and_then(|t| u64::try_from(t).ok());
                if time.is_none() {
                    debug!("{} has an unusable time value {}", kind.tag(), field.value);
                }
                continue;
            }
            event.set_field(field);
        }

        event.time = match time {
            Some(t) => t,
            None => {
                let inherited = self.timestamps.last().unwrap_or(0);
                debug!("{} without time, using {}", kind.tag(), inherited);
                inherited
            }
        };
        self.timestamps.observe(event.time);

        Some(event)
    }

    /// Unknown kind tags and their occurrence counts
    pub fn unknown_kinds(&self) -> &BTreeMap<String, usize> {
        &self.unknown
    }

    /// Consume the classifier, returning the global timestamps and unknown counts
    pub fn finish(self) -> (TimestampSequence, BTreeMap<String, usize>) {
        (self.timestamps, self.unknown)
    }
}
