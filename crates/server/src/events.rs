//! Interaction event queue and the newline-delimited JSON log behind it.

use anyhow::Result;
use holomenu_core::{ActorId, SimTick};
use holomenu_ui3d::{EventBus, MenuId, MenuInteraction};
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// One line of the interaction log.
#[derive(Debug, Serialize)]
pub struct InteractionRecord<'a> {
    /// Tick the interaction was published on.
    pub tick: SimTick,
    /// Menu that was pressed.
    pub menu: MenuId,
    /// Flag of the pressed element.
    pub flag: &'a str,
    /// Actor that pressed it.
    pub actor: ActorId,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    /// Create a sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
        })
    }

    /// Append a record and flush it.
    pub fn write(&mut self, record: &InteractionRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// [`EventBus`] that buffers published interactions until the application drains them.
#[derive(Default)]
pub struct EventQueue {
    pending: Mutex<VecDeque<MenuInteraction>>,
    sink: Mutex<Option<JsonlSink>>,
    tick: AtomicU64,
    published: AtomicU64,
}

impl EventQueue {
    /// Empty queue without a log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also append every published interaction to `sink`.
    pub fn with_sink(sink: JsonlSink) -> Self {
        Self {
            sink: Mutex::new(Some(sink)),
            ..Self::default()
        }
    }

    /// Tick stamped on records written from now on.
    pub fn set_tick(&self, tick: SimTick) {
        self.tick.store(tick.0, Ordering::Relaxed);
    }

    /// Take every pending interaction, oldest first.
    pub fn drain(&self) -> Vec<MenuInteraction> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Interactions waiting to be drained.
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interactions published since creation.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl EventBus for EventQueue {
    fn publish(&self, event: MenuInteraction) {
        let tick = SimTick(self.tick.load(Ordering::Relaxed));
        info!(menu = %event.menu, flag = %event.flag, actor = %event.actor, tick = tick.0, "menu interaction");

        if let Some(sink) = self
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            let record = InteractionRecord {
                tick,
                menu: event.menu,
                flag: &event.flag,
                actor: event.actor,
            };
            if let Err(err) = sink.write(&record) {
                warn!(error = %err, "failed to write interaction log");
            }
        }

        self.published.fetch_add(1, Ordering::Relaxed);
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(event);
    }
}
