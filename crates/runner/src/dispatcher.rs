//! Single-threaded event dispatcher
//!
//! Pulls one event at a time from an [`EventSource`], offers it to every
//! interested extension in registration order and then folds it into the
//! [`Context`]. Extensions therefore see the context as it was *before* the
//! event being delivered.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam::utils::Backoff;
use hermes_channel::EventSource;
use hermes_context::{Context, SeriesError};
use hermes_core::Event;
use hermes_strategy::{ExtensionError, ExtensionHost, StrategyConfig};

use crate::config::IdleConfig;

/// Counters reported when the dispatcher stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events taken from the source
    pub events: u64,
    /// Strategy callbacks actually invoked
    pub dispatched_callbacks: u64,
    /// Events the context refused (unknown ID)
    pub rejected: u64,
    /// Outbound order intents seen on the inbound stream
    pub order_intents: u64,
    /// Polls that found the source empty
    pub idle_polls: u64,
}

/// Owns the source, the context and the loaded extensions
pub struct Dispatcher<S> {
    source: S,
    context: Context,
    extensions: Vec<ExtensionHost>,
    shutdown: Arc<AtomicBool>,
    idle: IdleConfig,
    backoff: Backoff,
    idle_streak: u32,
    stats: DispatchStats,
}

impl<S: EventSource> Dispatcher<S> {
    pub fn new(source: S, context: Context) -> Self {
        Self {
            source,
            context,
            extensions: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
            idle: IdleConfig::default(),
            backoff: Backoff::new(),
            idle_streak: 0,
            stats: DispatchStats::default(),
        }
    }

    pub fn with_idle(mut self, idle: IdleConfig) -> Self {
        self.idle = idle;
        self
    }

    /// Initialize `host` against this dispatcher's context and register it
    ///
    /// On failure the host is dropped, which runs its module destructor.
    pub fn attach(
        &mut self,
        mut host: ExtensionHost,
        config: &StrategyConfig,
    ) -> Result<(), ExtensionError> {
        host.init(&self.context, config)?;
        log::info!(
            "[dispatcher] Registered extension {} (#{})",
            host.name(),
            self.extensions.len()
        );
        self.extensions.push(host);
        Ok(())
    }

    pub fn extensions(&self) -> &[ExtensionHost] {
        &self.extensions
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Flag checked between events; set it to stop [`run`](Self::run)
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Process at most one event; `false` if the source was empty
    pub fn poll_once(&mut self) -> bool {
        match self.source.try_read() {
            Some(event) => {
                self.dispatch(&event);
                true
            }
            None => {
                self.stats.idle_polls += 1;
                false
            }
        }
    }

    /// Process events until the source is empty; returns how many were handled
    pub fn drain(&mut self) -> u64 {
        let before = self.stats.events;
        while self.poll_once() {}
        self.stats.events - before
    }

    /// Loop until the shutdown flag is set
    pub fn run(&mut self) -> DispatchStats {
        log::info!(
            "[dispatcher] Running with {} extensions",
            self.extensions.len()
        );
        while !self.shutdown.load(Ordering::Acquire) {
            if self.poll_once() {
                self.idle_streak = 0;
                self.backoff.reset();
            } else {
                self.wait();
            }
        }
        log::info!(
            "[dispatcher] Stopped after {} events ({} callbacks, {} rejected)",
            self.stats.events,
            self.stats.dispatched_callbacks,
            self.stats.rejected
        );
        self.stats
    }

    fn wait(&mut self) {
        if self.idle_streak < self.idle.spin_limit {
            self.idle_streak += 1;
            self.backoff.snooze();
        } else {
            thread::sleep(self.idle.park_duration());
        }
    }

    /// Deliver one event to extensions, then update the context
    pub fn dispatch(&mut self, event: &Event) {
        self.stats.events += 1;
        let context = &self.context;
        let hosts = &mut self.extensions;

        let (delivered, update) = match event {
            Event::Static(fact) => {
                let n = fan_out(hosts, |h| h.on_static(context, fact));
                (n, self.context.on_static(fact))
            }
            Event::Bar(fact) => {
                let n = fan_out(hosts, |h| h.on_bar(context, fact));
                (n, self.context.on_bar(fact))
            }
            Event::Depth(fact) => {
                let n = fan_out(hosts, |h| h.on_depth(context, fact));
                (n, self.context.on_depth(fact))
            }
            Event::Balance(fact) => {
                let n = fan_out(hosts, |h| h.on_balance(context, fact));
                (n, self.context.on_balance(fact))
            }
            Event::OrderUpdate(fact) => (fan_out(hosts, |h| h.on_order_update(context, fact)), Ok(())),
            Event::Trade(fact) => (fan_out(hosts, |h| h.on_trade(context, fact)), Ok(())),
            Event::NewOrder(_) | Event::CancelOrder(_) => {
                self.stats.order_intents += 1;
                log::trace!("[dispatcher] Skipping outbound {} intent", event.kind());
                (0, Ok(()))
            }
        };

        self.stats.dispatched_callbacks += delivered;
        if let Err(e) = update {
            self.reject(event, e);
        }
    }

    fn reject(&mut self, event: &Event, error: SeriesError) {
        self.stats.rejected += 1;
        log::warn!("[dispatcher] Rejected {} event: {}", event.kind(), error);
    }
}

fn fan_out(hosts: &mut [ExtensionHost], mut deliver: impl FnMut(&mut ExtensionHost) -> bool) -> u64 {
    hosts.iter_mut().map(|h| u64::from(deliver(h))).sum()
}
