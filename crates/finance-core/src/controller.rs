// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use finance_app::{Reply, WindowKind};
use serde_json::Value;
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::EventProcessor;

/// The view side of the loop: draws replies and originates events.
pub trait Presenter {
    /// Draws `reply`. Any events returned are dispatched before the next
    /// user event is read.
    fn render(&mut self, reply: &Reply) -> Result<Vec<Value>>;

    /// Blocks until the user does something. `None` ends the session.
    fn next_event(&mut self) -> Result<Option<Value>>;
}

/// Relays events from the presenter to the processor and replies back.
pub struct Controller<P> {
    processor: EventProcessor,
    presenter: P,
    window: Option<WindowKind>,
    pending: VecDeque<Value>,
}

impl<P: Presenter> Controller<P> {
    pub fn new(processor: EventProcessor, presenter: P) -> Self {
        Self {
            processor,
            presenter,
            window: None,
            pending: VecDeque::new(),
        }
    }

    /// Window of the most recent reply, passed as the hint for the next event.
    pub fn last_window(&self) -> Option<WindowKind> {
        self.window
    }

    pub fn processor(&self) -> &EventProcessor {
        &self.processor
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn dispatch(&mut self, event: Option<&Value>) -> Result<()> {
        let reply = self.processor.process(self.window, event)?;
        self.window = Some(reply.window);
        let follow_ups = self.presenter.render(&reply)?;
        if !follow_ups.is_empty() {
            debug!(count = follow_ups.len(), "presenter raised follow-up events");
        }
        self.pending.extend(follow_ups);
        Ok(())
    }

    /// Sends the startup request, then relays events until the presenter
    /// runs out. The store is closed on the way out, also after an error.
    pub fn run(mut self) -> Result<P> {
        let outcome = self.event_loop();
        let Self {
            processor,
            presenter,
            ..
        } = self;
        let closed = processor.close();
        outcome?;
        closed?;
        Ok(presenter)
    }

    fn event_loop(&mut self) -> Result<()> {
        self.dispatch(None)?;
        let mut handled = 1_usize;
        loop {
            let event = match self.pending.pop_front() {
                Some(event) => event,
                None => match self.presenter.next_event()? {
                    Some(event) => event,
                    None => break,
                },
            };
            self.dispatch(Some(&event))?;
            handled += 1;
        }
        info!(events = handled, "session ended");
        Ok(())
    }
}
