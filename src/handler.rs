use core::marker::PhantomData;

use crate::events::IbcEvent;

pub type HandlerResult<T, E> = Result<HandlerOutput<T>, E>;

/// What a successful handler hands back to its caller: the state changes to persist, log lines,
/// and the events to emit once the changes are stored.
#[derive(Clone, Debug)]
pub struct HandlerOutput<T> {
    pub result: T,
    pub log: Vec<String>,
    pub events: Vec<IbcEvent>,
}

impl<T> HandlerOutput<T> {
    pub fn builder() -> HandlerOutputBuilder<T> {
        HandlerOutputBuilder::new()
    }

    /// Keeps the log and events of this output and swaps its result.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> HandlerOutput<U> {
        HandlerOutput {
            result: f(self.result),
            log: self.log,
            events: self.events,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct HandlerOutputBuilder<T> {
    log: Vec<String>,
    events: Vec<IbcEvent>,
    marker: PhantomData<T>,
}

impl<T> HandlerOutputBuilder<T> {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            events: Vec::new(),
            marker: PhantomData,
        }
    }

    pub fn with_log(mut self, log: impl Into<Vec<String>>) -> Self {
        self.log.append(&mut log.into());
        self
    }

    pub fn log(&mut self, log: impl Into<String>) {
        self.log.push(log.into());
    }

    pub fn with_events(mut self, mut events: Vec<IbcEvent>) -> Self {
        self.events.append(&mut events);
        self
    }

    pub fn emit(&mut self, event: IbcEvent) {
        self.events.push(event);
    }

    /// Folds the log and events of an earlier output into this one.
    pub fn merge<U>(&mut self, other: HandlerOutput<U>) -> U {
        let HandlerOutput {
            result,
            mut log,
            mut events,
        } = other;
        self.log.append(&mut log);
        self.events.append(&mut events);
        result
    }

    pub fn with_result(self, result: T) -> HandlerOutput<T> {
        HandlerOutput {
            result,
            log: self.log,
            events: self.events,
        }
    }
}
