use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::EffectError;

type Listener = Box<dyn FnOnce(Result<(), EffectError>)>;

#[derive(Default)]
struct SignalState {
    outcome: Option<Result<(), EffectError>>,
    listeners: Vec<Listener>,
}

/// Single-shot completion of a release.
///
/// Settles at most once; later `resolve`/`reject` calls are ignored.
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct CompletionSignal {
    state: Rc<RefCell<SignalState>>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settle successfully; returns false if already settled
    pub fn resolve(&self) -> bool {
        self.settle(Ok(()))
    }

    /// Settle with an error; returns false if already settled
    pub fn reject(&self, err: EffectError) -> bool {
        self.settle(Err(err))
    }

    fn settle(&self, outcome: Result<(), EffectError>) -> bool {
        let listeners = {
            let mut state = self.state.borrow_mut();
            if state.outcome.is_some() {
                return false;
            }
            state.outcome = Some(outcome.clone());
            std::mem::take(&mut state.listeners)
        };
        for listener in listeners {
            listener(outcome.clone());
        }
        true
    }

    /// Run `listener` once the signal settles, immediately if it already has
    pub fn on_settle(&self, listener: impl FnOnce(Result<(), EffectError>) + 'static) {
        let settled = self.state.borrow().outcome.clone();
        match settled {
            Some(outcome) => listener(outcome),
            None => self.state.borrow_mut().listeners.push(Box::new(listener)),
        }
    }

    pub fn outcome(&self) -> Option<Result<(), EffectError>> {
        self.state.borrow().outcome.clone()
    }

    pub fn is_settled(&self) -> bool {
        self.state.borrow().outcome.is_some()
    }
}

impl fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("outcome", &self.state.borrow().outcome)
            .finish()
    }
}
