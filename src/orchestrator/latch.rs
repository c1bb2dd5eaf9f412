use std::cell::RefCell;
use std::rc::Rc;

struct FanInState {
    remaining: usize,
    on_release: Option<Box<dyn FnOnce()>>,
}

/// Counted barrier: runs its release callback once `count` arrivals are in
#[derive(Clone)]
pub struct FanIn {
    state: Rc<RefCell<FanInState>>,
}

impl FanIn {
    /// A zero count releases immediately
    pub fn new(count: usize, on_release: impl FnOnce() + 'static) -> Self {
        let latch = Self {
            state: Rc::new(RefCell::new(FanInState {
                remaining: count,
                on_release: Some(Box::new(on_release)),
            })),
        };
        if count == 0 {
            latch.release();
        }
        latch
    }

    /// Record one completion; arrivals after release are ignored
    pub fn arrive(&self) {
        let released = {
            let mut state = self.state.borrow_mut();
            if state.remaining == 0 {
                return;
            }
            state.remaining -= 1;
            state.remaining == 0
        };
        if released {
            self.release();
        }
    }

    #[cfg(test)]
    fn remaining(&self) -> usize {
        self.state.borrow().remaining
    }

    fn release(&self) {
        let callback = self.state.borrow_mut().on_release.take();
        if let Some(callback) = callback {
            callback();
        }
    }
}
