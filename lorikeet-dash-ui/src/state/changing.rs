//! Layout Change Tracking
//!
//! While tiles are being resized or the viewport width changes, charts hide
//! their images so the backend isn't asked for every intermediate size. The
//! flag clears once no change event has arrived for the settle delay and no
//! drag is holding it.

use gloo_timers::callback::Timeout;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Quiet period after the last change event before charts render again
pub const SETTLE_DELAY_MS: u32 = 50;

/// Trailing debounce of change events.
///
/// Every [`trigger`](Self::trigger) hands out a new generation; only a
/// settle for the latest generation clears the flag, so a timer armed before
/// a later event can never end the burst early. While a hold is open (a tile
/// drag in progress) no settle clears the flag, however long the pointer
/// rests.
#[derive(Debug, Default, Clone)]
pub struct SettleDebounce {
    changing: bool,
    generation: u64,
    holds: u32,
}

/// Result of recording a change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Armed {
    /// Generation the settle timer must present
    pub generation: u64,
    /// True if this event started a new burst
    pub started: bool,
}

impl SettleDebounce {
    pub fn is_changing(&self) -> bool {
        self.changing
    }

    /// Record a change event
    pub fn trigger(&mut self) -> Armed {
        let started = !self.changing;
        self.changing = true;
        self.generation += 1;

        Armed {
            generation: self.generation,
            started,
        }
    }

    /// Start a hold: the flag is set and stays set until [`release`](Self::release)
    pub fn hold(&mut self) -> bool {
        let started = !self.changing;
        self.changing = true;
        self.holds += 1;
        self.cancel();
        started
    }

    /// End a hold; the returned generation arms the final settle
    pub fn release(&mut self) -> Armed {
        self.holds = self.holds.saturating_sub(1);
        self.trigger()
    }

    pub fn is_held(&self) -> bool {
        self.holds > 0
    }

    /// Settle timer fired; returns true if the burst is over
    pub fn settle(&mut self, generation: u64) -> bool {
        if self.changing && self.holds == 0 && generation == self.generation {
            self.changing = false;
            true
        } else {
            false
        }
    }

    /// Invalidate any armed timer without ending the burst
    pub fn cancel(&mut self) {
        self.generation += 1;
    }
}

/// Reactive `is_changing` flag driven by a re-armable settle timer.
///
/// The pending timer is owned by the tracker and dropped (cancelled) when
/// the reactive owner that created it is cleaned up.
#[derive(Clone)]
pub struct ChangeTracker {
    changing: RwSignal<bool>,
    debounce: Rc<RefCell<SettleDebounce>>,
    timer: Rc<RefCell<Option<Timeout>>>,
    delay_ms: u32,
}

impl ChangeTracker {
    pub fn new(delay_ms: u32) -> Self {
        let tracker = Self {
            changing: create_rw_signal(false),
            debounce: Rc::new(RefCell::new(SettleDebounce::default())),
            timer: Rc::new(RefCell::new(None)),
            delay_ms,
        };

        let debounce = Rc::clone(&tracker.debounce);
        let timer = Rc::clone(&tracker.timer);
        on_cleanup(move || {
            debounce.borrow_mut().cancel();
            timer.borrow_mut().take();
        });

        tracker
    }

    /// Read side of the flag, for children
    pub fn changing(&self) -> Signal<bool> {
        self.changing.into()
    }

    /// A resize or width-change happened
    pub fn notify(&self) {
        let armed = self.debounce.borrow_mut().trigger();
        if armed.started {
            self.changing.try_set(true);
        }
        self.arm(armed.generation);
    }

    /// Resize-start: hold the flag for the whole drag
    pub fn hold(&self) {
        let started = self.debounce.borrow_mut().hold();
        if started {
            self.changing.try_set(true);
        }
        self.timer.borrow_mut().take();
    }

    /// Resize-stop: the flag clears once the settle delay passes quietly
    pub fn release(&self) {
        let armed = self.debounce.borrow_mut().release();
        self.arm(armed.generation);
    }

    fn arm(&self, generation: u64) {
        let changing = self.changing;
        let debounce = Rc::clone(&self.debounce);
        let timeout = Timeout::new(self.delay_ms, move || {
            let settled = debounce.borrow_mut().settle(generation);
            if settled {
                changing.try_set(false);
            }
        });

        // Replacing the handle drops the previous timer, which cancels it.
        self.timer.borrow_mut().replace(timeout);
    }
}
