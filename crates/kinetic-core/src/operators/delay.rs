use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::collections::map::HashMap;
use crate::frame_clock::{FrameCallbackRegistration, FrameClock};
use crate::observable::{Observable, Observer};
use crate::operation::Operation;

struct DelayShared {
    clock: FrameClock,
    delay_nanos: u64,
    pending: RefCell<HashMap<u64, FrameCallbackRegistration>>,
    next_id: Cell<u64>,
    connected: Cell<bool>,
}

/// Defers each value until `delay_nanos` after the frame it arrived in.
///
/// Pending deliveries are cancelled when the subscription disconnects. The
/// state channel is not delayed.
pub struct Delay {
    shared: Rc<DelayShared>,
}

impl Delay {
    pub fn new(clock: FrameClock, delay_nanos: u64) -> Self {
        Self {
            shared: Rc::new(DelayShared {
                clock,
                delay_nanos,
                pending: RefCell::new(HashMap::default()),
                next_id: Cell::new(0),
                connected: Cell::new(false),
            }),
        }
    }

    pub fn pending(&self) -> usize {
        self.shared.pending.borrow().len()
    }
}

fn schedule<T: 'static>(
    shared: &Rc<DelayShared>,
    id: u64,
    deadline: u64,
    observer: Observer<T>,
    value: T,
) {
    let weak = Rc::downgrade(shared);
    let registration = shared.clock.with_frame_nanos(move |time| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let fired = shared.pending.borrow_mut().remove(&id);
        drop(fired);
        if !shared.connected.get() {
            return;
        }
        if time >= deadline {
            observer.next(value);
        } else {
            schedule(&shared, id, deadline, observer, value);
        }
    });
    shared.pending.borrow_mut().insert(id, registration);
}

impl<T: 'static> Operation<T, T> for Delay {
    fn pre_connect(&self, _observer: &Observer<T>) {
        self.shared.connected.set(true);
    }

    fn next(&self, observer: &Observer<T>, value: T) {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        let now = self.shared.clock.frame_time_nanos().unwrap_or(0);
        let deadline = now.saturating_add(self.shared.delay_nanos);
        schedule(&self.shared, id, deadline, observer.clone(), value);
    }

    fn pre_disconnect(&self, _observer: &Observer<T>) {
        self.shared.connected.set(false);
        let pending = std::mem::take(&mut *self.shared.pending.borrow_mut());
        if !pending.is_empty() {
            log::trace!("delay cancelling {} pending deliveries", pending.len());
        }
        drop(pending);
    }
}

impl<T: 'static> Observable<T> {
    pub fn delay(&self, clock: &FrameClock, delay_nanos: u64) -> Observable<T> {
        let clock = clock.clone();
        self.compose(move || Delay::new(clock.clone(), delay_nanos))
    }
}
