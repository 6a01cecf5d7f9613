//! # Reactive cells
//! Local state lives in single-threaded reactive cells. A cell is mutated only
//! through [`Atom::update`], which takes the previous value by move and stores
//! whatever the closure returns; state types describe their transitions as
//! pure reducers via [`Reduce`]. That keeps read-modify-write patterns (like
//! filtering the snippet set) free of stale-closure races even when a handler
//! re-enters.
//!
//! Listeners are never invoked while the cell is borrowed:
//! [`Atom::drain_due_notifications`] hands back thunks to run after every
//! borrow is released, and `Session` flushes them on the way out of each
//! mutating entry point.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::SlotMap;

/// Handle for a registered listener.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ListenerKey(slotmap::DefaultKey);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DirtyState {
    Clean,
    Dirty,
}

/// A state type whose transitions are a pure function of (previous state,
/// event) -> next state.
pub trait Reduce: Sized {
    type Event;

    fn apply(self, event: &Self::Event) -> Self;
}

struct AtomInner<T> {
    // Option so `update` can take the value by move; None only within update
    value: Option<T>,
    listeners: SlotMap<slotmap::DefaultKey, Rc<dyn Fn()>>,
    dirty: DirtyState,
}

pub struct Atom<T> {
    inner: RefCell<AtomInner<T>>,
}

impl<T> Atom<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RefCell::new(AtomInner {
                value: Some(value),
                listeners: SlotMap::default(),
                dirty: DirtyState::Clean,
            }),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let inner = self.inner.borrow();
        f(inner.value.as_ref().expect("cell holds a value outside update"))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Replace the value with `f(previous)` and mark the cell dirty.
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        let mut inner = self.inner.borrow_mut();
        let previous = inner.value.take().expect("cell holds a value outside update");
        inner.value = Some(f(previous));
        inner.dirty = DirtyState::Dirty;
    }

    /// Run `event` through the state's reducer.
    pub fn dispatch(&self, event: &T::Event)
    where
        T: Reduce,
    {
        self.update(|state| state.apply(event));
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> ListenerKey {
        let key = self
            .inner
            .borrow_mut()
            .listeners
            .insert(Rc::new(listener));
        ListenerKey(key)
    }

    pub fn unsubscribe(&self, key: ListenerKey) {
        self.inner.borrow_mut().listeners.remove(key.0);
    }

    /// If the cell is dirty, clear the flag and return one thunk per listener.
    /// The thunks must be run with no borrow of the cell held; many listeners
    /// call straight back into code that borrows it again.
    pub fn drain_due_notifications(&self) -> Vec<Box<dyn FnOnce()>> {
        let mut inner = self.inner.borrow_mut();
        if inner.dirty == DirtyState::Clean {
            return Vec::new();
        }
        inner.dirty = DirtyState::Clean;
        inner
            .listeners
            .values()
            .map(|listener| {
                let listener = listener.clone();
                Box::new(move || listener()) as Box<dyn FnOnce()>
            })
            .collect()
    }
}
