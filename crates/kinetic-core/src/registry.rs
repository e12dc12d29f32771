//! Weak per-target caches.
//!
//! Entries are keyed by the address of the target allocation and validated
//! through a `Weak` handle, so the registry never keeps a target alive. A
//! dead entry is discarded the next time the registry is touched, which also
//! protects against a new target reusing a freed address.
//!
//! Runtime streams opened on behalf of a target are recorded with its entry.
//! When the entry is discarded those tokens move to an orphan list that the
//! runtime drains and disconnects.

use std::any::Any;
use std::rc::{Rc, Weak};

use crate::collections::map::HashMap;
use crate::runtime::StreamToken;

struct TargetEntry {
    target: Weak<dyn Any>,
    properties: HashMap<&'static str, Box<dyn Any>>,
    interactions: Vec<Rc<dyn Any>>,
    streams: Vec<StreamToken>,
}

impl TargetEntry {
    fn new(target: Weak<dyn Any>) -> Self {
        Self {
            target,
            properties: HashMap::default(),
            interactions: Vec::new(),
            streams: Vec::new(),
        }
    }

    fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }
}

#[derive(Default)]
pub(crate) struct TargetRegistry {
    entries: HashMap<usize, TargetEntry>,
    orphaned: Vec<StreamToken>,
}

fn target_key<Target>(target: &Rc<Target>) -> usize {
    Rc::as_ptr(target) as *const () as usize
}

impl TargetRegistry {
    /// Drops entries whose target is gone. Returns how many were removed.
    pub(crate) fn purge(&mut self) -> usize {
        let before = self.entries.len();
        let orphaned = &mut self.orphaned;
        self.entries.retain(|_, entry| {
            if entry.is_alive() {
                return true;
            }
            orphaned.append(&mut entry.streams);
            false
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            log::trace!("registry purged {removed} dead targets");
        }
        removed
    }

    fn entry<Target: 'static>(&mut self, target: &Rc<Target>) -> &mut TargetEntry {
        self.purge();
        let key = target_key(target);
        self.entries.entry(key).or_insert_with(|| {
            let strong: Rc<dyn Any> = target.clone();
            TargetEntry::new(Rc::downgrade(&strong))
        })
    }

    fn existing<Target: 'static>(&self, target: &Rc<Target>) -> Option<&TargetEntry> {
        self.entries
            .get(&target_key(target))
            .filter(|entry| entry.is_alive())
    }

    /// Returns the cached value for `(target, name)` or stores the one built
    /// by `create`. A cached value of a different type is replaced.
    pub(crate) fn property<Target: 'static, P: Clone + 'static>(
        &mut self,
        target: &Rc<Target>,
        name: &'static str,
        create: impl FnOnce() -> P,
    ) -> P {
        let entry = self.entry(target);
        if let Some(cached) = entry
            .properties
            .get(name)
            .and_then(|cached| cached.downcast_ref::<P>())
        {
            return cached.clone();
        }
        if entry.properties.contains_key(name) {
            log::warn!("property `{name}` re-registered with a different value type");
        }
        let property = create();
        entry.properties.insert(name, Box::new(property.clone()));
        property
    }

    pub(crate) fn add_interaction<Target: 'static>(
        &mut self,
        target: &Rc<Target>,
        interaction: Rc<dyn Any>,
    ) {
        self.entry(target).interactions.push(interaction);
    }

    /// Records runtime streams that belong to `target`.
    pub(crate) fn add_streams<Target: 'static>(
        &mut self,
        target: &Rc<Target>,
        tokens: impl IntoIterator<Item = StreamToken>,
    ) {
        self.entry(target).streams.extend(tokens);
    }

    /// Streams of discarded targets that still need disconnecting.
    pub(crate) fn take_orphaned(&mut self) -> Vec<StreamToken> {
        std::mem::take(&mut self.orphaned)
    }

    pub(crate) fn interactions<Target: 'static, I: 'static>(
        &self,
        target: &Rc<Target>,
    ) -> Vec<Rc<I>> {
        self.existing(target)
            .map(|entry| {
                entry
                    .interactions
                    .iter()
                    .filter_map(|interaction| Rc::clone(interaction).downcast::<I>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn interaction_count<Target: 'static>(&self, target: &Rc<Target>) -> usize {
        self.existing(target)
            .map(|entry| entry.interactions.len())
            .unwrap_or(0)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
