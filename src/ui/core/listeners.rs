//! Subscriber lists for notifications that carry mutable (cancelable) arguments.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct Listeners<A> {
    next: u64,
    items: Vec<(ListenerId, Box<dyn FnMut(&mut A)>)>,
}

impl<A> Default for Listeners<A> {
    fn default() -> Self {
        Self {
            next: 0,
            items: Vec::new(),
        }
    }
}

impl<A> Listeners<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, f: impl FnMut(&mut A) + 'static) -> ListenerId {
        let id = ListenerId(self.next);
        self.next = self.next.wrapping_add(1);
        self.items.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.items.len();
        self.items.retain(|(item, _)| *item != id);
        self.items.len() != before
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Calls every subscriber in registration order. Each one sees the edits of the previous.
    pub fn emit(&mut self, args: &mut A) {
        for (_, f) in &mut self.items {
            f(args);
        }
    }
}

impl<A> fmt::Debug for Listeners<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.items.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/listeners.rs"]
mod tests;
