//! Observable container for the current todo list.
//!
//! The store is the single source of truth for the list. Writes replace the
//! whole list and synchronously notify every subscriber, in registration
//! order, before `set_list` returns.

use crate::types::Todo;

/// Handle returned by [`TodoStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&[Todo])>;

#[derive(Default)]
pub struct TodoStore {
    todos: Vec<Todo>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Todo] {
        &self.todos
    }

    pub fn set_list(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.todos);
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&[Todo]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("todos", &self.todos)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
