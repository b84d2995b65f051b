//! In-process publish/subscribe with a last-value cache per topic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::event::{CheckoutEvent, Topic};

/// Receives events for the topics it was subscribed to.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &CheckoutEvent);
}

/// Identifies a subscription so that it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Options for a subscription.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribeOptions {
    /// Replay the topic's last event to the handler at subscribe time.
    pub eager: bool,
}

impl SubscribeOptions {
    /// Plain delivery: only events published after subscribing.
    pub fn lazy() -> Self {
        Self { eager: false }
    }

    /// Last-value replay followed by normal delivery.
    pub fn eager() -> Self {
        Self { eager: true }
    }
}

struct Subscriber {
    id: SubscriptionId,
    topic: Topic,
    handler: Arc<dyn EventHandler>,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    last: HashMap<Topic, CheckoutEvent>,
}

/// Topic-keyed event bus.
///
/// Cloning is cheap and every clone shares the same subscribers and cache.
/// The internal lock is never held while a handler runs, so handlers may
/// publish or subscribe re-entrantly.
#[derive(Clone, Default)]
pub struct EventBus {
    state: Arc<Mutex<BusState>>,
}

impl EventBus {
    /// Creates a bus with no subscribers and an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a handler to a topic.
    ///
    /// With [`SubscribeOptions::eager`], the last event seen on the topic (if
    /// any) is delivered to this handler before the call returns.
    pub async fn subscribe(
        &self,
        topic: Topic,
        handler: Arc<dyn EventHandler>,
        options: SubscribeOptions,
    ) -> SubscriptionId {
        let (id, replay) = {
            let mut state = self.state.lock();
            state.next_id += 1;
            let id = SubscriptionId(state.next_id);
            state.subscribers.push(Subscriber {
                id,
                topic,
                handler: handler.clone(),
            });
            let replay = if options.eager {
                state.last.get(&topic).cloned()
            } else {
                None
            };
            (id, replay)
        };

        if let Some(event) = replay {
            tracing::debug!(%topic, "replaying last event to eager subscriber");
            handler.handle(&event).await;
        }

        id
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|subscriber| subscriber.id != id);
        state.subscribers.len() != before
    }

    /// Publishes an event, caching it as the topic's last value and awaiting
    /// each subscriber in subscription order.
    pub async fn publish(&self, event: CheckoutEvent) {
        let topic = event.topic();
        let handlers: Vec<Arc<dyn EventHandler>> = {
            let mut state = self.state.lock();
            state.last.insert(topic, event.clone());
            state
                .subscribers
                .iter()
                .filter(|subscriber| subscriber.topic == topic)
                .map(|subscriber| subscriber.handler.clone())
                .collect()
        };

        metrics::counter!("checkout_events_published_total", "topic" => topic.as_str())
            .increment(1);
        tracing::trace!(%topic, subscribers = handlers.len(), "publishing event");

        for handler in handlers {
            handler.handle(&event).await;
        }
    }

    /// Returns the last event published on a topic.
    pub fn last(&self, topic: Topic) -> Option<CheckoutEvent> {
        self.state.lock().last.get(&topic).cloned()
    }

    /// Returns the number of live subscriptions on a topic.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.state
            .lock()
            .subscribers
            .iter()
            .filter(|subscriber| subscriber.topic == topic)
            .count()
    }
}
