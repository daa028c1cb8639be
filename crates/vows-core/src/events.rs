//! Planner change notifications.
//!
//! Every mutation of a planner publishes a [`PlannerEvent`] so that
//! dependent views (open in other tabs, or refreshed after a scribe
//! edit) know to refetch.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlannerEventKind {
    #[serde(rename_all = "camelCase")]
    PageCreated { page_id: Uuid },
    #[serde(rename_all = "camelCase")]
    PageUpdated { page_id: Uuid },
    #[serde(rename_all = "camelCase")]
    PageDeleted { page_id: Uuid },
    PagesReordered,
    /// Bulk change (e.g. made by the scribe); refetch everything.
    DataChanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerEvent {
    pub tenant_id: Uuid,
    #[serde(flatten)]
    pub kind: PlannerEventKind,
}

/// Fan-out of planner events to any number of subscribers.
///
/// Backed by a bounded broadcast channel; a subscriber that falls more
/// than `capacity` events behind skips the missed ones.
#[derive(Debug, Clone)]
pub struct PlannerEventBus {
    tx: broadcast::Sender<PlannerEvent>,
}

impl PlannerEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, tenant_id: Uuid, kind: PlannerEventKind) {
        let event = PlannerEvent { tenant_id, kind };
        // No subscribers is not an error.
        if self.tx.send(event).is_err() {
            debug!(%tenant_id, "planner event dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlannerEvent> {
        self.tx.subscribe()
    }
}

impl Default for PlannerEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = PlannerEventBus::new(8);
        let mut rx = bus.subscribe();
        let tenant_id = Uuid::new_v4();

        bus.publish(tenant_id, PlannerEventKind::DataChanged);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.tenant_id, tenant_id);
        assert_eq!(event.kind, PlannerEventKind::DataChanged);
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        PlannerEventBus::default().publish(Uuid::new_v4(), PlannerEventKind::PagesReordered);
    }

    #[test]
    fn event_serializes_flat() {
        let page_id = Uuid::nil();
        let event = PlannerEvent {
            tenant_id: Uuid::nil(),
            kind: PlannerEventKind::PageUpdated { page_id },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "pageUpdated");
        assert_eq!(json["pageId"], page_id.to_string());
    }
}
