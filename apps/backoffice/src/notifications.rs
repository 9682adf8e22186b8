//! # Notifications
//!
//! In-process broadcast of back-office events to whoever is listening (the
//! toast area of the web client, tests).
//!
//! ```text
//! ┌──────────────────┐   publish()    ┌────────────────────┐
//! │ SaleCoordinator  │ ─────────────▶ │ broadcast::Sender  │ ──▶ subscriber 1
//! └──────────────────┘  never blocks  │  (capacity 256)    │ ──▶ subscriber 2
//!                       never fails   └────────────────────┘
//! ```
//!
//! A slow subscriber that falls more than the channel capacity behind loses
//! the oldest events (`RecvError::Lagged`); the publisher is unaffected.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use bizdesk_core::LowStockWarning;

/// Events buffered per subscriber before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 256;

/// An event raised by a back-office operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    /// A sale left a product below the low-stock threshold.
    LowStock(LowStockWarning),

    /// A sale was recorded.
    #[serde(rename_all = "camelCase")]
    SaleRecorded {
        sale_id: String,
        product_name: String,
        total_value_cents: i64,
    },
}

/// Broadcast hub for [`Notification`]s.
///
/// Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct Notifications {
    sender: broadcast::Sender<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Notifications { sender }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// With no subscribers the event is only logged.
    pub fn publish(&self, notification: Notification) {
        if let Notification::LowStock(warning) = &notification {
            warn!(
                product_id = %warning.product_id,
                remaining = warning.remaining,
                "{}", warning
            );
        }

        match self.sender.send(notification) {
            Ok(receivers) => debug!(receivers, "Notification published"),
            Err(_) => debug!("Notification published with no subscribers"),
        }
    }

    /// Subscribes to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}
