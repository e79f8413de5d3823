//! Collaborators the store talks to without owning: origin-address
//! resolution and event listeners.

use crate::core::messages::Message;
use crate::core::settings::Settings;
use crate::core::visitors::VisitDay;
use rand::seq::SliceRandom;

/// Recorded when no origin address could be resolved.
pub const UNKNOWN_ADDRESS: &str = "Unknown";

/// Addresses handed out by [`SimulatedResolver`].
pub const SIMULATED_ADDRESSES: [&str; 4] = [
    "192.168.1.101",
    "10.0.0.55",
    "172.16.254.1",
    "203.0.113.195",
];

/// Best-effort source of an origin address for new messages and visits.
pub trait AddressResolver: Send + Sync {
    /// Resolve an address, or `None` if nothing is known.
    fn resolve(&self) -> Option<String>;
}

/// Picks one of [`SIMULATED_ADDRESSES`] at random. Not authoritative.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedResolver;

impl AddressResolver for SimulatedResolver {
    fn resolve(&self) -> Option<String> {
        SIMULATED_ADDRESSES
            .choose(&mut rand::thread_rng())
            .map(|address| (*address).to_string())
    }
}

/// Always resolves to the same value.
#[derive(Debug, Clone, Default)]
pub struct FixedResolver(pub Option<String>);

impl AddressResolver for FixedResolver {
    fn resolve(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Something that happened to the store.
#[derive(Debug, Clone, Copy)]
pub enum StoreEvent<'a> {
    /// A message was persisted.
    MessageAdded {
        /// The stored message.
        message: &'a Message,
        /// Settings at the time of the add.
        settings: &'a Settings,
    },

    /// A visit was recorded.
    VisitRecorded {
        /// The day bucket the visit landed in.
        day: &'a VisitDay,
    },
}

/// Subscriber to store events.
pub trait EventListener: Send + Sync {
    /// Called after the mutation has been persisted.
    fn on_event(&self, event: &StoreEvent<'_>);
}

/// Delivery channel for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    fn notify(&self, title: &str, body: &str);
}

/// Delivers notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, body: &str) {
        tracing::info!(title, body, "notification");
    }
}

/// Turns new messages into notifications when the `notifications`
/// setting is on.
#[derive(Debug, Clone, Default)]
pub struct NotificationListener<N> {
    notifier: N,
}

impl<N: Notifier> NotificationListener<N> {
    /// Wrap a notifier.
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

impl<N: Notifier> EventListener for NotificationListener<N> {
    fn on_event(&self, event: &StoreEvent<'_>) {
        if let StoreEvent::MessageAdded { message, settings } = event {
            if settings.notifications() {
                self.notifier
                    .notify("New Message", &format!("{} sent you a message", message.name));
            }
        }
    }
}
