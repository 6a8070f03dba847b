use crate::concepts::packet::Packet;
use crate::framework::RoutingSystem;
use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything the substrate can tell a router. Handled strictly one at a time
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub enum Event<T: RoutingSystem + ?Sized> {
    /// the link on `port` came up, or its latency changed
    LinkUp {
        port: T::Port,
        latency: u16,
    },
    LinkDown {
        port: T::Port,
    },
    Receive {
        packet: Packet<T>,
        port: T::Port,
    },
    /// the periodic advertisement timer fired
    TimerFired,
}
