use crate::framework::RoutingSystem;
use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub enum Packet<T: RoutingSystem + ?Sized> {
    /// the sender's current best cost to `destination`, INF if unreachable
    RouteAdvertisement {
        destination: T::NodeAddress,
        cost: u16,
    },
    /// sent by a directly attached neighbour to announce its address
    NeighborDiscovery {
        src: T::NodeAddress,
    },
    /// user traffic, forwarded along the best route to `dst`
    Data {
        src: T::NodeAddress,
        dst: T::NodeAddress,
        #[educe(Debug(ignore), PartialEq(ignore))]
        payload: T::Payload,
    },
}

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct OutboundPacket<T: RoutingSystem + ?Sized> {
    /// send out of this port
    pub port: T::Port,
    pub packet: Packet<T>,
}
