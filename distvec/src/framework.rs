use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use cfg_if::cfg_if;
#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub trait RoutingSystem {
    /// Address of a destination on the routing network, MUST be globally unique
    type NodeAddress: Ord + PartialOrd + RootData + RootKey + Debug;
    /// Local endpoint of a point-to-point link. Only meaningful to the node that owns it
    type Port: Copy + Ord + PartialOrd + RootData + RootKey + Debug;
    /// Opaque body of data packets, never inspected by the router
    type Payload: RootData;
    fn config() -> ProtocolParams {
        Default::default()
    }
}

cfg_if! {
    if #[cfg(feature = "serde")] {
        pub trait RootData: Clone + Serialize + DeserializeOwned + Sized {}
        impl<T: Clone + Serialize + DeserializeOwned + Sized> RootData for T {}
    } else {
        pub trait RootData: Clone + Sized {}
        impl<T: Clone + Sized> RootData for T {}
    }
}

pub trait RootKey: Eq + PartialEq + Hash {}
impl<T: Eq + PartialEq + Hash> RootKey for T {}

/// Which ports a destination's cost is advertised out of
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdvertiseMode {
    /// every active port, including the one the best route was learned from.
    /// Permits count-to-infinity on loops of three or more nodes
    #[default]
    Everywhere,
    /// skip the port the best route was learned from
    SplitHorizon,
    /// advertise INF out of the port the best route was learned from
    PoisonReverse,
}

/// How cached candidate costs follow a change in link cost
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CostUpdate {
    /// total = port cost + advertised distance, recomputed from the stored advertisement
    #[default]
    Rederive,
    /// shift the cached total of every candidate on the port by `old_cost - new_cost`.
    /// The advertised distance is not consulted, so totals can drift from ground truth
    Delta,
}

/// Protocol Parameters
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtocolParams {
    /// interval at which the substrate should deliver `TimerFired`
    pub timer_interval: Duration,
    pub advertise: AdvertiseMode,
    pub cost_update: CostUpdate,
}
impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            timer_interval: Duration::from_secs(5),
            advertise: AdvertiseMode::Everywhere,
            cost_update: CostUpdate::Rederive,
        }
    }
}
