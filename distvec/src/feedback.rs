use educe::Educe;
use thiserror::Error;
use crate::framework::RoutingSystem;

/// Per-event failures. The router state stays consistent when one is returned,
/// the offending event is simply dropped.
#[derive(Error)]
#[derive(Educe)]
#[educe(Debug(bound()), Clone(bound()), PartialEq(bound()))]
pub enum RoutingError<T: RoutingSystem + ?Sized> {
    /// An advertisement or discovery referenced a port with no registered cost.
    /// Usually a malformed advertisement on a port never seen via link-up
    #[error("No link cost registered for port {port:?}")]
    UnknownPort {
        port: T::Port
    },
    /// There is no usable route to the destination, the packet is dropped
    #[error("No route to {dest:?}")]
    RouteNotFound {
        dest: T::NodeAddress
    },
}
