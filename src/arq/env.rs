//! Boundary between the protocol core and its environment.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::packet::{Packet, Payload};
use crate::sim::SimTime;

/// Endpoint identity: `A` originates data, `B` only acknowledges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndpointId {
    A,
    B,
}

impl EndpointId {
    /// The endpoint on the other side of the channel.
    pub fn peer(self) -> EndpointId {
        match self {
            EndpointId::A => EndpointId::B,
            EndpointId::B => EndpointId::A,
        }
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointId::A => f.write_str("A"),
            EndpointId::B => f.write_str("B"),
        }
    }
}

/// Side effects a protocol handler may request.
///
/// All calls are fire-and-forget. Each endpoint owns at most one timer:
/// `start_timer` on a running timer or `stop_timer` on an idle one is a
/// programming error, and the endpoints track their timer state so they never
/// issue either.
pub trait ArqEnv {
    fn send_on_wire(&mut self, from: EndpointId, pkt: Packet);
    fn deliver(&mut self, at: EndpointId, payload: Payload);
    fn start_timer(&mut self, ep: EndpointId, duration: SimTime);
    fn stop_timer(&mut self, ep: EndpointId);
}
