//! 信道统计信息

use serde::Serialize;

use crate::arq::EndpointId;

/// 单个方向的计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectionStats {
    pub offered: u64,
    pub lost: u64,
    pub corrupted: u64,
}

/// 信道统计信息（按发送方区分方向）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub a_to_b: DirectionStats,
    pub b_to_a: DirectionStats,
}

impl ChannelStats {
    pub fn from_side(&self, from: EndpointId) -> &DirectionStats {
        match from {
            EndpointId::A => &self.a_to_b,
            EndpointId::B => &self.b_to_a,
        }
    }

    pub(crate) fn from_side_mut(&mut self, from: EndpointId) -> &mut DirectionStats {
        match from {
            EndpointId::A => &mut self.a_to_b,
            EndpointId::B => &mut self.b_to_a,
        }
    }
}
