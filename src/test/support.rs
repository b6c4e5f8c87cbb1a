use crate::arq::{ArqConfig, ArqEnv, EndpointId, PAYLOAD_LEN, Packet, Payload};
use crate::sim::SimTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    Start(EndpointId, SimTime),
    Stop(EndpointId),
}

/// 记录所有副作用的环境；定时器误用直接 panic。
#[derive(Debug, Default)]
pub struct RecordingEnv {
    pub wire: Vec<(EndpointId, Packet)>,
    pub delivered: Vec<Payload>,
    pub timer_ops: Vec<TimerOp>,
    pub timer_running: bool,
}

impl RecordingEnv {
    /// 模拟定时器到期：定时器随即变为空闲
    pub fn fire_timer(&mut self) {
        self.timer_running = false;
    }

    pub fn take_wire(&mut self) -> Vec<Packet> {
        self.wire.drain(..).map(|(_, pkt)| pkt).collect()
    }

    pub fn wire_seqs(&self) -> Vec<u32> {
        self.wire.iter().map(|(_, pkt)| pkt.seqnum).collect()
    }

    pub fn acknums(&self) -> Vec<Option<u32>> {
        self.wire.iter().map(|(_, pkt)| pkt.acknum).collect()
    }
}

impl ArqEnv for RecordingEnv {
    fn send_on_wire(&mut self, from: EndpointId, pkt: Packet) {
        self.wire.push((from, pkt));
    }

    fn deliver(&mut self, _at: EndpointId, payload: Payload) {
        self.delivered.push(payload);
    }

    fn start_timer(&mut self, ep: EndpointId, duration: SimTime) {
        assert!(!self.timer_running, "timer started while running");
        self.timer_running = true;
        self.timer_ops.push(TimerOp::Start(ep, duration));
    }

    fn stop_timer(&mut self, ep: EndpointId) {
        assert!(self.timer_running, "timer stopped while idle");
        self.timer_running = false;
        self.timer_ops.push(TimerOp::Stop(ep));
    }
}

pub fn msg(tag: u8) -> Payload {
    [tag; PAYLOAD_LEN]
}

pub fn cfg() -> ArqConfig {
    ArqConfig::default()
}

/// 接收端为 `seq` 回的 ACK
pub fn ack_for(seq: u32) -> Packet {
    Packet::ack(0, seq)
}
