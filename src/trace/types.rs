use serde::{Deserialize, Serialize};

use crate::arq::{EndpointId, Seq};

/// 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// 新数据包首次发出
    SendData { seq: Seq, message: u64 },
    /// 超时后重传 base 处的包
    Retransmit { seq: Seq },
    /// 定时器到期时窗口为空（过期定时器）
    StaleTimeout,
    /// 窗口已满，消息稍后重试
    WindowFull { message: u64 },
    /// 接收端发出 ACK
    SendAck { ack: Seq, ack_seq: Seq },
    /// 发送端收到新 ACK
    RecvAck { ack: Seq, slid: usize },
    /// 发送端收到重复或窗口外的 ACK
    DupAck { ack: Option<Seq> },
    /// 校验失败被丢弃（在收到它的一端）
    CorruptDrop,
    /// 接收端缓存了窗口内的包
    Accept { seq: Seq, duplicate: bool },
    /// 接收端收到窗口外的包（只回 ACK）
    OutOfWindow { seq: Seq },
    /// 按序交付给应用层
    Deliver { message: u64 },
    /// 信道丢包
    Lost { seq: Seq, ack: Option<Seq> },
    /// 信道损坏了包（仍会送达）
    Corrupted { seq: Seq, ack: Option<Seq> },
}

/// 一条可回放的事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// 仿真时间（刻度，和 `SimTime.0` 同口径）
    pub t: u64,
    /// 事件发生所在的一端
    pub endpoint: EndpointId,
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

/// 一个简单的事件收集器（存内存，仿真结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct TraceLogger {
    pub events: Vec<TraceEvent>,
}

impl TraceLogger {
    pub fn push(&mut self, ev: TraceEvent) {
        self.events.push(ev);
    }

    /// 某类事件的数量
    pub fn count(&self, pred: impl Fn(&TraceEventKind) -> bool) -> usize {
        self.events.iter().filter(|ev| pred(&ev.kind)).count()
    }
}
