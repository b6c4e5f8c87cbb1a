//! 序号环运算
//!
//! 所有序号都在大小为 N 的环上回绕。窗口成员判断一律写成
//! “从 base 出发的前向距离 < W”，不要对原始序号直接做 `<`/`>` 比较。

use super::packet::Seq;

/// 大小为 N 的序号空间。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqSpace {
    size: u32,
}

impl SeqSpace {
    /// `size` 必须大于 0。
    pub const fn new(size: u32) -> Self {
        assert!(size > 0, "sequence space must not be empty");
        Self { size }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// 把任意整数折回 `[0, N)`。
    pub fn wrap(&self, seq: Seq) -> Seq {
        seq % self.size
    }

    /// 后继序号 `(seq + 1) mod N`。
    pub fn next(&self, seq: Seq) -> Seq {
        self.advance(seq, 1)
    }

    /// `(seq + k) mod N`
    pub fn advance(&self, seq: Seq, k: u32) -> Seq {
        let n = self.size as u64;
        ((self.wrap(seq) as u64 + k as u64 % n) % n) as Seq
    }

    /// `(seq - k) mod N`，结果总是非负。
    pub fn retreat(&self, seq: Seq, k: u32) -> Seq {
        let n = self.size as u64;
        ((self.wrap(seq) as u64 + n - k as u64 % n) % n) as Seq
    }

    /// 从 `from` 沿环向前走到 `to` 的步数，取值 `[0, N)`。
    pub fn distance(&self, from: Seq, to: Seq) -> u32 {
        let n = self.size as u64;
        ((self.wrap(to) as u64 + n - self.wrap(from) as u64) % n) as u32
    }

    /// `seq` 是否落在以 `base` 为起点、宽度为 `window` 的窗口内。
    pub fn in_window(&self, base: Seq, seq: Seq, window: usize) -> bool {
        (self.distance(base, seq) as usize) < window
    }
}
