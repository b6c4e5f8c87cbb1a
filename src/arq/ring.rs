//! 窗口环形缓冲
//!
//! 按“相对 base 的偏移”寻址的定长缓冲，取模运算只在这里出现。发送端用它保存
//! 未确认的包，接收端用它保存已接收未交付的包。

/// 以窗口 base 为起点的环形槽位。
#[derive(Debug, Clone)]
pub struct Ring<T> {
    slots: Vec<Option<T>>,
    head: usize,
}

impl<T> Ring<T> {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, head: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn index(&self, offset: usize) -> usize {
        assert!(
            offset < self.slots.len(),
            "offset {offset} outside window of {}",
            self.slots.len()
        );
        (self.head + offset) % self.slots.len()
    }

    /// 放入 `offset` 处；返回原来占据该槽位的元素。
    pub fn put(&mut self, offset: usize, item: T) -> Option<T> {
        let i = self.index(offset);
        self.slots[i].replace(item)
    }

    pub fn get(&self, offset: usize) -> Option<&T> {
        self.slots[self.index(offset)].as_ref()
    }

    pub fn get_mut(&mut self, offset: usize) -> Option<&mut T> {
        let i = self.index(offset);
        self.slots[i].as_mut()
    }

    pub fn is_occupied(&self, offset: usize) -> bool {
        self.get(offset).is_some()
    }

    pub fn take(&mut self, offset: usize) -> Option<T> {
        let i = self.index(offset);
        self.slots[i].take()
    }

    /// base 前移一格，返回（并清空）原 base 槽位的内容。
    pub fn advance_base(&mut self) -> Option<T> {
        if self.slots.is_empty() {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        item
    }

    /// 仅当 base 槽位被占用时才出队并前移。
    pub fn pop_front(&mut self) -> Option<T> {
        if self.slots.is_empty() || self.slots[self.head].is_none() {
            return None;
        }
        self.advance_base()
    }

    /// 按偏移顺序遍历被占用的槽位。
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        (0..self.slots.len()).filter_map(move |off| self.get(off).map(|item| (off, item)))
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.head = 0;
    }
}
