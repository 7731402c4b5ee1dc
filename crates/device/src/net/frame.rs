//! 单帧缓冲区

use core::fmt;

use super::config::FRAME_BUFFER_SIZE;

/// 调用者持有的单帧缓冲区
///
/// 容量固定为 [`FRAME_BUFFER_SIZE`]，满足接收接口对缓冲区大小的要求；
/// `len` 记录其中有效字节的数量。
#[derive(Clone)]
pub struct Frame {
    buf: [u8; FRAME_BUFFER_SIZE],
    len: usize,
}

impl Frame {
    /// 创建空帧
    pub const fn new() -> Self {
        Self {
            buf: [0; FRAME_BUFFER_SIZE],
            len: 0,
        }
    }

    /// 从切片拷贝创建，超过容量时返回 None
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        if data.len() > FRAME_BUFFER_SIZE {
            return None;
        }
        let mut frame = Self::new();
        frame.buf[..data.len()].copy_from_slice(data);
        frame.len = data.len();
        Some(frame)
    }

    /// 有效字节
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// 可写的有效字节
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }

    /// 整个缓冲区（用于接收）
    pub fn as_mut_buffer(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// 有效字节数
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否为空帧
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 设置有效字节数，超出容量的部分被截断
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(FRAME_BUFFER_SIZE);
    }

    /// 缓冲区容量
    pub const fn capacity(&self) -> usize {
        FRAME_BUFFER_SIZE
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame").field("len", &self.len).finish()
    }
}
