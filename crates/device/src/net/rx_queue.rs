//! 接收帧移交队列
//!
//! 驱动的中断处理程序把 DMA 完成的帧拷贝进队列，轮询路径以非阻塞方式取出。
//! 队列容量固定，满时新到的帧被丢弃并计数，中断上下文永远不会等待。

use alloc::collections::VecDeque;
use core::sync::atomic::{AtomicUsize, Ordering};
use sync::SpinLock;

use super::config::FRAME_BUFFER_SIZE;
use super::frame::Frame;
use super::net_device::NetDeviceError;

/// 有界的接收帧 FIFO
pub struct RxFrameQueue {
    frames: SpinLock<VecDeque<Frame>>,
    capacity: usize,
    dropped: AtomicUsize,
}

impl RxFrameQueue {
    /// 创建容量为 `capacity` 帧的队列
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: SpinLock::new(VecDeque::with_capacity(capacity)),
            capacity,
            dropped: AtomicUsize::new(0),
        }
    }

    /// 入队一帧（中断侧）
    ///
    /// 队列满时丢弃该帧并返回 [`NetDeviceError::QueueFull`]
    pub fn push(&self, data: &[u8]) -> Result<(), NetDeviceError> {
        let frame = Frame::from_slice(data).ok_or(NetDeviceError::FrameTooLarge)?;
        let mut frames = self.frames.lock();
        if frames.len() >= self.capacity {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(NetDeviceError::QueueFull);
        }
        frames.push_back(frame);
        Ok(())
    }

    /// 取出最早的一帧拷贝到 `buf`（轮询侧）
    ///
    /// `buf` 小于 [`FRAME_BUFFER_SIZE`] 时返回 [`NetDeviceError::BufferTooSmall`]，
    /// 帧保留在队列中。
    pub fn pop_into(&self, buf: &mut [u8]) -> Result<Option<usize>, NetDeviceError> {
        if buf.len() < FRAME_BUFFER_SIZE {
            return Err(NetDeviceError::BufferTooSmall);
        }
        let Some(frame) = self.frames.lock().pop_front() else {
            return Ok(None);
        };
        let len = frame.len();
        buf[..len].copy_from_slice(frame.as_slice());
        Ok(Some(len))
    }

    /// 队列中的帧数
    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    /// 队列是否为空
    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }

    /// 队列是否已满
    pub fn is_full(&self) -> bool {
        self.frames.lock().len() >= self.capacity
    }

    /// 队列容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 因队列满而丢弃的帧数
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}
