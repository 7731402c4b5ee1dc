//! 架构相关操作的 Mock 实现
//!
//! `sync` crate 在 `cfg(test)` 下为该类型实现 `ArchOps`。

use core::sync::atomic::{AtomicBool, Ordering};

/// Mock 架构操作，用一个布尔值模拟本地中断使能位
pub struct MockArchOps {
    pub interrupt_state: AtomicBool,
}

impl MockArchOps {
    pub const fn new() -> Self {
        Self {
            interrupt_state: AtomicBool::new(true),
        }
    }

    pub unsafe fn read_and_disable_interrupts(&self) -> usize {
        self.interrupt_state.swap(false, Ordering::SeqCst) as usize
    }

    pub unsafe fn restore_interrupts(&self, flags: usize) {
        self.interrupt_state.store(flags != 0, Ordering::SeqCst);
    }

    pub fn interrupts_enabled(&self, flags: usize) -> bool {
        flags != 0
    }

    /// 当前是否处于中断使能状态
    pub fn interrupts_on(&self) -> bool {
        self.interrupt_state.load(Ordering::SeqCst)
    }
}

/// 全局 Mock 实例
pub static MOCK_ARCH_OPS: MockArchOps = MockArchOps::new();
