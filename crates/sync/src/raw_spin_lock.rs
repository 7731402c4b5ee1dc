//! 原始自旋锁实现
//!
//! 基于原子操作实现自旋锁机制，结合 IntrGuard 实现中断保护，
//! 并作为 `lock_api` 的 [`RawMutex`] 后端。

use crate::intr_guard::IntrGuard;
use core::{
    cell::UnsafeCell,
    hint,
    sync::atomic::{AtomicBool, Ordering},
};
use lock_api::{GuardNoSend, RawMutex};

/// 自旋锁结构体，提供互斥访问临界区的能力。
///
/// 加锁顺序为：先屏蔽本地中断，再自旋获取锁标志，最后把进入前的
/// 中断状态记录在锁内；解锁时按相反顺序恢复。
/// 不可重入 (即不能嵌套获取同一把锁)。
#[derive(Debug)]
pub struct RawSpinLock {
    lock: AtomicBool,
    /// 持锁者进入临界区前的中断状态，只有持锁者会读写
    saved_flags: UnsafeCell<usize>,
}

impl RawSpinLock {
    /// 创建一个新的 RawSpinLock 实例。
    pub const fn new() -> Self {
        RawSpinLock {
            lock: AtomicBool::new(false),
            saved_flags: UnsafeCell::new(0),
        }
    }

    fn acquire(&self, guard: IntrGuard) {
        // SAFETY: 调用者已持有锁标志，saved_flags 由持锁者独占
        unsafe { *self.saved_flags.get() = guard.into_flags() };
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSpinLock::new();

    type GuardMarker = GuardNoSend;

    fn lock(&self) {
        let guard = IntrGuard::new();

        while self
            .lock
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            hint::spin_loop();
        }

        self.acquire(guard);
    }

    fn try_lock(&self) -> bool {
        let guard = IntrGuard::new();

        if self
            .lock
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.acquire(guard);
            true
        } else {
            // guard 在此处 Drop，恢复中断状态
            false
        }
    }

    unsafe fn unlock(&self) {
        // SAFETY: 只有持锁者会调用 unlock
        let flags = unsafe { *self.saved_flags.get() };
        self.lock.store(false, Ordering::Release);
        // SAFETY: flags 来自 acquire 中保存的 IntrGuard 状态
        unsafe { IntrGuard::restore(flags) };
    }

    fn is_locked(&self) -> bool {
        self.lock.load(Ordering::Relaxed)
    }
}

// Safety: saved_flags 只在持有锁标志时访问
unsafe impl Sync for RawSpinLock {}
unsafe impl Send for RawSpinLock {}
