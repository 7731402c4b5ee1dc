//! 同步原语
//!
//! 向网络设备层提供中断安全的自旋锁：
//!
//! - [`IntrGuard`] - 基于 RAII 的本地中断屏蔽
//! - [`RawSpinLock`] - 实现了 [`lock_api::RawMutex`] 的原始自旋锁，持锁期间屏蔽本地中断
//! - [`SpinLock`] / [`SpinLockGuard`] - 基于 `lock_api` 的数据锁
//!
//! 设备驱动的中断处理程序与轮询路径共享收发环时，必须通过 [`SpinLock`] 访问，
//! 这样持锁期间本地中断不会打断临界区。
//!
//! # 架构依赖
//!
//! 此 crate 通过 [`ArchOps`] trait 抽象架构相关操作。
//! 使用前必须调用 [`register_arch_ops`] 注册实现。

#![no_std]

mod intr_guard;
mod raw_spin_lock;

pub use intr_guard::IntrGuard;
pub use raw_spin_lock::RawSpinLock;

use core::sync::atomic::{AtomicUsize, Ordering};

/// 提供对数据互斥访问的自旋锁
///
/// 不可重入；持锁期间本地中断处于屏蔽状态，应避免长时间持有。
///
/// # 示例
/// ```ignore
/// let lock = SpinLock::new(0);
/// {
///     let mut guard = lock.lock(); // 获取锁，屏蔽中断
///     *guard += 1;
/// } // 离开作用域，释放锁并恢复中断状态
/// ```
pub type SpinLock<T> = lock_api::Mutex<RawSpinLock, T>;

/// [`SpinLock`] 的 RAII 保护器
pub type SpinLockGuard<'a, T> = lock_api::MutexGuard<'a, RawSpinLock, T>;

/// 架构相关操作的 trait
///
/// 由宿主内核实现并注册，提供本地中断控制
pub trait ArchOps: Send + Sync {
    /// 读取并禁用中断，返回之前的状态
    ///
    /// # Safety
    /// 调用者必须确保在适当的上下文中调用
    unsafe fn read_and_disable_interrupts(&self) -> usize;

    /// 恢复中断状态
    ///
    /// # Safety
    /// flags 必须是之前 read_and_disable_interrupts 返回的值
    unsafe fn restore_interrupts(&self, flags: usize);

    /// 判断 flags 所记录的状态中中断是否处于启用状态
    fn interrupts_enabled(&self, flags: usize) -> bool;
}

/// 全局架构操作实例（存储 fat pointer 的两个部分）
static ARCH_OPS_DATA: AtomicUsize = AtomicUsize::new(0);
static ARCH_OPS_VTABLE: AtomicUsize = AtomicUsize::new(0);

/// 注册架构操作实现
///
/// # Safety
/// 必须在单线程环境下调用，且只能调用一次
pub unsafe fn register_arch_ops(ops: &'static dyn ArchOps) {
    let ptr = ops as *const dyn ArchOps;
    // SAFETY: fat pointer 的布局是 (data, vtable)
    let (data, vtable) = unsafe { core::mem::transmute::<*const dyn ArchOps, (usize, usize)>(ptr) };
    ARCH_OPS_DATA.store(data, Ordering::Release);
    ARCH_OPS_VTABLE.store(vtable, Ordering::Release);
}

/// 是否已经注册了架构操作实现
pub fn arch_ops_registered() -> bool {
    ARCH_OPS_DATA.load(Ordering::Acquire) != 0
}

/// 获取架构操作实例
#[inline]
pub(crate) fn arch_ops() -> &'static dyn ArchOps {
    let data = ARCH_OPS_DATA.load(Ordering::Acquire);
    let vtable = ARCH_OPS_VTABLE.load(Ordering::Acquire);
    if data == 0 {
        #[cfg(test)]
        {
            extern crate test_support;
            return &test_support::mock::arch::MOCK_ARCH_OPS;
        }
        #[cfg(not(test))]
        panic!("sync: ArchOps not registered, call register_arch_ops first");
    }
    // SAFETY: data 和 vtable 是通过 register_arch_ops 设置的有效指针
    unsafe { &*core::mem::transmute::<(usize, usize), *const dyn ArchOps>((data, vtable)) }
}


#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::sync::Mutex;
    use test_support::mock::arch::MOCK_ARCH_OPS;

    // 所有用例共享同一个 Mock 中断状态，需要串行执行
    static SERIAL: Mutex<()> = Mutex::new(());

    #[test]
    fn test_spin_lock_masks_interrupts_while_held() {
        let _serial = SERIAL.lock().unwrap();
        let lock = SpinLock::new(0u32);

        assert!(MOCK_ARCH_OPS.interrupts_on());
        {
            let mut guard = lock.lock();
            *guard += 1;
            assert!(!MOCK_ARCH_OPS.interrupts_on());
        }
        assert!(MOCK_ARCH_OPS.interrupts_on());
        assert_eq!(*lock.lock(), 1);
    }

    #[test]
    fn test_try_lock_fails_while_held_and_restores() {
        let _serial = SERIAL.lock().unwrap();
        let lock = SpinLock::new(());

        let guard = lock.lock();
        assert!(lock.is_locked());
        assert!(lock.try_lock().is_none());
        // 失败的 try_lock 不应改变外层临界区的中断状态
        assert!(!MOCK_ARCH_OPS.interrupts_on());
        drop(guard);

        assert!(!lock.is_locked());
        assert!(MOCK_ARCH_OPS.interrupts_on());
        assert!(lock.try_lock().is_some());
    }

    #[test]
    fn test_nested_locks_restore_in_order() {
        let _serial = SERIAL.lock().unwrap();
        let outer = SpinLock::new(1u8);
        let inner = SpinLock::new(2u8);

        let a = outer.lock();
        let b = inner.lock();
        assert_eq!(*a + *b, 3);
        drop(b);
        // 内层释放后仍处于外层临界区
        assert!(!MOCK_ARCH_OPS.interrupts_on());
        drop(a);
        assert!(MOCK_ARCH_OPS.interrupts_on());
    }

    #[test]
    fn test_intr_guard_reports_previous_state() {
        let _serial = SERIAL.lock().unwrap();
        let outer = IntrGuard::new();
        assert!(outer.was_enabled());
        {
            let inner = IntrGuard::new();
            assert!(!inner.was_enabled());
        }
        assert!(!MOCK_ARCH_OPS.interrupts_on());
        drop(outer);
        assert!(MOCK_ARCH_OPS.interrupts_on());
    }
}
