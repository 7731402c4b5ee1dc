//! 宿主环境钩子的 Mock 实现
//!
//! 注意：这里不直接依赖 `ethernet` crate（避免循环依赖）。
//! `ethernet` crate 在 `cfg(test)` 下为该类型实现 `HostOps`。
//!
//! 延时不会真正等待，而是推进一个模拟的微秒时钟。

use core::ffi::c_void;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// 中断处理函数签名
pub type MockIrqHandler = unsafe extern "C" fn(param: *mut c_void);

/// Mock 的宿主环境操作
pub struct MockHostOps {
    ticks_us: AtomicU32,
    last_irq: AtomicU32,
    handler: AtomicUsize,
    param: AtomicUsize,
}

impl MockHostOps {
    pub const fn new() -> Self {
        Self {
            ticks_us: AtomicU32::new(0),
            last_irq: AtomicU32::new(u32::MAX),
            handler: AtomicUsize::new(0),
            param: AtomicUsize::new(0),
        }
    }

    pub fn ms_delay(&self, ms: u32) {
        self.us_delay(ms.saturating_mul(1000));
    }

    pub fn us_delay(&self, us: u32) {
        self.ticks_us.fetch_add(us, Ordering::SeqCst);
    }

    pub fn microsecond_ticks(&self) -> u32 {
        self.ticks_us.load(Ordering::SeqCst)
    }

    pub fn connect_interrupt(&self, irq: u32, handler: MockIrqHandler, param: *mut c_void) {
        self.handler.store(handler as usize, Ordering::SeqCst);
        self.param.store(param as usize, Ordering::SeqCst);
        self.last_irq.store(irq, Ordering::SeqCst);
    }

    /// 最近一次连接的中断号
    pub fn connected_irq(&self) -> Option<u32> {
        match self.last_irq.load(Ordering::SeqCst) {
            u32::MAX => None,
            irq => Some(irq),
        }
    }

    /// 模拟硬件触发最近一次连接的中断
    ///
    /// 返回是否有处理函数被调用
    pub fn fire(&self) -> bool {
        let handler = self.handler.load(Ordering::SeqCst);
        if handler == 0 {
            return false;
        }
        let param = self.param.load(Ordering::SeqCst) as *mut c_void;
        // SAFETY: handler 由 connect_interrupt 以合法的函数指针写入
        let handler: MockIrqHandler = unsafe { core::mem::transmute(handler) };
        unsafe { handler(param) };
        true
    }
}

/// 全局 Mock 实例
pub static MOCK_HOST_OPS: MockHostOps = MockHostOps::new();
