//! 宿主环境钩子
//!
//! 底层 C 驱动需要延时、微秒时钟与中断连接原语。这些由宿主内核实现 [`HostOps`]
//! 并通过 [`register_host_ops`] 注册，再以 C 符号 `MsDelay`、`usDelay`、
//! `GetMicrosecondTicks`、`ConnectInterrupt` 导出给驱动。
//!
//! 适配器本身从不调用这些钩子。

use core::ffi::c_void;
use core::sync::atomic::{AtomicUsize, Ordering};

/// 中断处理函数签名
pub type IrqHandler = unsafe extern "C" fn(param: *mut c_void);

/// 宿主环境操作
pub trait HostOps: Send + Sync {
    /// 忙等待 `ms` 毫秒
    fn ms_delay(&self, ms: u32);

    /// 忙等待 `us` 微秒
    fn us_delay(&self, us: u32);

    /// 单调递增的微秒时钟，允许回绕
    fn microsecond_ticks(&self) -> u32;

    /// 把 `handler` 连接到硬件中断 `irq`
    ///
    /// # Safety
    /// 中断保持连接期间 `param` 必须有效，`handler` 必须能在中断上下文中运行
    unsafe fn connect_interrupt(&self, irq: u32, handler: IrqHandler, param: *mut c_void);
}

static HOST_OPS_DATA: AtomicUsize = AtomicUsize::new(0);
static HOST_OPS_VTABLE: AtomicUsize = AtomicUsize::new(0);

/// 注册宿主环境操作实现
///
/// # Safety
/// 必须在单线程环境下调用，且只能调用一次
pub unsafe fn register_host_ops(ops: &'static dyn HostOps) {
    let ptr = ops as *const dyn HostOps;
    // SAFETY: fat pointer 的布局是 (data, vtable)
    let (data, vtable) = unsafe { core::mem::transmute::<*const dyn HostOps, (usize, usize)>(ptr) };
    HOST_OPS_DATA.store(data, Ordering::Release);
    HOST_OPS_VTABLE.store(vtable, Ordering::Release);
}

/// 获取宿主环境操作实例，尚未注册时返回 None
fn host_ops() -> Option<&'static dyn HostOps> {
    let data = HOST_OPS_DATA.load(Ordering::Acquire);
    let vtable = HOST_OPS_VTABLE.load(Ordering::Acquire);
    if data == 0 {
        #[cfg(test)]
        {
            extern crate test_support;
            return Some(&test_support::mock::host::MOCK_HOST_OPS);
        }
        #[cfg(not(test))]
        return None;
    }
    // SAFETY: data 和 vtable 是通过 register_host_ops 设置的有效指针
    Some(unsafe { &*core::mem::transmute::<(usize, usize), *const dyn HostOps>((data, vtable)) })
}

/// 毫秒延时
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "C" fn MsDelay(milliseconds: u32) {
    match host_ops() {
        Some(ops) => ops.ms_delay(milliseconds),
        None => log::warn!("host: MsDelay({}) without host ops", milliseconds),
    }
}

/// 微秒延时
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "C" fn usDelay(microseconds: u32) {
    match host_ops() {
        Some(ops) => ops.us_delay(microseconds),
        None => log::warn!("host: usDelay({}) without host ops", microseconds),
    }
}

/// 微秒时钟；未注册宿主操作时恒为 0
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "C" fn GetMicrosecondTicks() -> u32 {
    host_ops().map_or(0, |ops| ops.microsecond_ticks())
}

/// 连接硬件中断
///
/// 空的处理函数会被拒绝并记录日志。
///
/// # Safety
/// 同 [`HostOps::connect_interrupt`]
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ConnectInterrupt(
    irq: u32,
    handler: Option<IrqHandler>,
    param: *mut c_void,
) {
    let Some(handler) = handler else {
        log::error!("host: ConnectInterrupt({}) with null handler", irq);
        return;
    };
    match host_ops() {
        // SAFETY: 调用者保证 handler 与 param 的有效性
        Some(ops) => unsafe { ops.connect_interrupt(irq, handler, param) },
        None => log::error!("host: ConnectInterrupt({}) without host ops", irq),
    }
}

#[cfg(test)]
mod test_mock {
    extern crate test_support;

    use super::{HostOps, IrqHandler};
    use core::ffi::c_void;
    use test_support::mock::host::MockHostOps;

    impl HostOps for MockHostOps {
        fn ms_delay(&self, ms: u32) {
            MockHostOps::ms_delay(self, ms)
        }

        fn us_delay(&self, us: u32) {
            MockHostOps::us_delay(self, us)
        }

        fn microsecond_ticks(&self) -> u32 {
            MockHostOps::microsecond_ticks(self)
        }

        unsafe fn connect_interrupt(&self, irq: u32, handler: IrqHandler, param: *mut c_void) {
            MockHostOps::connect_interrupt(self, irq, handler, param)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicU32;
    use test_support::mock::host::MOCK_HOST_OPS;

    static FIRED_WITH: AtomicU32 = AtomicU32::new(0);

    unsafe extern "C" fn record_param(param: *mut c_void) {
        FIRED_WITH.store(param as usize as u32, Ordering::SeqCst);
    }

    #[test]
    fn test_delays_advance_ticks() {
        let before = GetMicrosecondTicks();
        MsDelay(2);
        usDelay(5);
        assert!(GetMicrosecondTicks().wrapping_sub(before) >= 2005);
    }

    #[test]
    fn test_connect_interrupt_forwards_and_rejects_null() {
        unsafe { ConnectInterrupt(7, None, core::ptr::null_mut()) };
        assert_eq!(MOCK_HOST_OPS.connected_irq(), None);
        assert!(!MOCK_HOST_OPS.fire());

        unsafe { ConnectInterrupt(42, Some(record_param), 0x1234 as *mut c_void) };
        assert_eq!(MOCK_HOST_OPS.connected_irq(), Some(42));
        assert!(MOCK_HOST_OPS.fire());
        assert_eq!(FIRED_WITH.load(Ordering::SeqCst), 0x1234);
    }
}
