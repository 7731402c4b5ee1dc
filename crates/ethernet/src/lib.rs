//! 以太网适配层
//!
//! 此 crate 在单个网络设备之上提供一组可从 C 调用的控制接口：
//!
//! - [`EthernetAdapter`] - 绑定一次、此后只做转发的适配器，以 [`EthResult`] 报告结果
//! - [`ffi`] - 对外导出的 C 接口（布尔值约定）以及 C 驱动的回调表接入
//! - [`host`] - 底层驱动使用的延时、时钟与中断连接钩子
//! - [`stack`] - 供 smoltcp 使用的 [`smoltcp::phy::Device`] 适配
//!
//! # 使用
//!
//! ```ignore
//! let mut adapter = EthernetAdapter::new();
//! adapter.initialize(LoopbackNetDevice::new(mac))?;
//! adapter.update_phy()?;
//! if adapter.is_send_ready() {
//!     adapter.send_frame(&frame)?;
//! }
//! ```

#![no_std]

extern crate alloc;

mod adapter;
mod error;
pub mod ffi;
pub mod host;
pub mod stack;

pub use adapter::EthernetAdapter;
pub use error::{EthError, EthResult};
pub use host::{HostOps, IrqHandler, register_host_ops};
pub use stack::{AdapterDevice, mac_to_ethernet_address};

#[cfg(test)]
pub(crate) mod test_util {
    use core::sync::atomic::{AtomicUsize, Ordering};
    use sync::ArchOps;

    struct DummyArchOps;

    impl ArchOps for DummyArchOps {
        unsafe fn read_and_disable_interrupts(&self) -> usize {
            0
        }

        unsafe fn restore_interrupts(&self, _flags: usize) {}

        fn interrupts_enabled(&self, flags: usize) -> bool {
            flags != 0
        }
    }

    static DUMMY_ARCH_OPS: DummyArchOps = DummyArchOps;
    // 0 = uninit, 1 = initializing, 2 = ready
    static SYNC_INIT: AtomicUsize = AtomicUsize::new(0);

    pub(crate) fn init_sync_arch_ops() {
        match SYNC_INIT.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => {
                // Safety: tests use a single global dummy ArchOps.
                unsafe { sync::register_arch_ops(&DUMMY_ARCH_OPS) };
                SYNC_INIT.store(2, Ordering::Release);
            }
            Err(_) => {
                while SYNC_INIT.load(Ordering::Acquire) != 2 {
                    core::hint::spin_loop();
                }
            }
        }
    }
}
