//! 重复初始化的断言
//!
//! 单独成一个测试二进制，拥有自己的全局适配器。

use device::{LoopbackNetDevice, MacAddress};
use ethernet::ffi::{eth_initialize, global_adapter, set_boot_driver};
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

#[test]
#[should_panic(expected = "network device already bound")]
fn second_eth_initialize_asserts() {
    unsafe { sync::register_arch_ops(&DUMMY_ARCH_OPS) };

    set_boot_driver(LoopbackNetDevice::new(MacAddress::new([2, 0, 0, 0, 1, 1])));
    assert!(eth_initialize());
    assert!(global_adapter().is_bound());

    set_boot_driver(LoopbackNetDevice::new(MacAddress::new([2, 0, 0, 0, 1, 2])));
    eth_initialize();
}
