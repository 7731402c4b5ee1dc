//! 通过 `eth_register_driver` 接入的 C 驱动
//!
//! 回调表登记后经 `eth_initialize` 绑定，再通过导出的 C 接口收发。

use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use device::net::config::FRAME_BUFFER_SIZE;
use device::{LinkSpeed, MacAddress};
use ethernet::ffi::*;
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

const MAC: [u8; 6] = [0x02, 0x11, 0x22, 0x33, 0x44, 0x55];

/// 单帧缓冲的假驱动，发送的帧原样回送
struct Driver {
    initialized: AtomicBool,
    carrier: AtomicBool,
    link_up: AtomicBool,
    pending: AtomicU32,
    last_byte: AtomicU32,
}

static DRIVER: Driver = Driver {
    initialized: AtomicBool::new(false),
    carrier: AtomicBool::new(true),
    link_up: AtomicBool::new(false),
    pending: AtomicU32::new(0),
    last_byte: AtomicU32::new(0),
};

unsafe fn driver(ctx: *mut c_void) -> &'static Driver {
    unsafe { &*(ctx as *const Driver) }
}

unsafe extern "C" fn drv_init(ctx: *mut c_void) -> bool {
    unsafe { driver(ctx) }.initialized.store(true, Ordering::SeqCst);
    true
}

unsafe extern "C" fn drv_mac(_ctx: *mut c_void, mac: *mut u8) -> bool {
    unsafe { std::ptr::copy_nonoverlapping(MAC.as_ptr(), mac, 6) };
    true
}

unsafe extern "C" fn drv_ready(ctx: *mut c_void) -> bool {
    unsafe { driver(ctx) }.pending.load(Ordering::SeqCst) == 0
}

unsafe extern "C" fn drv_send(ctx: *mut c_void, buf: *const u8, len: u32) -> bool {
    let drv = unsafe { driver(ctx) };
    if drv.pending.load(Ordering::SeqCst) != 0 {
        return false;
    }
    let last = unsafe { *buf.add(len as usize - 1) };
    drv.last_byte.store(last as u32, Ordering::SeqCst);
    drv.pending.store(len, Ordering::SeqCst);
    true
}

unsafe extern "C" fn drv_recv(ctx: *mut c_void, buf: *mut u8, len: *mut u32) -> bool {
    let drv = unsafe { driver(ctx) };
    let n = drv.pending.swap(0, Ordering::SeqCst);
    if n == 0 {
        return false;
    }
    let byte = drv.last_byte.load(Ordering::SeqCst) as u8;
    unsafe {
        std::ptr::write_bytes(buf, byte, n as usize);
        *len = n;
    }
    true
}

unsafe extern "C" fn drv_link(ctx: *mut c_void) -> bool {
    unsafe { driver(ctx) }.link_up.load(Ordering::SeqCst)
}

unsafe extern "C" fn drv_speed(ctx: *mut c_void) -> u32 {
    if unsafe { driver(ctx) }.link_up.load(Ordering::SeqCst) {
        100
    } else {
        0
    }
}

unsafe extern "C" fn drv_update_phy(ctx: *mut c_void) -> bool {
    let drv = unsafe { driver(ctx) };
    drv.link_up
        .store(drv.carrier.load(Ordering::SeqCst), Ordering::SeqCst);
    true
}

fn ops() -> EthDriverOps {
    EthDriverOps {
        context: &DRIVER as *const Driver as *mut c_void,
        initialize: Some(drv_init),
        get_mac_address: Some(drv_mac),
        is_send_frame_advisable: Some(drv_ready),
        send_frame: Some(drv_send),
        receive_frame: Some(drv_recv),
        is_link_up: Some(drv_link),
        get_link_speed: Some(drv_speed),
        update_phy: Some(drv_update_phy),
    }
}

#[test]
fn registered_c_driver_serves_the_c_interface() {
    unsafe { sync::register_arch_ops(&DUMMY_ARCH_OPS) };

    // 缺少回调的表被拒绝，不影响之后的登记
    let mut partial = ops();
    partial.update_phy = None;
    assert!(!unsafe { eth_register_driver(&partial) });

    let table = ops();
    assert!(unsafe { eth_register_driver(&table) });
    assert!(!DRIVER.initialized.load(Ordering::SeqCst));
    assert!(eth_initialize());
    assert!(DRIVER.initialized.load(Ordering::SeqCst));
    assert!(global_adapter().is_bound());

    let mac = eth_get_mac_address();
    assert!(!mac.is_null());
    assert_eq!(unsafe { *mac }, MacAddress::new(MAC));
    assert_eq!(eth_get_mac_address(), mac);

    // 发送经回调到达驱动，驱动回送后再经回调收回
    let mut buf = [0u8; FRAME_BUFFER_SIZE];
    let mut len = 0u32;
    assert!(!unsafe { eth_receive_frame(buf.as_mut_ptr(), &mut len) });
    assert_eq!(len, 0);

    assert!(eth_is_send_frame_advisable());
    let frame = [0x5au8; 64];
    assert!(unsafe { eth_send_frame(frame.as_ptr(), frame.len() as u32) });
    assert!(!eth_is_send_frame_advisable());
    assert!(!unsafe { eth_send_frame(frame.as_ptr(), frame.len() as u32) });
    assert!(eth_last_error() < 0);

    assert!(unsafe { eth_receive_frame(buf.as_mut_ptr(), &mut len) });
    assert_eq!(len, 64);
    assert!(buf[..64].iter().all(|&b| b == 0x5a));
    assert!(eth_is_send_frame_advisable());

    // 链路状态只在刷新 PHY 后变化
    assert!(!eth_is_link_up());
    assert_eq!(eth_get_link_speed(), LinkSpeed::Unknown);
    assert!(eth_update_phy());
    assert!(eth_is_link_up());
    assert_eq!(eth_get_link_speed(), LinkSpeed::Mbps100);

    DRIVER.carrier.store(false, Ordering::SeqCst);
    assert!(eth_is_link_up());
    assert!(eth_update_phy());
    assert!(!eth_is_link_up());
    assert_eq!(eth_get_link_speed(), LinkSpeed::Unknown);
}
