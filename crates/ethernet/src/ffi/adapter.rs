//! 全局适配器与对外导出的 C 接口
//!
//! 进程内唯一的适配器在第一次成功的 `eth_initialize` 时发布，此后只读访问。
//! 所有失败都以 `false` 返回，状态码保存在 [`eth_last_error`] 中。

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicI32, Ordering};

use device::net::config::FRAME_BUFFER_SIZE;
use device::{LinkSpeed, MacAddress, NetDevice};
use lazy_static::lazy_static;
use once_cell::race::OnceBox;
use sync::SpinLock;

use crate::adapter::EthernetAdapter;
use crate::error::{EthError, EthResult};

/// 绑定后的全局适配器
static ADAPTER: OnceBox<EthernetAdapter> = OnceBox::new();

/// 尚未绑定时使用的适配器，所有操作都报告 [`EthError::NotBound`]
static UNBOUND: EthernetAdapter = EthernetAdapter::new();

/// 最近一次失败的状态码，0 表示从未失败
static LAST_ERROR: AtomicI32 = AtomicI32::new(0);

lazy_static! {
    /// 等待 `eth_initialize` 使用的驱动
    static ref BOOT_DRIVER: SpinLock<Option<Arc<dyn NetDevice>>> = SpinLock::new(None);
}

/// 登记下一次 `eth_initialize` 使用的驱动，替换之前登记的驱动
pub fn set_boot_driver(driver: Arc<dyn NetDevice>) {
    log::debug!("eth: boot driver {}", driver.name());
    if let Some(old) = BOOT_DRIVER.lock().replace(driver) {
        log::warn!("eth: replacing pending boot driver {}", old.name());
    }
}

/// 全局适配器，尚未初始化时返回未绑定的适配器
pub fn global_adapter() -> &'static EthernetAdapter {
    ADAPTER.get().unwrap_or(&UNBOUND)
}

fn fail(e: EthError) -> bool {
    LAST_ERROR.store(e.status_code(), Ordering::Relaxed);
    false
}

fn check<T>(result: EthResult<T>) -> Option<T> {
    result.map_err(fail).ok()
}

/// 初始化并绑定网络设备
///
/// 使用 [`set_boot_driver`] 或 `eth_register_driver` 登记的驱动。失败时驱动保持登记，
/// 调用者可以重试。
///
/// # Panics
/// 已经绑定过设备时触发断言：重复初始化属于编程错误。
/// 使用 `C-unwind` ABI，断言失败可以展开到 Rust 调用者。
#[unsafe(no_mangle)]
pub extern "C-unwind" fn eth_initialize() -> bool {
    assert!(ADAPTER.get().is_none(), "eth_initialize: {}", EthError::AlreadyBound);

    let Some(driver) = BOOT_DRIVER.lock().take() else {
        log::warn!("eth: no network driver registered");
        return fail(EthError::DeviceAbsent);
    };

    // 驱动初始化期间不持有任何锁，驱动可以等待中断驱动的时钟
    let mut adapter = EthernetAdapter::new();
    if let Err(e) = adapter.initialize(driver.clone()) {
        BOOT_DRIVER.lock().get_or_insert(driver);
        return fail(e);
    }

    assert!(
        ADAPTER.set(Box::new(adapter)).is_ok(),
        "eth_initialize: {}",
        EthError::AlreadyBound
    );
    true
}

/// 设备 MAC 地址，未绑定时返回空指针
///
/// 返回的指针在进程生命周期内有效且指向的值不变。
#[unsafe(no_mangle)]
pub extern "C" fn eth_get_mac_address() -> *const MacAddress {
    match check(global_adapter().mac_address()) {
        Some(mac) => mac,
        None => core::ptr::null(),
    }
}

/// 发送环当前是否有空闲缓冲区
#[unsafe(no_mangle)]
pub extern "C" fn eth_is_send_frame_advisable() -> bool {
    global_adapter().is_send_ready()
}

/// 发送 `len` 字节的帧
///
/// # Safety
/// `len` 非零时 `buf` 必须指向 `len` 个可读字节
#[unsafe(no_mangle)]
pub unsafe extern "C" fn eth_send_frame(buf: *const u8, len: u32) -> bool {
    let frame: &[u8] = if buf.is_null() || len == 0 {
        &[]
    } else {
        // SAFETY: 调用者保证 buf 指向 len 个可读字节
        unsafe { core::slice::from_raw_parts(buf, len as usize) }
    };
    check(global_adapter().send_frame(frame)).is_some()
}

/// 接收一帧
///
/// 成功时把帧写入 `buf` 并把长度写入 `*len`；没有帧时返回 false，`*len` 不变。
///
/// # Safety
/// `buf` 必须指向至少 `FRAME_BUFFER_SIZE` 个可写字节，`len` 必须可写
#[unsafe(no_mangle)]
pub unsafe extern "C" fn eth_receive_frame(buf: *mut u8, len: *mut u32) -> bool {
    if buf.is_null() || len.is_null() {
        return fail(EthError::BufferTooSmall);
    }
    // SAFETY: 调用者保证 buf 至少有 FRAME_BUFFER_SIZE 字节
    let buf = unsafe { core::slice::from_raw_parts_mut(buf, FRAME_BUFFER_SIZE) };
    match check(global_adapter().receive_frame(buf)) {
        Some(n) => {
            // SAFETY: len 非空且由调用者保证可写
            unsafe { *len = n as u32 };
            true
        }
        None => false,
    }
}

/// 最近一次刷新得到的链路是否连通
#[unsafe(no_mangle)]
pub extern "C" fn eth_is_link_up() -> bool {
    global_adapter().is_link_up()
}

/// 最近一次刷新得到的链路速率
#[unsafe(no_mangle)]
pub extern "C" fn eth_get_link_speed() -> LinkSpeed {
    global_adapter().link_speed()
}

/// 重新读取 PHY 状态
#[unsafe(no_mangle)]
pub extern "C" fn eth_update_phy() -> bool {
    check(global_adapter().update_phy()).is_some()
}

/// 最近一次失败的状态码（负数），从未失败时为 0
#[unsafe(no_mangle)]
pub extern "C" fn eth_last_error() -> i32 {
    LAST_ERROR.load(Ordering::Relaxed)
}
