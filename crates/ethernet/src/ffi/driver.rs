//! 以回调表形式接入的 C 网卡驱动

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::ffi::c_void;

use device::net::config::FRAME_BUFFER_SIZE;
use device::{LinkSpeed, MacAddress, NetDevice, NetDeviceError};
use once_cell::race::OnceBox;

use super::adapter::set_boot_driver;

/// C 驱动提供的回调表
///
/// 每个回调的第一个参数都是 `context`。除 `context` 外所有字段都必须非空。
#[repr(C)]
#[derive(Clone, Copy)]
pub struct EthDriverOps {
    /// 驱动私有上下文，原样传回每个回调
    pub context: *mut c_void,
    /// 初始化硬件，成功返回 true
    pub initialize: Option<unsafe extern "C" fn(ctx: *mut c_void) -> bool>,
    /// 把 6 字节 MAC 地址写入 `mac`
    pub get_mac_address: Option<unsafe extern "C" fn(ctx: *mut c_void, mac: *mut u8) -> bool>,
    /// 发送环是否有空闲缓冲区
    pub is_send_frame_advisable: Option<unsafe extern "C" fn(ctx: *mut c_void) -> bool>,
    /// 发送 `len` 字节的帧
    pub send_frame: Option<unsafe extern "C" fn(ctx: *mut c_void, buf: *const u8, len: u32) -> bool>,
    /// 接收一帧到 `buf`（容量为 `FRAME_BUFFER_SIZE`），没有帧时返回 false
    pub receive_frame:
        Option<unsafe extern "C" fn(ctx: *mut c_void, buf: *mut u8, len: *mut u32) -> bool>,
    /// 最近一次刷新得到的链路是否连通
    pub is_link_up: Option<unsafe extern "C" fn(ctx: *mut c_void) -> bool>,
    /// 最近一次刷新得到的链路速率（Mbps，未知为 0）
    pub get_link_speed: Option<unsafe extern "C" fn(ctx: *mut c_void) -> u32>,
    /// 重新读取 PHY，读取失败返回 false
    pub update_phy: Option<unsafe extern "C" fn(ctx: *mut c_void) -> bool>,
}

type CtxFn = unsafe extern "C" fn(*mut c_void) -> bool;

/// 校验过的回调
#[derive(Clone, Copy)]
struct Callbacks {
    initialize: CtxFn,
    get_mac_address: unsafe extern "C" fn(*mut c_void, *mut u8) -> bool,
    is_send_frame_advisable: CtxFn,
    send_frame: unsafe extern "C" fn(*mut c_void, *const u8, u32) -> bool,
    receive_frame: unsafe extern "C" fn(*mut c_void, *mut u8, *mut u32) -> bool,
    is_link_up: CtxFn,
    get_link_speed: unsafe extern "C" fn(*mut c_void) -> u32,
    update_phy: CtxFn,
}

impl Callbacks {
    fn from_ops(ops: &EthDriverOps) -> Option<Self> {
        Some(Self {
            initialize: ops.initialize?,
            get_mac_address: ops.get_mac_address?,
            is_send_frame_advisable: ops.is_send_frame_advisable?,
            send_frame: ops.send_frame?,
            receive_frame: ops.receive_frame?,
            is_link_up: ops.is_link_up?,
            get_link_speed: ops.get_link_speed?,
            update_phy: ops.update_phy?,
        })
    }
}

/// 以 [`EthDriverOps`] 为后端的网络设备
///
/// MAC 地址在初始化时读取一次并保存在设备内，此后以引用返回。
pub struct ForeignNetDevice {
    ctx: *mut c_void,
    cb: Callbacks,
    mac: OnceBox<MacAddress>,
}

// SAFETY: 回调表的约定要求驱动可以从任意上下文调用，
// 收发环与中断处理程序之间的互斥由 C 驱动自己负责。
unsafe impl Send for ForeignNetDevice {}
// SAFETY: 同上
unsafe impl Sync for ForeignNetDevice {}

impl ForeignNetDevice {
    /// 包装回调表，存在空回调时返回 [`NetDeviceError::NotSupported`]
    pub fn new(ops: &EthDriverOps) -> Result<Self, NetDeviceError> {
        let cb = Callbacks::from_ops(ops).ok_or(NetDeviceError::NotSupported)?;
        Ok(Self {
            ctx: ops.context,
            cb,
            mac: OnceBox::new(),
        })
    }
}

impl NetDevice for ForeignNetDevice {
    fn initialize(&self) -> Result<(), NetDeviceError> {
        // SAFETY: 回调与 ctx 由驱动在注册时提供
        if !unsafe { (self.cb.initialize)(self.ctx) } {
            return Err(NetDeviceError::NotPresent);
        }
        let mut bytes = [0u8; 6];
        // SAFETY: bytes 恰好 6 字节
        if !unsafe { (self.cb.get_mac_address)(self.ctx, bytes.as_mut_ptr()) } {
            return Err(NetDeviceError::IoError);
        }
        let mac = MacAddress::new(bytes);
        if self.mac.set(Box::new(mac)).is_err() && *self.mac_address() != mac {
            log::warn!(
                "eth: driver reported mac {} after {}, keeping the first",
                mac,
                self.mac_address()
            );
        }
        Ok(())
    }

    fn mac_address(&self) -> &MacAddress {
        self.mac.get().unwrap_or(&MacAddress::UNSPECIFIED)
    }

    fn is_send_ready(&self) -> bool {
        // SAFETY: 见 initialize
        unsafe { (self.cb.is_send_frame_advisable)(self.ctx) }
    }

    fn send_frame(&self, frame: &[u8]) -> Result<(), NetDeviceError> {
        if frame.is_empty() {
            return Err(NetDeviceError::FrameTooSmall);
        }
        if frame.len() > self.max_frame_size() {
            return Err(NetDeviceError::FrameTooLarge);
        }
        // SAFETY: frame 在调用期间有效，长度已检查不超过最大帧长
        if unsafe { (self.cb.send_frame)(self.ctx, frame.as_ptr(), frame.len() as u32) } {
            Ok(())
        } else {
            Err(NetDeviceError::QueueFull)
        }
    }

    fn receive_frame(&self, buf: &mut [u8]) -> Result<Option<usize>, NetDeviceError> {
        if buf.len() < FRAME_BUFFER_SIZE {
            return Err(NetDeviceError::BufferTooSmall);
        }
        let mut len = 0u32;
        // SAFETY: buf 至少有 FRAME_BUFFER_SIZE 字节
        if !unsafe { (self.cb.receive_frame)(self.ctx, buf.as_mut_ptr(), &mut len) } {
            return Ok(None);
        }
        let len = len as usize;
        if len > FRAME_BUFFER_SIZE {
            return Err(NetDeviceError::IoError);
        }
        Ok(Some(len))
    }

    fn is_link_up(&self) -> bool {
        // SAFETY: 见 initialize
        unsafe { (self.cb.is_link_up)(self.ctx) }
    }

    fn link_speed(&self) -> LinkSpeed {
        // SAFETY: 见 initialize
        LinkSpeed::from_mbps(unsafe { (self.cb.get_link_speed)(self.ctx) })
    }

    fn update_phy(&self) -> Result<(), NetDeviceError> {
        // SAFETY: 见 initialize
        if unsafe { (self.cb.update_phy)(self.ctx) } {
            Ok(())
        } else {
            Err(NetDeviceError::PhyError)
        }
    }

    fn name(&self) -> &str {
        "foreign"
    }
}

/// 登记 C 驱动作为下一次 `eth_initialize` 使用的驱动
///
/// 回调表按值拷贝；`ops` 为空或存在空回调时返回 false。
///
/// # Safety
/// `ops` 为空或指向有效的 [`EthDriverOps`]；其中的 `context` 在进程生命周期内有效
#[unsafe(no_mangle)]
pub unsafe extern "C" fn eth_register_driver(ops: *const EthDriverOps) -> bool {
    // SAFETY: 调用者保证 ops 为空或有效
    let Some(ops) = (unsafe { ops.as_ref() }) else {
        log::error!("eth: eth_register_driver with null ops");
        return false;
    };
    match ForeignNetDevice::new(ops) {
        Ok(dev) => {
            set_boot_driver(Arc::new(dev));
            true
        }
        Err(e) => {
            log::error!("eth: rejecting driver ops: {}", e);
            false
        }
    }
}
