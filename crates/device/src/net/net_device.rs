//! 网络设备接口定义

use core::fmt;

use super::config::MAX_FRAME_SIZE;
use super::types::{LinkDuplex, LinkSpeed, MacAddress};

/// 网络设备错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetDeviceError {
    /// 硬件不存在或没有响应
    NotPresent,
    /// 设备未就绪（尚未初始化）
    DeviceNotReady,
    /// 队列已满（发送环或接收移交队列）
    QueueFull,
    /// 帧超过设备允许的最大长度
    FrameTooLarge,
    /// 帧为空
    FrameTooSmall,
    /// 调用者提供的缓冲区容量不足
    BufferTooSmall,
    /// 底层传输失败
    IoError,
    /// PHY 读取失败
    PhyError,
    /// 不支持的操作
    NotSupported,
}

impl fmt::Display for NetDeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            NetDeviceError::NotPresent => "device not present",
            NetDeviceError::DeviceNotReady => "device not ready",
            NetDeviceError::QueueFull => "queue full",
            NetDeviceError::FrameTooLarge => "frame too large",
            NetDeviceError::FrameTooSmall => "frame too small",
            NetDeviceError::BufferTooSmall => "buffer too small",
            NetDeviceError::IoError => "I/O error",
            NetDeviceError::PhyError => "PHY read failed",
            NetDeviceError::NotSupported => "operation not supported",
        };
        f.write_str(msg)
    }
}

/// 网络设备接口
///
/// 所有方法都以 `&self` 调用：与中断上下文共享收发环的设备需要自行
/// 用 [`sync::SpinLock`] 保护内部状态。
///
/// 设备需要遵守的约定：
/// - 重复初始化由调用者保证不会发生，设备无需检测
/// - 收发以整帧为单位，要么整帧接受，要么整帧拒绝
/// - 发送就绪与链路查询是 O(1) 且不阻塞的
/// - 只有 [`NetDevice::update_phy`] 允许执行较慢的硬件轮询
pub trait NetDevice: Send + Sync {
    /// 初始化硬件
    fn initialize(&self) -> Result<(), NetDeviceError>;

    /// 获取MAC地址
    ///
    /// 初始化成功后返回值不再改变
    fn mac_address(&self) -> &MacAddress;

    /// 发送环当前是否有空闲缓冲区
    ///
    /// 仅供参考：读取后可能立即过时
    fn is_send_ready(&self) -> bool;

    /// 发送一帧
    fn send_frame(&self, frame: &[u8]) -> Result<(), NetDeviceError>;

    /// 接收一帧到 `buf`
    ///
    /// # 返回值
    /// * `Ok(Some(len))` - 收到一帧，已拷贝 `len` 字节
    /// * `Ok(None)` - 当前没有待接收的帧
    fn receive_frame(&self, buf: &mut [u8]) -> Result<Option<usize>, NetDeviceError>;

    /// 最近一次刷新得到的链路是否连通
    fn is_link_up(&self) -> bool;

    /// 最近一次刷新得到的链路速率
    fn link_speed(&self) -> LinkSpeed;

    /// 重新读取 PHY 状态并更新链路观测值
    ///
    /// 链路断开是合法的观测结果，不是错误；只有读取本身失败才返回错误。
    fn update_phy(&self) -> Result<(), NetDeviceError>;

    /// 获取设备名称
    fn name(&self) -> &str;

    /// 最近一次刷新得到的双工模式
    fn link_duplex(&self) -> LinkDuplex {
        LinkDuplex::Unknown
    }

    /// 设备接受的最大帧长度
    fn max_frame_size(&self) -> usize {
        MAX_FRAME_SIZE
    }
}
