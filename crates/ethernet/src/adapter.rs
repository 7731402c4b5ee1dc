//! 以太网适配器
//!
//! [`EthernetAdapter`] 持有至多一个网络设备，初始化时绑定一次，此后每个调用都是
//! 带前后置检查的转发。适配器本身不加锁，也不在设备调用周围做同步：
//! 与中断上下文共享收发环的设备自行负责互斥。

use alloc::sync::Arc;

use device::net::config::FRAME_BUFFER_SIZE;
use device::{
    Frame, LinkSpeed, LinkState, MacAddress, NETWORK_DEVICES, NetDevice, NetDeviceError,
    NetDeviceRegistry,
};

use crate::error::{EthError, EthResult};

/// 适配器绑定的设备在注册表中的编号
const BOUND_DEVICE_INDEX: usize = 0;

/// 以太网适配器
///
/// 状态机为 `未绑定 -> 已绑定`，已绑定是终态：设备一经绑定便在进程生命周期内保持。
pub struct EthernetAdapter {
    device: Option<Arc<dyn NetDevice>>,
}

impl EthernetAdapter {
    /// 创建未绑定的适配器
    pub const fn new() -> Self {
        Self { device: None }
    }

    /// 初始化驱动并绑定到全局注册表的 0 号设备
    pub fn initialize(&mut self, driver: Arc<dyn NetDevice>) -> EthResult<()> {
        self.initialize_with(&NETWORK_DEVICES, driver)
    }

    /// 初始化驱动，在 `registry` 中登记后绑定其 0 号设备
    ///
    /// # 错误
    /// * [`EthError::AlreadyBound`] - 已经绑定过设备
    /// * [`EthError::DeviceAbsent`] - 驱动初始化失败，或 0 号位置已被其他设备占用
    ///
    /// 只有刚初始化的驱动登记到 0 号位置时才会绑定。
    /// 失败时不做重试，重试策略由调用者决定。
    pub fn initialize_with(
        &mut self,
        registry: &NetDeviceRegistry,
        driver: Arc<dyn NetDevice>,
    ) -> EthResult<()> {
        if self.device.is_some() {
            return Err(EthError::AlreadyBound);
        }

        if let Some(occupant) = registry.get(BOUND_DEVICE_INDEX) {
            log::warn!(
                "eth: device #{} already taken by {}, not initializing {}",
                BOUND_DEVICE_INDEX,
                occupant.name(),
                driver.name()
            );
            return Err(EthError::DeviceAbsent);
        }

        if let Err(e) = driver.initialize() {
            log::warn!("eth: {} failed to initialize: {}", driver.name(), e);
            return Err(EthError::DeviceAbsent);
        }

        match registry.register(driver.clone()) {
            Ok(BOUND_DEVICE_INDEX) => {}
            Ok(index) => {
                log::warn!("eth: {} registered as #{}, not binding", driver.name(), index);
                return Err(EthError::DeviceAbsent);
            }
            Err(e) => {
                log::warn!("eth: cannot register network device: {}", e);
                return Err(EthError::DeviceAbsent);
            }
        }

        log::info!(
            "eth: bound to {} (mac {})",
            driver.name(),
            driver.mac_address()
        );
        self.device = Some(driver);
        Ok(())
    }

    /// 是否已经绑定设备
    pub fn is_bound(&self) -> bool {
        self.device.is_some()
    }

    /// 已绑定的设备
    pub fn device(&self) -> Option<&Arc<dyn NetDevice>> {
        self.device.as_ref()
    }

    fn bound(&self) -> EthResult<&Arc<dyn NetDevice>> {
        self.device.as_ref().ok_or(EthError::NotBound)
    }

    /// 设备的 MAC 地址
    ///
    /// 返回设备持有的地址的只读引用，绑定后每次调用都得到相同的值。
    pub fn mac_address(&self) -> EthResult<&MacAddress> {
        Ok(self.bound()?.mac_address())
    }

    /// 发送环当前是否有空闲缓冲区（仅供参考）
    pub fn is_send_ready(&self) -> bool {
        self.device.as_ref().is_some_and(|d| d.is_send_ready())
    }

    /// 发送一帧
    ///
    /// 空帧或超过设备最大帧长的帧在到达设备之前就被拒绝。
    /// 整帧要么被接受，要么被拒绝，不存在部分发送。
    pub fn send_frame(&self, frame: &[u8]) -> EthResult<()> {
        let device = self.bound()?;
        if frame.is_empty() {
            return Err(EthError::TransmitRejected(NetDeviceError::FrameTooSmall));
        }
        if frame.len() > device.max_frame_size() {
            return Err(EthError::TransmitRejected(NetDeviceError::FrameTooLarge));
        }
        device.send_frame(frame).map_err(|e| {
            log::trace!("eth: tx {} bytes rejected: {}", frame.len(), e);
            EthError::TransmitRejected(e)
        })?;
        log::trace!("eth: tx {} bytes", frame.len());
        Ok(())
    }

    /// 接收一帧到 `buf`，返回帧长
    ///
    /// `buf` 至少需要 [`FRAME_BUFFER_SIZE`] 字节。没有待接收的帧时立即返回
    /// [`EthError::NoFrameAvailable`]，从不等待。返回的帧长不超过设备的最大帧长，
    /// 设备报告更长的帧时返回 [`EthError::ReceiveFailed`]。
    pub fn receive_frame(&self, buf: &mut [u8]) -> EthResult<usize> {
        let device = self.bound()?;
        if buf.len() < FRAME_BUFFER_SIZE {
            return Err(EthError::BufferTooSmall);
        }
        match device.receive_frame(&mut buf[..FRAME_BUFFER_SIZE]) {
            Ok(Some(len)) if len <= device.max_frame_size().min(FRAME_BUFFER_SIZE) => {
                log::trace!("eth: rx {} bytes", len);
                Ok(len)
            }
            Ok(Some(len)) => {
                log::error!("eth: {} reported oversize frame ({} bytes)", device.name(), len);
                Err(EthError::ReceiveFailed(NetDeviceError::FrameTooLarge))
            }
            Ok(None) => Err(EthError::NoFrameAvailable),
            Err(NetDeviceError::BufferTooSmall) => Err(EthError::BufferTooSmall),
            Err(e) => Err(EthError::ReceiveFailed(e)),
        }
    }

    /// 发送 [`Frame`] 中的有效字节
    pub fn send(&self, frame: &Frame) -> EthResult<()> {
        self.send_frame(frame.as_slice())
    }

    /// 接收一帧到 [`Frame`]，并设置其长度
    pub fn receive(&self, frame: &mut Frame) -> EthResult<usize> {
        let len = self.receive_frame(frame.as_mut_buffer())?;
        frame.set_len(len);
        Ok(len)
    }

    /// 最近一次刷新得到的链路是否连通
    pub fn is_link_up(&self) -> bool {
        self.device.as_ref().is_some_and(|d| d.is_link_up())
    }

    /// 最近一次刷新得到的链路速率，链路断开时为 [`LinkSpeed::Unknown`]
    pub fn link_speed(&self) -> LinkSpeed {
        match &self.device {
            Some(d) if d.is_link_up() => d.link_speed(),
            _ => LinkSpeed::Unknown,
        }
    }

    /// 最近一次刷新得到的完整链路状态
    pub fn link_state(&self) -> LinkState {
        match &self.device {
            Some(d) if d.is_link_up() => LinkState::Up(d.link_speed(), d.link_duplex()),
            _ => LinkState::Down,
        }
    }

    /// 重新读取 PHY 状态
    ///
    /// 链路断开是正常的观测结果；只有 PHY 读取本身失败时返回
    /// [`EthError::PhyReadFailed`]。
    pub fn update_phy(&self) -> EthResult<()> {
        let device = self.bound()?;
        device.update_phy().map_err(|e| {
            log::warn!("eth: {} PHY read failed: {}", device.name(), e);
            EthError::PhyReadFailed
        })?;
        log::debug!("eth: link {}", self.link_state());
        Ok(())
    }
}

impl Default for EthernetAdapter {
    fn default() -> Self {
        Self::new()
    }
}
