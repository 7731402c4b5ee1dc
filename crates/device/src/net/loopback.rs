//! 软件回环网络设备
//!
//! 每个被接受的发送帧都会从自身的接收队列回到调用者手中，
//! 用于没有真实网卡时的联调与测试。
//!
//! 发送就绪取决于接收队列是否还有空位（回环时发送环与接收队列是同一组缓冲区）。
//! 模拟的载波状态代表“PHY 的真实情况”，只有 [`NetDevice::update_phy`] 会去观测它，
//! 链路查询返回的是最近一次观测的结果。

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};
use sync::SpinLock;

use super::config::RX_QUEUE_DEPTH;
use super::net_device::{NetDevice, NetDeviceError};
use super::rx_queue::RxFrameQueue;
use super::types::{LinkDuplex, LinkSpeed, LinkState, MacAddress};

/// 模拟的 PHY
struct PhyModel {
    /// 线缆另一端的真实状态，None 表示未接入
    carrier: Option<(LinkSpeed, LinkDuplex)>,
    /// 为 true 时 PHY 读取在传输层失败
    fault: bool,
    /// 最近一次 update_phy 观测到的状态
    observed: LinkState,
}

/// 软件回环网络设备
pub struct LoopbackNetDevice {
    mac: MacAddress,
    rx: RxFrameQueue,
    phy: SpinLock<PhyModel>,
    initialized: AtomicBool,
}

impl LoopbackNetDevice {
    /// 创建默认队列深度的回环设备
    ///
    /// 初始载波为 1000 Mbps 全双工，但在第一次 `update_phy` 之前链路报告为断开
    pub fn new(mac: MacAddress) -> Arc<Self> {
        Self::with_depth(mac, RX_QUEUE_DEPTH)
    }

    /// 创建指定队列深度的回环设备
    pub fn with_depth(mac: MacAddress, depth: usize) -> Arc<Self> {
        Arc::new(Self {
            mac,
            rx: RxFrameQueue::new(depth),
            phy: SpinLock::new(PhyModel {
                carrier: Some((LinkSpeed::Mbps1000, LinkDuplex::Full)),
                fault: false,
                observed: LinkState::Down,
            }),
            initialized: AtomicBool::new(false),
        })
    }

    /// 改变模拟的载波（插拔网线、对端改速率）
    pub fn set_carrier(&self, carrier: Option<(LinkSpeed, LinkDuplex)>) {
        self.phy.lock().carrier = carrier;
    }

    /// 让后续的 PHY 读取失败或恢复正常
    pub fn set_phy_fault(&self, fault: bool) {
        self.phy.lock().fault = fault;
    }

    /// 等待接收的帧数
    pub fn pending_frames(&self) -> usize {
        self.rx.len()
    }

    /// 接收队列丢弃的帧数（被拒绝的发送不计入）
    pub fn dropped_frames(&self) -> usize {
        self.rx.dropped()
    }

    fn ensure_ready(&self) -> Result<(), NetDeviceError> {
        if self.initialized.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(NetDeviceError::DeviceNotReady)
        }
    }
}

impl NetDevice for LoopbackNetDevice {
    fn initialize(&self) -> Result<(), NetDeviceError> {
        self.initialized.store(true, Ordering::Release);
        log::debug!("lo: initialized, mac {}", self.mac);
        Ok(())
    }

    fn mac_address(&self) -> &MacAddress {
        &self.mac
    }

    fn is_send_ready(&self) -> bool {
        self.initialized.load(Ordering::Acquire) && !self.rx.is_full()
    }

    fn send_frame(&self, frame: &[u8]) -> Result<(), NetDeviceError> {
        self.ensure_ready()?;
        if frame.is_empty() {
            return Err(NetDeviceError::FrameTooSmall);
        }
        if frame.len() > self.max_frame_size() {
            return Err(NetDeviceError::FrameTooLarge);
        }
        // 发送环满是发送被拒绝，不计入接收丢帧
        if self.rx.is_full() {
            return Err(NetDeviceError::QueueFull);
        }
        self.rx.push(frame)
    }

    fn receive_frame(&self, buf: &mut [u8]) -> Result<Option<usize>, NetDeviceError> {
        self.ensure_ready()?;
        self.rx.pop_into(buf)
    }

    fn is_link_up(&self) -> bool {
        self.phy.lock().observed.is_up()
    }

    fn link_speed(&self) -> LinkSpeed {
        self.phy.lock().observed.speed()
    }

    fn link_duplex(&self) -> LinkDuplex {
        self.phy.lock().observed.duplex()
    }

    fn update_phy(&self) -> Result<(), NetDeviceError> {
        self.ensure_ready()?;
        let mut phy = self.phy.lock();
        if phy.fault {
            return Err(NetDeviceError::PhyError);
        }
        phy.observed = match phy.carrier {
            Some((speed, duplex)) => LinkState::Up(speed, duplex),
            None => LinkState::Down,
        };
        Ok(())
    }

    fn name(&self) -> &str {
        "lo"
    }
}
