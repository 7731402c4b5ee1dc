//! smoltcp 设备适配
//!
//! 把已绑定的 [`EthernetAdapter`] 包装成 [`smoltcp::phy::Device`]，
//! 使 TCP/IP 协议栈可以直接运行在适配器之上。

use device::net::config::{ETHERNET_HEADER_SIZE, ETHERNET_MTU};
use device::{Frame, MacAddress};
use smoltcp::phy::{Device, DeviceCapabilities, Medium, RxToken, TxToken};
use smoltcp::time::Instant;
use smoltcp::wire::EthernetAddress;

use crate::adapter::EthernetAdapter;
use crate::error::EthError;

/// MAC 地址转换为 smoltcp 的以太网地址
pub fn mac_to_ethernet_address(mac: &MacAddress) -> EthernetAddress {
    EthernetAddress(*mac.as_bytes())
}

/// 基于 [`EthernetAdapter`] 的 smoltcp 设备
pub struct AdapterDevice<'d> {
    adapter: &'d EthernetAdapter,
}

impl<'d> AdapterDevice<'d> {
    /// 包装适配器
    pub fn new(adapter: &'d EthernetAdapter) -> Self {
        Self { adapter }
    }
}

impl Device for AdapterDevice<'_> {
    type RxToken<'a>
        = FrameRxToken
    where
        Self: 'a;
    type TxToken<'a>
        = FrameTxToken<'a>
    where
        Self: 'a;

    fn capabilities(&self) -> DeviceCapabilities {
        let mut caps = DeviceCapabilities::default();
        caps.medium = Medium::Ethernet;
        // 以太网介质的 MTU 包含帧头
        caps.max_transmission_unit = ETHERNET_MTU + ETHERNET_HEADER_SIZE;
        caps.max_burst_size = Some(1);
        caps
    }

    fn receive(&mut self, _timestamp: Instant) -> Option<(Self::RxToken<'_>, Self::TxToken<'_>)> {
        let mut frame = Frame::new();
        match self.adapter.receive(&mut frame) {
            Ok(_) => Some((
                FrameRxToken { frame },
                FrameTxToken {
                    adapter: self.adapter,
                },
            )),
            Err(EthError::NoFrameAvailable) => None,
            Err(e) => {
                log::warn!("stack: receive failed: {}", e);
                None
            }
        }
    }

    fn transmit(&mut self, _timestamp: Instant) -> Option<Self::TxToken<'_>> {
        if !self.adapter.is_send_ready() {
            return None;
        }
        Some(FrameTxToken {
            adapter: self.adapter,
        })
    }
}

/// 已接收帧的令牌
pub struct FrameRxToken {
    frame: Frame,
}

impl RxToken for FrameRxToken {
    fn consume<R, F>(self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        f(self.frame.as_slice())
    }
}

/// 发送令牌
pub struct FrameTxToken<'a> {
    adapter: &'a EthernetAdapter,
}

impl TxToken for FrameTxToken<'_> {
    fn consume<R, F>(self, len: usize, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        let mut frame = Frame::new();
        debug_assert!(
            len <= frame.capacity(),
            "tx token asked for {} bytes, buffer holds {}",
            len,
            frame.capacity()
        );
        if len > frame.capacity() {
            log::warn!("stack: tx frame of {} bytes truncated to {}", len, frame.capacity());
        }
        frame.set_len(len);
        let result = f(frame.as_mut_slice());
        if let Err(e) = self.adapter.send(&frame) {
            log::debug!("stack: dropped {} byte frame: {}", len, e);
        }
        result
    }
}
