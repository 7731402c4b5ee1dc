//! 空网络设备
//!
//! 代表“硬件不存在”：初始化总是失败，所有查询都报告未就绪。

use super::net_device::{NetDevice, NetDeviceError};
use super::types::{LinkSpeed, MacAddress};

/// 空网络设备
pub struct NullNetDevice;

impl NetDevice for NullNetDevice {
    fn initialize(&self) -> Result<(), NetDeviceError> {
        Err(NetDeviceError::NotPresent)
    }

    fn mac_address(&self) -> &MacAddress {
        &MacAddress::UNSPECIFIED
    }

    fn is_send_ready(&self) -> bool {
        false
    }

    fn send_frame(&self, _frame: &[u8]) -> Result<(), NetDeviceError> {
        Err(NetDeviceError::DeviceNotReady)
    }

    fn receive_frame(&self, _buf: &mut [u8]) -> Result<Option<usize>, NetDeviceError> {
        Ok(None)
    }

    fn is_link_up(&self) -> bool {
        false
    }

    fn link_speed(&self) -> LinkSpeed {
        LinkSpeed::Unknown
    }

    fn update_phy(&self) -> Result<(), NetDeviceError> {
        Err(NetDeviceError::NotPresent)
    }

    fn name(&self) -> &str {
        "null"
    }
}
