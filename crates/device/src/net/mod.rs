//! 网络设备模块
//!
//! 定义网络设备接口、注册表与参考设备实现

pub mod config;
mod frame;
mod loopback;
mod net_device;
mod null_net;
mod registry;
mod rx_queue;
mod types;

use alloc::{sync::Arc, vec::Vec};
use lazy_static::lazy_static;

pub use frame::Frame;
pub use loopback::LoopbackNetDevice;
pub use net_device::{NetDevice, NetDeviceError};
pub use null_net::NullNetDevice;
pub use registry::NetDeviceRegistry;
pub use rx_queue::RxFrameQueue;
pub use types::{LinkDuplex, LinkSpeed, LinkState, MacAddress};

lazy_static! {
    /// 全局网络设备注册表
    ///
    /// 驱动初始化成功后在此登记，适配层按编号（当前只使用 0 号）取回设备
    pub static ref NETWORK_DEVICES: NetDeviceRegistry = NetDeviceRegistry::new();
}

/// 添加网络设备到全局注册表，返回分配到的编号
pub fn add_network_device(device: Arc<dyn NetDevice>) -> Result<usize, NetDeviceError> {
    NETWORK_DEVICES.register(device)
}

/// 按编号获取全局注册表中的网络设备
pub fn get_net_device(index: usize) -> Option<Arc<dyn NetDevice>> {
    NETWORK_DEVICES.get(index)
}

/// 获取所有网络设备
pub fn get_net_devices() -> Vec<Arc<dyn NetDevice>> {
    NETWORK_DEVICES.devices()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::init_sync_arch_ops;

    // 全局注册表只在这一个用例中修改
    #[test]
    fn test_global_registry_helpers() {
        init_sync_arch_ops();
        let mac = MacAddress::new([0x02, 0, 0, 0, 0x77, 0x01]);
        let index = add_network_device(LoopbackNetDevice::new(mac)).unwrap();

        let device = get_net_device(index).unwrap();
        assert_eq!(device.name(), "lo");
        assert_eq!(*device.mac_address(), mac);
        assert!(get_net_device(index + 1).is_none());

        let all = get_net_devices();
        assert_eq!(all.len(), NETWORK_DEVICES.len());
        assert!(all.iter().any(|d| Arc::ptr_eq(d, &device)));
    }
}
