//! 网络设备注册表

use alloc::{sync::Arc, vec::Vec};
use sync::SpinLock;

use super::config::MAX_NET_DEVICES;
use super::net_device::{NetDevice, NetDeviceError};

/// 网络设备注册表
///
/// 负责存储系统中的网络设备，并按登记顺序分配编号。
/// 设备一经登记便不再移除，编号在进程生命周期内保持不变。
pub struct NetDeviceRegistry {
    devices: SpinLock<Vec<Arc<dyn NetDevice>>>,
}

impl NetDeviceRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            devices: SpinLock::new(Vec::with_capacity(MAX_NET_DEVICES)),
        }
    }

    /// 登记设备，返回分配到的编号
    ///
    /// 超过 [`MAX_NET_DEVICES`] 时返回 [`NetDeviceError::QueueFull`]
    pub fn register(&self, device: Arc<dyn NetDevice>) -> Result<usize, NetDeviceError> {
        let mut devices = self.devices.lock();
        if devices.len() >= MAX_NET_DEVICES {
            log::warn!(
                "net: registry full, rejecting device {}",
                device.name()
            );
            return Err(NetDeviceError::QueueFull);
        }
        let index = devices.len();
        log::info!("net: registered device {} as #{}", device.name(), index);
        devices.push(device);
        Ok(index)
    }

    /// 按编号查找设备
    pub fn get(&self, index: usize) -> Option<Arc<dyn NetDevice>> {
        self.devices.lock().get(index).cloned()
    }

    /// 已登记的设备数量
    pub fn len(&self) -> usize {
        self.devices.lock().len()
    }

    /// 是否没有登记任何设备
    pub fn is_empty(&self) -> bool {
        self.devices.lock().is_empty()
    }

    /// 所有已登记设备的快照
    pub fn devices(&self) -> Vec<Arc<dyn NetDevice>> {
        self.devices.lock().clone()
    }
}

impl Default for NetDeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
