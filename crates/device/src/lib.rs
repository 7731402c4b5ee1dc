//! 网络设备框架
//!
//! 此 crate 提供网络设备的抽象接口和通用实现，包括：
//!
//! - [`NetDevice`] trait - 网络设备接口，由具体的硬件驱动实现
//! - [`NetDeviceRegistry`] - 按编号查找设备的注册表，以及全局实例 [`NETWORK_DEVICES`]
//! - [`Frame`] - 调用者持有的单帧缓冲区
//! - [`RxFrameQueue`] - 中断上下文向轮询路径移交接收帧的有界队列
//! - [`NullNetDevice`] / [`LoopbackNetDevice`] - 缺省设备与软件回环设备
//!
//! 具体网卡的寄存器编程、DMA 描述符布局与中断控制器接线不属于此 crate，
//! 它们只通过 [`NetDevice`] 接口被使用。

#![no_std]
#![allow(clippy::module_inception)]

extern crate alloc;

pub mod net;

// Re-export net
pub use net::{
    Frame, LinkDuplex, LinkSpeed, LinkState, LoopbackNetDevice, MacAddress, NETWORK_DEVICES,
    NetDevice, NetDeviceError, NetDeviceRegistry, NullNetDevice, RxFrameQueue,
    add_network_device, get_net_device, get_net_devices,
};
