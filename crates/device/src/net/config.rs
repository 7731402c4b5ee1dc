//! 网络设备层的编译期配置

/// 接收缓冲区的最小容量（字节）
///
/// 调用者传给接收接口的缓冲区必须不小于该值。
pub const FRAME_BUFFER_SIZE: usize = 1600;

/// 以太网帧头长度（目的 MAC + 源 MAC + EtherType）
pub const ETHERNET_HEADER_SIZE: usize = 14;

/// 以太网 MTU（不含帧头）
pub const ETHERNET_MTU: usize = 1500;

/// 可发送的最大链路层帧长度（含帧头与 VLAN 标签，不含 FCS）
pub const MAX_FRAME_SIZE: usize = ETHERNET_MTU + ETHERNET_HEADER_SIZE + 4;

/// 注册表最多容纳的网络设备数量
pub const MAX_NET_DEVICES: usize = 5;

/// 接收移交队列的默认深度（帧）
pub const RX_QUEUE_DEPTH: usize = 32;

const _: () = assert!(MAX_FRAME_SIZE <= FRAME_BUFFER_SIZE);
