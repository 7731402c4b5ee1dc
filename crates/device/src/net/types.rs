//! 网络设备的基础类型：MAC 地址与链路状态

use core::fmt;

/// 6 字节的以太网 MAC 地址
///
/// 由设备持有，初始化后不再改变；适配层只以只读引用对外暴露。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// 全零地址，用于尚未从硬件读取到地址的设备
    pub const UNSPECIFIED: MacAddress = MacAddress([0; 6]);

    /// 广播地址
    pub const BROADCAST: MacAddress = MacAddress([0xff; 6]);

    /// 从字节数组创建
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// 从切片创建，长度不是 6 时返回 None
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 6]>::try_from(bytes).ok().map(Self)
    }

    /// 原始字节
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// 是否为广播地址
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// 是否为组播地址（含广播）
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// 是否为单播地址
    pub fn is_unicast(&self) -> bool {
        !self.is_multicast() && *self != Self::UNSPECIFIED
    }

    /// 是否为本地管理地址
    pub fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// 协商得到的链路速率
///
/// 判别值与 Mbps 数值一致，可直接跨 C 边界传递。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkSpeed {
    /// 链路断开或尚未刷新
    #[default]
    Unknown = 0,
    /// 10 Mbps
    Mbps10 = 10,
    /// 100 Mbps
    Mbps100 = 100,
    /// 1000 Mbps
    Mbps1000 = 1000,
}

impl LinkSpeed {
    /// 以 Mbps 表示的速率，未知时返回 None
    pub fn as_mbps(self) -> Option<u32> {
        match self {
            LinkSpeed::Unknown => None,
            speed => Some(speed as u32),
        }
    }

    /// 从 Mbps 数值转换，不认识的数值视为未知
    pub fn from_mbps(mbps: u32) -> Self {
        match mbps {
            10 => LinkSpeed::Mbps10,
            100 => LinkSpeed::Mbps100,
            1000 => LinkSpeed::Mbps1000,
            _ => LinkSpeed::Unknown,
        }
    }
}

impl fmt::Display for LinkSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_mbps() {
            Some(mbps) => write!(f, "{} Mbps", mbps),
            None => f.write_str("unknown"),
        }
    }
}

/// 链路双工模式
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkDuplex {
    /// 未知
    #[default]
    Unknown,
    /// 半双工
    Half,
    /// 全双工
    Full,
}

/// 由 PHY 状态得到的链路观测值
///
/// - `Down`：链路断开
/// - `Up(LinkSpeed::Unknown, _)`：链路已连通但速率未知
/// - `Up(speed, duplex)`：链路已连通且速率已刷新
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkState {
    /// 链路断开
    #[default]
    Down,
    /// 链路连通
    Up(LinkSpeed, LinkDuplex),
}

impl LinkState {
    /// 链路是否连通
    pub fn is_up(&self) -> bool {
        matches!(self, LinkState::Up(..))
    }

    /// 链路速率，链路断开时总是 [`LinkSpeed::Unknown`]
    pub fn speed(&self) -> LinkSpeed {
        match self {
            LinkState::Down => LinkSpeed::Unknown,
            LinkState::Up(speed, _) => *speed,
        }
    }

    /// 双工模式，链路断开时总是 [`LinkDuplex::Unknown`]
    pub fn duplex(&self) -> LinkDuplex {
        match self {
            LinkState::Down => LinkDuplex::Unknown,
            LinkState::Up(_, duplex) => *duplex,
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Down => f.write_str("down"),
            LinkState::Up(speed, LinkDuplex::Unknown) => write!(f, "up, {}", speed),
            LinkState::Up(speed, LinkDuplex::Half) => write!(f, "up, {} half duplex", speed),
            LinkState::Up(speed, LinkDuplex::Full) => write!(f, "up, {} full duplex", speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_mac_address_display_and_classes() {
        let mac = MacAddress::new([0x02, 0x00, 0x5e, 0x10, 0xab, 0xcd]);
        assert_eq!(mac.to_string(), "02:00:5e:10:ab:cd");
        assert!(mac.is_unicast());
        assert!(mac.is_local());
        assert!(!mac.is_multicast());

        assert!(MacAddress::BROADCAST.is_broadcast());
        assert!(MacAddress::BROADCAST.is_multicast());
        assert!(!MacAddress::UNSPECIFIED.is_unicast());
    }

    #[test]
    fn test_mac_address_from_slice_length() {
        assert_eq!(
            MacAddress::from_slice(&[1, 2, 3, 4, 5, 6]),
            Some(MacAddress::new([1, 2, 3, 4, 5, 6]))
        );
        assert_eq!(MacAddress::from_slice(&[1, 2, 3]), None);
    }

    #[test]
    fn test_link_speed_mbps_conversion() {
        assert_eq!(LinkSpeed::from_mbps(100), LinkSpeed::Mbps100);
        assert_eq!(LinkSpeed::from_mbps(2500), LinkSpeed::Unknown);
        assert_eq!(LinkSpeed::Mbps1000.as_mbps(), Some(1000));
        assert_eq!(LinkSpeed::Unknown.as_mbps(), None);
        assert_eq!(LinkSpeed::Mbps10.to_string(), "10 Mbps");
    }

    #[test]
    fn test_link_state_down_has_unknown_speed() {
        assert!(!LinkState::Down.is_up());
        assert_eq!(LinkState::Down.speed(), LinkSpeed::Unknown);
        assert_eq!(LinkState::Down.duplex(), LinkDuplex::Unknown);

        let up = LinkState::Up(LinkSpeed::Mbps100, LinkDuplex::Full);
        assert!(up.is_up());
        assert_eq!(up.speed(), LinkSpeed::Mbps100);
        assert_eq!(up.duplex(), LinkDuplex::Full);
        assert_eq!(up.to_string(), "up, 100 Mbps full duplex");
        assert_eq!(LinkState::Down.to_string(), "down");
    }
}
