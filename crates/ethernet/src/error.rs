//! 适配层错误类型
//!
//! 适配层内部以 [`EthResult`] 传递错误；C 边界上所有失败都折叠为 `false`，
//! 具体原因可通过 [`EthError::status_code`] 得到的状态码查询。

use core::fmt;

use device::NetDeviceError;

/// 适配层结果类型
pub type EthResult<T> = Result<T, EthError>;

/// 适配层错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthError {
    /// 初始化时没有找到可用的硬件 (-ENODEV)
    DeviceAbsent,
    /// 已经绑定过设备，重复初始化属于编程错误 (-EBUSY)
    AlreadyBound,
    /// 尚未绑定设备就调用了需要设备的操作 (-ENXIO)
    NotBound,
    /// 发送被拒绝：发送环已满、长度非法或传输失败 (-ENOBUFS)
    TransmitRejected(NetDeviceError),
    /// 当前没有待接收的帧，这是正常结果 (-EAGAIN)
    NoFrameAvailable,
    /// 接收缓冲区小于一帧的最大尺寸 (-EINVAL)
    BufferTooSmall,
    /// 设备报告接收失败 (-EIO)
    ReceiveFailed(NetDeviceError),
    /// PHY 读取在传输层失败 (-EREMOTEIO)
    PhyReadFailed,
}

impl EthError {
    /// 是否属于编程错误，应当以断言处理
    pub fn is_fatal(&self) -> bool {
        matches!(self, EthError::AlreadyBound)
    }

    /// 调用者能否通过重试恢复
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EthError::DeviceAbsent
                | EthError::TransmitRejected(_)
                | EthError::NoFrameAvailable
                | EthError::ReceiveFailed(_)
                | EthError::PhyReadFailed
        )
    }

    /// 转换为 C 边界使用的状态码（负数）
    pub fn status_code(&self) -> i32 {
        match self {
            EthError::DeviceAbsent => -19,
            EthError::AlreadyBound => -16,
            EthError::NotBound => -6,
            EthError::TransmitRejected(_) => -105,
            EthError::NoFrameAvailable => -11,
            EthError::BufferTooSmall => -22,
            EthError::ReceiveFailed(_) => -5,
            EthError::PhyReadFailed => -121,
        }
    }
}

impl fmt::Display for EthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EthError::DeviceAbsent => f.write_str("no network device found"),
            EthError::AlreadyBound => f.write_str("network device already bound"),
            EthError::NotBound => f.write_str("no network device bound"),
            EthError::TransmitRejected(e) => write!(f, "transmit rejected: {}", e),
            EthError::NoFrameAvailable => f.write_str("no frame available"),
            EthError::BufferTooSmall => f.write_str("receive buffer too small"),
            EthError::ReceiveFailed(e) => write!(f, "receive failed: {}", e),
            EthError::PhyReadFailed => f.write_str("PHY read failed"),
        }
    }
}
