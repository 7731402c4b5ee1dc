//! C 边界
//!
//! - 适配器接口：`eth_initialize`、`eth_send_frame`、`eth_receive_frame` 等，
//!   以布尔值表示成功与否
//! - 驱动接口：C 驱动通过 [`eth_register_driver`] 以回调表接入

mod adapter;
mod driver;

pub use adapter::{
    eth_get_link_speed, eth_get_mac_address, eth_initialize, eth_is_link_up,
    eth_is_send_frame_advisable, eth_last_error, eth_receive_frame, eth_send_frame,
    eth_update_phy, global_adapter, set_boot_driver,
};
pub use driver::{EthDriverOps, ForeignNetDevice, eth_register_driver};
