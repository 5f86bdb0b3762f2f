//! 分销领域模型

mod affiliate;
mod commission_order;
mod enums;
mod order;
mod setting;

pub use affiliate::*;
pub use commission_order::*;
pub use enums::*;
pub use order::*;
pub use setting::*;
