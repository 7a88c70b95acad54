pub mod money;
pub mod pii;

pub use money::{format_dong, parse_dong, parse_whole_number, Dong};
pub use pii::Masked;
