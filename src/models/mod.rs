// Domain records and request/response shapes

pub mod achievement;
pub mod dashboard;
pub mod goal;
pub mod milestone;
pub mod plan;
pub mod quote;
pub mod streak;
pub mod user;
pub mod workout;

pub use achievement::*;
pub use dashboard::*;
pub use goal::*;
pub use milestone::*;
pub use plan::*;
pub use quote::*;
pub use streak::*;
pub use user::*;
pub use workout::*;
