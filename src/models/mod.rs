pub mod quote;
pub mod request;
pub mod response;
pub mod symbol;

pub use quote::*;
pub use request::*;
pub use response::*;
pub use symbol::*;
