pub mod health;
pub mod diagnostics;
pub mod execute;
pub mod error;
pub mod messages;
pub mod room;

pub use health::*;
pub use diagnostics::*;
pub use execute::*;
pub use error::*;
pub use messages::*;
pub use room::*;
