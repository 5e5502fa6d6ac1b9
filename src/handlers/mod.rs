pub mod health;
pub mod diagnostics;
pub mod execute;
pub mod room;

pub use health::*;
pub use diagnostics::*;
pub use execute::*;
pub use room::*;
