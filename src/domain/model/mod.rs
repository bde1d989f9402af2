pub mod outcome;
pub mod package;
pub mod report;
pub mod status;
pub mod verification;

pub use outcome::*;
pub use package::*;
pub use report::*;
pub use status::*;
pub use verification::*;
