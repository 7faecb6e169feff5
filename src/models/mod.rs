pub mod dashboard;
pub mod order;
pub mod report;
pub mod response;

pub use dashboard::*;
pub use order::*;
pub use report::*;
pub use response::*;
