mod filters;
mod project;
mod timesheet;
mod user;

pub use filters::*;
pub use project::*;
pub use timesheet::*;
pub use user::*;
