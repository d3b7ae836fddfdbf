mod cell;
mod entry;
mod hours;
mod ids;
mod project;
mod row;
mod user;

pub use cell::*;
pub use entry::*;
pub use hours::*;
pub use ids::*;
pub use project::*;
pub use row::*;
pub use user::*;
