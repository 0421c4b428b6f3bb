//! SeaORM entity definitions

pub mod prelude;

pub mod insights;
pub mod master_options;
pub mod users;
