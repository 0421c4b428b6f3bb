//! Domain services over the persistence layer

pub mod import;
pub mod insight;
pub mod master;
