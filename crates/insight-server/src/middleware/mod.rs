// HTTP middleware implementations

pub mod auth; // Token validation, fills the AuthContext read by secured!
