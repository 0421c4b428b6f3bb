// API handlers
// Reads are public; writes go through the secured! guard

pub mod auth;
pub mod health;
pub mod insight;
pub mod master;
pub mod multipart;
pub mod route;
pub mod upload;
