//! Authorization models.

pub mod role;
