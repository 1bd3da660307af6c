#![allow(dead_code)]

pub mod api_client;
pub mod test_context;
