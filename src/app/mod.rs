pub mod service;

pub use service::{CartApi, CartService};
