pub use client::{fetch, Config};
pub use error::{Class, Error, Result};

pub mod error;

pub mod resolve;
pub mod connect;

pub mod session;
pub mod identity;

pub mod request;
pub mod exchange;

pub mod client;
