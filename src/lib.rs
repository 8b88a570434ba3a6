pub mod app;
pub mod client;
pub mod error;
pub mod interface;
pub mod logging;
pub mod modal;
pub mod model;
pub mod session;
pub mod storage;
pub mod view;

#[cfg(feature = "no-wasm")]
pub mod config;

#[cfg(test)]
mod fake;

pub use app::App;

#[cfg(feature = "no-wasm")]
pub use client::request::NativeClient;
#[cfg(feature = "wasm")]
pub use client::gloo::WasmClient;
