pub mod bot;
pub mod telegram;
pub mod transport;
pub mod webhook;

mod correlator;
mod lifecycle;
mod sampler;
mod scorer;
mod store;

pub use bot::{Bot, Config};
pub use telegram::Telegram;
