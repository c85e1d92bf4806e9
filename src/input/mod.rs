pub mod handler;

pub use handler::{Controls, HeldKeys, InputHandler, KeyAction};
