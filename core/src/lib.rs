pub use audio::{Audio, NullAudio};
pub use chip8::{Chip8, Config};
pub use error::VmError;
pub use framebuffer::FrameBuffer;

mod audio;
mod chip8;
pub mod constants;
mod error;
mod framebuffer;
mod instruction;
mod keypad;
mod opcode;
mod operations;
mod state;
