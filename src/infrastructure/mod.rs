pub mod fullscreen;

pub use fullscreen::{Fullscreen, NoopFullscreen, TerminalFullscreen};
