pub mod display_buffer;
pub mod keymap;
pub mod label;
pub mod logging;
pub mod overlay;
pub mod sample_loop;
pub mod settings;
pub mod surface;

pub use display_buffer::DisplayBuffer;
pub use label::{KeyLabelResolver, Label};
pub use sample_loop::{LoopState, SampleLoop, TickReport};
