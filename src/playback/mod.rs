pub mod audio;
pub mod controller;

pub use audio::{AudioOutput, NullOutput, OutputEvent, PlaybackToken, RodioOutput};
pub use controller::{PlaybackController, PlaybackEvent, PlaybackState};
