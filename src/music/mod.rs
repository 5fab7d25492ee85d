//! Note parsing and pitch math.

mod note;

pub use note::{ParseError, Pitch, note_number_to_frequency, note_to_number};
