pub mod join;
pub mod leave;
pub mod now_playing;
pub mod pause;
pub mod play;
pub mod previous;
pub mod queue;
pub mod repeat;
pub mod replay;
pub mod resume;
pub mod seek;
pub mod shuffle;
pub mod skip;
pub mod skip_to;
pub mod stop;
pub mod stream;
pub mod volume;

pub mod audio_sources;
pub mod utils;

use crate::{CommandResult, Context};
