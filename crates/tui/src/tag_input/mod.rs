mod component;
mod placement;
mod state;

pub use component::TagInput;
pub use placement::{POPUP_MAX_ROWS, popup_area};
pub use state::{SelectOutcome, TagHitbox, TagInputConfig, TagInputState, TagRef};
