mod list_component;
mod session;
mod state;

pub use list_component::{DEFAULT_EMPTY_TEXT, DEFAULT_HEADING_PREFIX, SuggestionList};
pub use session::{SessionChange, SuggestionSession, TriggerConfig, TriggerController};
pub use state::{Direction, DisplayRow, PresenterAction, SuggestionListState};
