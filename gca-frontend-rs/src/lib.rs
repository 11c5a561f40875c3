#[cfg(target_arch = "wasm32")]
mod browser_cache;
mod config;
#[cfg(target_arch = "wasm32")]
mod service_worker;
mod utils;

use std::sync::LazyLock;

use astate::{AbstractState, Openness, Role};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use browser_cache::Offline;
pub use config::{FrontendConfig, StorageBackend};
#[cfg(target_arch = "wasm32")]
pub use service_worker::ServiceWorker;

// putting this inside LOGGER prevents us from accidentally initializing the logger more than once
#[allow(clippy::declare_interior_mutable_const)]
const LOGGER: LazyLock<()> = LazyLock::new(|| {
    utils::set_panic_hook();

    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Logging initialized");
});

#[cfg_attr(not(target_arch = "wasm32"), expect(unused))] // only used for wasm build
pub(crate) fn init_logging() {
    // used to only initialize the logger once
    #[allow(clippy::borrow_interior_mutable_const)]
    *LOGGER;
}

#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error(transparent)]
    Offline(#[from] offline::OfflineError),

    #[error(transparent)]
    Shell(#[from] shell_cache::ShellError),

    #[error(transparent)]
    State(#[from] astate::StateError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no usable storage: {0}")]
    Storage(String),

    #[error("could not convert to a JavaScript value: {0}")]
    Js(String),
}

impl From<FrontendError> for JsValue {
    fn from(error: FrontendError) -> Self {
        log::error!("{error}");
        JsValue::from_str(&error.to_string())
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = possibleNextStates))]
pub fn possible_next_states(role: Role, is_open: bool, from: AbstractState) -> Vec<AbstractState> {
    astate::possible_next_states(role, Openness::from_is_open(is_open), from).to_vec()
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = canTransition))]
pub fn can_transition(role: Role, is_open: bool, from: AbstractState, to: AbstractState) -> bool {
    astate::can_transition(role, Openness::from_is_open(is_open), from, to)
}

/// Accepts any string; unknown states are shown as they are.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = stateDisplayName))]
pub fn state_display_name(state: String) -> String {
    astate::display_name(&state)
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = noteCharactersLeft))]
pub fn note_characters_left(note: String) -> usize {
    astate::note_characters_left(&note)
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn get_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_loses_edit_rights_when_closed() {
        assert_eq!(
            possible_next_states(Role::Owner, true, AbstractState::InPreparation),
            vec![AbstractState::Submitted]
        );
        assert!(possible_next_states(Role::Owner, false, AbstractState::InPreparation).is_empty());
        assert!(can_transition(
            Role::Owner,
            false,
            AbstractState::InRevision,
            AbstractState::Submitted
        ));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(state_display_name("InPreparation".to_string()), "In Preparation");
        assert_eq!(state_display_name("Mystery".to_string()), "Mystery");
    }

    #[test]
    fn test_note_budget() {
        assert_eq!(note_characters_left("minor fixes".to_string()), 255 - 11);
    }
}
