//! Loading-screen text shown while a rerolled map generates.

use rand_chacha::ChaCha8Rng;

use crate::language::{GENERATING_MAP_KEY, LOADING_MESSAGE_KEY_PREFIX, Language};
use crate::mapgen::seed::random_index;
use crate::settings::RerollSettings;

/// A loading-message override in effect, with whatever text it displaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadingMessageOverride {
    pub key: String,
    previous: Option<String>,
}

/// Swaps the map-generation text for a random reroll message.
pub fn install_loading_message(
    language: &mut Language,
    settings: &RerollSettings,
    rng: &mut ChaCha8Rng,
) -> Option<LoadingMessageOverride> {
    if !settings.use_silly_loading_messages || settings.num_loading_messages == 0 {
        return None;
    }
    let index = random_index(rng, settings.num_loading_messages as usize);
    let key = format!("{LOADING_MESSAGE_KEY_PREFIX}{index}");
    if !language.can_translate(&key) {
        return None;
    }
    let text = language.translate(&key);
    let previous = language.replacement(GENERATING_MAP_KEY).map(str::to_string);
    language.set_replacement(GENERATING_MAP_KEY, text);
    Some(LoadingMessageOverride { key, previous })
}

/// Puts back the text that was shown before the override was installed.
pub fn restore_loading_message(language: &mut Language, installed: LoadingMessageOverride) {
    match installed.previous {
        Some(previous) => language.set_replacement(GENERATING_MAP_KEY, previous),
        None => {
            language.clear_replacement(GENERATING_MAP_KEY);
        }
    }
}
