//! Keyed UI strings with per-key runtime overrides.

use std::collections::BTreeMap;

pub const GENERATING_MAP_KEY: &str = "GeneratingMap";
pub const LOADING_MESSAGE_KEY_PREFIX: &str = "MapReroll_loading";

const SILLY_LOADING_MESSAGES: [&str; 8] = [
    "Reticulating rock strata",
    "Misplacing the geysers",
    "Convincing the ore to move",
    "Reshuffling the crash site",
    "Recounting colonists",
    "Bribing the storyteller",
    "Sweeping away the old map",
    "Planting suspiciously convenient trees",
];

#[derive(Clone, Debug, Default)]
pub struct Language {
    translations: BTreeMap<String, String>,
    keyed_replacements: BTreeMap<String, String>,
}

impl Language {
    pub fn english() -> Self {
        let mut language = Self::default();
        language.insert(GENERATING_MAP_KEY, "Generating map");
        for (index, message) in SILLY_LOADING_MESSAGES.iter().enumerate() {
            language.insert(&format!("{LOADING_MESSAGE_KEY_PREFIX}{index}"), message);
        }
        language
    }

    pub fn insert(&mut self, key: &str, text: &str) {
        self.translations.insert(key.to_string(), text.to_string());
    }

    pub fn can_translate(&self, key: &str) -> bool {
        self.keyed_replacements.contains_key(key) || self.translations.contains_key(key)
    }

    /// Replacement wins over the stock translation; unknown keys echo back.
    pub fn translate(&self, key: &str) -> String {
        self.keyed_replacements
            .get(key)
            .or_else(|| self.translations.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn set_replacement(&mut self, key: &str, text: String) {
        self.keyed_replacements.insert(key.to_string(), text);
    }

    pub fn replacement(&self, key: &str) -> Option<&str> {
        self.keyed_replacements.get(key).map(String::as_str)
    }

    pub fn clear_replacement(&mut self, key: &str) -> Option<String> {
        self.keyed_replacements.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_shadows_stock_translation() {
        let mut language = Language::english();
        assert_eq!(language.translate(GENERATING_MAP_KEY), "Generating map");

        language.set_replacement(GENERATING_MAP_KEY, "Bribing the storyteller".to_string());
        assert_eq!(language.translate(GENERATING_MAP_KEY), "Bribing the storyteller");
    }

    #[test]
    fn unknown_keys_echo_and_are_not_translatable() {
        let language = Language::english();
        assert!(!language.can_translate("MapReroll_loading99"));
        assert_eq!(language.translate("MapReroll_loading99"), "MapReroll_loading99");
        assert!(language.can_translate("MapReroll_loading0"));
    }
}
