//! Growth path progress
//!
//! The player builds a character, then walks six steps. Reaching the end
//! awards the tasbih collectible. Progress survives reloads through the
//! key-value store.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::collection::CollectedItem;
use crate::error::StorageError;
use crate::persistence::{KeyValueStore, Versioned, load_versioned, save_versioned};

/// One stage of the path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
}

pub static STEPS: [Step; 6] = [
    Step { id: 1, title: "طلب (آغاز)", description: "قدم اول: خواستن" },
    Step { id: 2, title: "بصیرت", description: "شناخت مسیر" },
    Step { id: 3, title: "جهاد اکبر", description: "مبارزه با نفس" },
    Step { id: 4, title: "علم و معرفت", description: "کسب دانش" },
    Step { id: 5, title: "ایثار", description: "مقدم داشتن دیگران" },
    Step { id: 6, title: "شهادت", description: "اوج کمال" },
];

/// Reward for finishing the path
pub fn completion_reward() -> CollectedItem {
    CollectedItem::new(
        "item-tasbih",
        "تسبیح ملکوت",
        "tasbih",
        "پاداش صبر و استقامت در مسیر بندگی. ذکر خدا آرام‌بخش دل‌هاست.",
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinTone {
    Light,
    #[default]
    Medium,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Headwear {
    #[default]
    None,
    TurbanWhite,
    TurbanBlack,
    Scarf,
    Hat,
    Kufi,
    PirateHat,
    SpaceHelmet,
    ScholarCap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eyewear {
    #[default]
    None,
    Glasses,
    Sunglasses,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Beard {
    #[default]
    None,
    Stubble,
    Full,
    Long,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outfit {
    #[default]
    Casual,
    Suit,
    Abaya,
    Coat,
    Chador,
    Cleric,
    ShirtPants,
    ScholarGown,
}

/// Avatar choices. Field names match the page's saved JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterConfig {
    pub name: String,
    pub gender: Gender,
    pub skin_tone: SkinTone,
    pub headwear: Headwear,
    /// CSS color
    pub headwear_color: String,
    pub eyewear: Eyewear,
    pub beard: Beard,
    pub outfit: Outfit,
    /// Outfit color name
    pub color: String,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: Gender::default(),
            skin_tone: SkinTone::default(),
            headwear: Headwear::default(),
            headwear_color: "#374151".to_string(),
            eyewear: Eyewear::default(),
            beard: Beard::default(),
            outfit: Outfit::default(),
            color: "blue".to_string(),
        }
    }
}

/// Saved progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyState {
    pub character: CharacterConfig,
    /// Steps completed so far
    pub step: u32,
}

impl Versioned for JourneyState {
    const KEY: &'static str = "hamim_journey";
    const VERSION: u32 = 1;
    const LEGACY_KEY: Option<&'static str> = Some("hamim_game_state_v3");

    fn migrate(version: u32, data: Value) -> Result<Value, StorageError> {
        match version {
            // `{ charConfig, currentStep }`, possibly missing newer avatar fields
            0 => Ok(json!({
                "character": data.get("charConfig").cloned().unwrap_or_else(|| json!({})),
                "step": data.get("currentStep").cloned().unwrap_or_else(|| json!(0)),
            })),
            1 => Ok(data),
            found => Err(StorageError::UnsupportedVersion {
                found,
                latest: Self::VERSION,
            }),
        }
    }
}

/// Where the player is in the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyPhase {
    /// Building the character
    Start,
    Playing,
    Completed,
}

/// Growth path controller bound to a store
pub struct Journey {
    state: JourneyState,
    phase: JourneyPhase,
    store: Rc<dyn KeyValueStore>,
}

impl Journey {
    /// Resume saved progress, or start fresh.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let (state, phase) = match load_versioned::<JourneyState>(&*store) {
            Ok(Some(state)) => {
                let phase = if state.step as usize >= STEPS.len() {
                    JourneyPhase::Completed
                } else {
                    JourneyPhase::Playing
                };
                log::info!("Resumed journey at step {}", state.step);
                (state, phase)
            }
            Ok(None) => (JourneyState::default(), JourneyPhase::Start),
            Err(e) => {
                log::warn!("Discarding saved journey: {e}");
                (JourneyState::default(), JourneyPhase::Start)
            }
        };
        Self {
            state,
            phase,
            store,
        }
    }

    pub fn phase(&self) -> JourneyPhase {
        self.phase
    }

    pub fn character(&self) -> &CharacterConfig {
        &self.state.character
    }

    /// Steps completed so far
    pub fn step(&self) -> u32 {
        self.state.step
    }

    /// The next step to take, if any remain
    pub fn current_step(&self) -> Option<&'static Step> {
        STEPS.get(self.state.step as usize)
    }

    /// Edit the avatar. Saved immediately once the journey has begun.
    pub fn update_character(&mut self, edit: impl FnOnce(&mut CharacterConfig)) {
        edit(&mut self.state.character);
        if self.phase != JourneyPhase::Start {
            self.save();
        }
    }

    /// Begin the path. Rejects a blank name.
    pub fn start(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        self.state.character.name = name.to_string();
        self.state.step = 0;
        self.phase = JourneyPhase::Playing;
        log::info!("Journey started");
        self.save();
        true
    }

    /// Complete the current step. Returns the reward when this finishes the path.
    pub fn advance(&mut self) -> Option<CollectedItem> {
        if self.phase != JourneyPhase::Playing {
            return None;
        }
        self.state.step += 1;
        self.save();
        if self.state.step as usize == STEPS.len() {
            self.phase = JourneyPhase::Completed;
            log::info!("Journey completed");
            return Some(completion_reward());
        }
        None
    }

    /// Forget all progress, keeping the avatar for the next attempt.
    pub fn reset(&mut self) {
        self.phase = JourneyPhase::Start;
        self.state.step = 0;
        if let Err(e) = self.store.remove(JourneyState::KEY) {
            log::warn!("Failed to clear journey: {e}");
        }
    }

    fn save(&self) {
        if let Err(e) = save_versioned(&*self.store, &self.state) {
            log::warn!("Failed to save journey: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn fresh() -> (Rc<MemoryStore>, Journey) {
        let store = Rc::new(MemoryStore::new());
        let journey = Journey::load(store.clone());
        (store, journey)
    }

    #[test]
    fn test_blank_name_cannot_start() {
        let (_, mut journey) = fresh();
        assert!(!journey.start("   "));
        assert_eq!(journey.phase(), JourneyPhase::Start);
        assert!(journey.start("Ali"));
        assert_eq!(journey.phase(), JourneyPhase::Playing);
    }

    #[test]
    fn test_last_step_awards_tasbih_once() {
        let (_, mut journey) = fresh();
        assert!(journey.advance().is_none());
        journey.start("Zahra");
        for _ in 0..5 {
            assert!(journey.advance().is_none());
        }
        let reward = journey.advance().unwrap();
        assert_eq!(reward.id, "item-tasbih");
        assert_eq!(journey.phase(), JourneyPhase::Completed);
        assert!(journey.current_step().is_none());
        assert!(journey.advance().is_none());
        assert_eq!(journey.step(), 6);
    }

    #[test]
    fn test_progress_survives_reload() {
        let (store, mut journey) = fresh();
        journey.start("Reza");
        journey.advance();
        journey.advance();
        journey.update_character(|c| c.outfit = Outfit::Suit);

        let again = Journey::load(store);
        assert_eq!(again.step(), 2);
        assert_eq!(again.phase(), JourneyPhase::Playing);
        assert_eq!(again.character().outfit, Outfit::Suit);
        assert_eq!(again.current_step().map(|s| s.id), Some(3));
    }

    #[test]
    fn test_reset_clears_save() {
        let (store, mut journey) = fresh();
        journey.start("Reza");
        journey.advance();
        journey.reset();
        assert_eq!(journey.step(), 0);
        assert_eq!(journey.character().name, "Reza");
        assert!(store.is_empty());
        assert_eq!(Journey::load(store).phase(), JourneyPhase::Start);
    }

    #[test]
    fn test_legacy_save_merges_defaults() {
        let store = Rc::new(MemoryStore::new());
        store
            .set(
                "hamim_game_state_v3",
                r#"{"charConfig":{"name":"Sara","gender":"female","skinTone":"light"},"currentStep":6}"#,
            )
            .unwrap();
        let journey = Journey::load(store.clone());
        assert_eq!(journey.phase(), JourneyPhase::Completed);
        let c = journey.character();
        assert_eq!(c.name, "Sara");
        assert_eq!(c.gender, Gender::Female);
        assert_eq!(c.skin_tone, SkinTone::Light);
        assert_eq!(c.headwear_color, "#374151");
        assert_eq!(c.outfit, Outfit::Casual);
        assert_eq!(store.get("hamim_game_state_v3").unwrap(), None);
    }

    #[test]
    fn test_corrupt_save_starts_fresh() {
        let store = Rc::new(MemoryStore::new());
        store.set("hamim_journey", "]]").unwrap();
        let journey = Journey::load(store);
        assert_eq!(journey.phase(), JourneyPhase::Start);
        assert_eq!(journey.character(), &CharacterConfig::default());
    }
}
