use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    ChatMessage, EntryAnalysis, JournalEntry, MessageKind, Sentiment, Settings, UserProfile,
};
use crate::storage::Storage;
use crate::utils::config;

// Canonical storage keys. The entry list lives under a single key,
// most-recent-first.
pub const ENTRIES_KEY: &str = "mind-haven-entries";
pub const CHAT_HISTORY_KEY: &str = "mind-haven-chat-history";
pub const PROFILE_KEY: &str = "mind-haven-user";
pub const SETTINGS_KEY: &str = "mind-haven-settings";

type Subscriber = Box<dyn Fn(&[JournalEntry]) + Send + Sync>;

/// The only durable state in the system: journal entries, chat history,
/// profile and settings, behind an injected key-value storage. Observers
/// registered with `subscribe` run after every entry-list mutation.
pub struct JournalStore {
    storage: Arc<dyn Storage>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl JournalStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, subscriber: impl Fn(&[JournalEntry]) + Send + Sync + 'static) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(Box::new(subscriber));
        }
    }

    pub fn entries(&self) -> Result<Vec<JournalEntry>> {
        Ok(self.load(ENTRIES_KEY)?.unwrap_or_default())
    }

    pub fn add_entry(
        &self,
        mood: u8,
        content: String,
        sentiment: Sentiment,
        emotions: Vec<String>,
        analysis: Option<EntryAnalysis>,
    ) -> Result<JournalEntry> {
        let mut entries = self.entries()?;
        let now = Utc::now();

        // Ids must stay strictly increasing even for same-millisecond saves.
        let mut id = now.timestamp_millis();
        if let Some(latest) = entries.first() {
            if id <= latest.id {
                id = latest.id + 1;
            }
        }

        let entry = JournalEntry {
            id,
            date: now,
            mood,
            content,
            sentiment,
            emotions,
            analysis,
        };
        entries.insert(0, entry.clone());
        self.save(ENTRIES_KEY, &entries)?;
        self.notify(&entries);
        Ok(entry)
    }

    pub fn chat_history(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.load(CHAT_HISTORY_KEY)?.unwrap_or_default())
    }

    pub fn append_chat(&self, kind: MessageKind, content: String) -> Result<ChatMessage> {
        let mut history = self.chat_history()?;
        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            kind,
            content,
            timestamp: Utc::now(),
        };
        history.push(message.clone());
        self.save(CHAT_HISTORY_KEY, &history)?;
        Ok(message)
    }

    pub fn profile(&self) -> Result<Option<UserProfile>> {
        self.load(PROFILE_KEY)
    }

    pub fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        self.save(PROFILE_KEY, profile)
    }

    pub fn settings(&self) -> Result<Settings> {
        let mut settings: Settings = self.load(SETTINGS_KEY)?.unwrap_or_default();
        config::apply_env_defaults(&mut settings);
        Ok(settings)
    }

    pub fn set_settings(&self, settings: &Settings) -> Result<()> {
        self.save(SETTINGS_KEY, settings)
    }

    /// "Clear all data": removes entries and chat history in one sweep.
    pub fn clear_all(&self) -> Result<()> {
        self.storage.remove(ENTRIES_KEY)?;
        self.storage.remove(CHAT_HISTORY_KEY)?;
        self.notify(&[]);
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.storage.get(key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    log::warn!("discarding undecodable value under '{}': {}", key, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.storage.set(key, &serde_json::to_string(value)?)
    }

    fn notify(&self, entries: &[JournalEntry]) {
        if let Ok(subscribers) = self.subscribers.lock() {
            for subscriber in subscribers.iter() {
                subscriber(entries);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> JournalStore {
        JournalStore::new(Arc::new(MemoryStorage::new()))
    }

    fn add_plain_entry(store: &JournalStore, mood: u8) -> JournalEntry {
        store
            .add_entry(
                mood,
                "content".to_string(),
                Sentiment::Neutral,
                vec!["calm".to_string()],
                None,
            )
            .unwrap()
    }

    #[test]
    fn entries_are_prepended_with_strictly_increasing_ids() {
        let store = store();
        let first = add_plain_entry(&store, 5);
        let second = add_plain_entry(&store, 7);
        let third = add_plain_entry(&store, 3);

        assert!(second.id > first.id);
        assert!(third.id > second.id);

        let entries = store.entries().unwrap();
        assert_eq!(
            entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![third.id, second.id, first.id]
        );
    }

    #[test]
    fn subscribers_run_on_every_mutation() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        add_plain_entry(&store, 5);
        add_plain_entry(&store, 6);
        store.clear_all().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn clear_all_wipes_entries_and_chat() {
        let store = store();
        add_plain_entry(&store, 5);
        store
            .append_chat(MessageKind::User, "hello".to_string())
            .unwrap();

        store.clear_all().unwrap();

        assert!(store.entries().unwrap().is_empty());
        assert!(store.chat_history().unwrap().is_empty());
    }

    #[test]
    fn chat_history_appends_in_order() {
        let store = store();
        store
            .append_chat(MessageKind::User, "hi".to_string())
            .unwrap();
        store
            .append_chat(MessageKind::Ai, "hello there".to_string())
            .unwrap();

        let history = store.chat_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, MessageKind::User);
        assert_eq!(history[1].kind, MessageKind::Ai);
    }

    #[test]
    fn undecodable_payloads_fall_back_to_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(ENTRIES_KEY, "not json").unwrap();
        let store = JournalStore::new(storage);
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn profile_round_trips() {
        let store = store();
        assert!(store.profile().unwrap().is_none());

        let profile = UserProfile {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        store.set_profile(&profile).unwrap();
        assert_eq!(store.profile().unwrap().unwrap().name, "Ada");
    }
}
