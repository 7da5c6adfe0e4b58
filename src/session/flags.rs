use std::{collections::BTreeMap, fs, path::PathBuf, sync::Arc, sync::RwLock};

use anyhow::{Context, Result};
use log::error;
use tokio::sync::watch;

use crate::models::{Membership, Theme, UserInterests};

const ONBOARDING_COMPLETE: &str = "onboarding_complete";
const USER_AUTHENTICATED: &str = "user_authenticated";
const USER_MEMBERSHIP: &str = "user_membership";
const USER_INTERESTS: &str = "user_interests";
const THEME: &str = "theme";
const AUTH_TOKEN: &str = "auth_token";

struct FlagStoreInner {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
    /// Bumped on every successful write; the session resolver re-resolves on
    /// each bump instead of polling on a timer.
    revision: watch::Sender<u64>,
}

/// On-device flag storage: independent named string values, persisted as a
/// single JSON document. Readers never fail; a missing or unreadable flag
/// degrades to its default (`false`, `member`, dark theme).
#[derive(Clone)]
pub struct FlagStore {
    inner: Arc<FlagStoreInner>,
}

impl FlagStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read flags from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            BTreeMap::new()
        };

        let (revision, _) = watch::channel(0);

        Ok(Self {
            inner: Arc::new(FlagStoreInner {
                path,
                data: RwLock::new(data),
                revision,
            }),
        })
    }

    /// Receiver of the write revision; `changed()` resolves after any flag
    /// mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn onboarding_complete(&self) -> bool {
        self.get(ONBOARDING_COMPLETE).as_deref() == Some("true")
    }

    pub fn set_onboarding_complete(&self) -> Result<()> {
        self.set(ONBOARDING_COMPLETE, "true")
    }

    /// Clears the flag so the onboarding flow shows again. Used by the debug
    /// "view onboarding" affordance in the profile area.
    pub fn reset_onboarding(&self) -> Result<()> {
        self.remove(ONBOARDING_COMPLETE)
    }

    /// Only meaningful once onboarding is complete.
    pub fn authenticated(&self) -> bool {
        self.get(USER_AUTHENTICATED).as_deref() == Some("true")
    }

    pub fn set_authenticated(&self, value: bool) -> Result<()> {
        self.set(USER_AUTHENTICATED, if value { "true" } else { "false" })
    }

    pub fn clear_authentication(&self) -> Result<()> {
        self.remove(USER_AUTHENTICATED)
    }

    pub fn membership(&self) -> Membership {
        Membership::from_flag(self.get(USER_MEMBERSHIP).as_deref())
    }

    pub fn set_membership(&self, membership: Membership) -> Result<()> {
        self.set(USER_MEMBERSHIP, membership.as_str())
    }

    pub fn theme(&self) -> Theme {
        Theme::from_flag(self.get(THEME).as_deref())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.set(THEME, theme.as_str())
    }

    pub fn auth_token(&self) -> Option<String> {
        self.get(AUTH_TOKEN)
    }

    pub fn set_auth_token(&self, token: &str) -> Result<()> {
        self.set(AUTH_TOKEN, token)
    }

    pub fn clear_auth_token(&self) -> Result<()> {
        self.remove(AUTH_TOKEN)
    }

    /// Followed stocks/sectors, stored as a nested JSON string. An unreadable
    /// value is treated as unset.
    pub fn user_interests(&self) -> Option<UserInterests> {
        let raw = self.get(USER_INTERESTS)?;
        match serde_json::from_str(&raw) {
            Ok(interests) => Some(interests),
            Err(err) => {
                error!("Ignoring malformed user_interests flag: {err}");
                None
            }
        }
    }

    pub fn set_user_interests(&self, interests: &UserInterests) -> Result<()> {
        let encoded = serde_json::to_string(interests)?;
        self.set(USER_INTERESTS, &encoded)
    }

    fn get(&self, key: &str) -> Option<String> {
        let guard = match self.inner.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        {
            let mut guard = match self.inner.data.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.insert(key.to_string(), value.to_string());
            self.persist(&guard)?;
        }

        self.inner.revision.send_modify(|rev| *rev += 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        {
            let mut guard = match self.inner.data.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.remove(key);
            self.persist(&guard)?;
        }

        self.inner.revision.send_modify(|rev| *rev += 1);
        Ok(())
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.inner.path, serialized)
            .with_context(|| format!("Failed to write flags to {}", self.inner.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store() -> (tempfile::TempDir, FlagStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FlagStore::new(dir.path().join("flags.json")).expect("flag store");
        (dir, store)
    }

    #[test]
    fn missing_flags_degrade_to_defaults() {
        let (_dir, store) = scratch_store();
        assert!(!store.onboarding_complete());
        assert!(!store.authenticated());
        assert_eq!(store.membership(), Membership::Member);
        assert_eq!(store.theme(), Theme::Dark);
        assert!(store.auth_token().is_none());
        assert!(store.user_interests().is_none());
    }

    #[test]
    fn flags_survive_reopening_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flags.json");

        let store = FlagStore::new(path.clone()).expect("flag store");
        store.set_onboarding_complete().unwrap();
        store.set_authenticated(true).unwrap();
        store.set_membership(Membership::Pro).unwrap();

        let reopened = FlagStore::new(path).expect("flag store");
        assert!(reopened.onboarding_complete());
        assert!(reopened.authenticated());
        assert_eq!(reopened.membership(), Membership::Pro);
    }

    #[test]
    fn interests_round_trip_through_nested_json() {
        let (_dir, store) = scratch_store();
        let interests = UserInterests {
            stocks: vec!["AAPL".into(), "NVDA".into()],
            sectors: vec!["Technology".into()],
            preferred_country: Some("NL".into()),
        };
        store.set_user_interests(&interests).unwrap();
        assert_eq!(store.user_interests(), Some(interests));
    }

    #[test]
    fn every_write_bumps_the_revision() {
        let (_dir, store) = scratch_store();
        let rx = store.subscribe();
        let before = *rx.borrow();

        store.set_authenticated(true).unwrap();
        store.clear_authentication().unwrap();

        assert_eq!(*rx.borrow(), before + 2);
    }
}
