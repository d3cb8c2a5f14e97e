// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-browser login state: multiple token-addressed login instances per
//! role, plus the single-slot legacy mirror kept for callers that never
//! pass a token.
//!
//! All operations here are synchronous mutations of one [`SessionState`];
//! the surrounding request loads the state from a backend, mutates it, and
//! saves it back. Serialization across requests for the same browser is the
//! backend's job.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use tilldesk_core::{LoginData, Role, TilldeskError};

/// One active authenticated login for one role in one browser tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginInstance {
    /// Opaque per-tab token: 16 random bytes hex-encoded, then the unix
    /// timestamp appended. Uniqueness is probabilistic only; the store does
    /// not check new tokens against existing ones.
    pub token: String,
    pub role: Role,
    pub data: LoginData,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Everything the store keeps for one browser session.
///
/// `instances` is insertion-ordered and that order is load-bearing: a
/// lookup without a token returns the first-created instance of the role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub instances: Vec<LoginInstance>,
    /// Legacy single-slot mirror per role; always reflects the most recently
    /// created instance for that role.
    #[serde(default)]
    pub mirror: HashMap<Role, LoginData>,
    /// Pre-token supplier slot kept for the oldest supplier-portal callers.
    #[serde(default)]
    pub supplier_legacy: Option<LoginData>,
    /// Per-session CSRF secret, created lazily on first use.
    #[serde(default)]
    pub csrf_secret: Option<String>,
}

/// Generate a per-tab login token: 128 bits of entropy plus a coarse
/// timestamp suffix to aid debugging and ordering.
fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", hex::encode(bytes), Utc::now().timestamp())
}

/// Generate the per-session CSRF secret.
fn generate_csrf_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl SessionState {
    /// Create a new login instance for `role` and return its token.
    ///
    /// Also updates the legacy mirror for the role, so the mirror always
    /// holds the most recently created login.
    pub fn create_login(&mut self, role: Role, data: LoginData) -> String {
        let token = generate_token();
        let now = Utc::now();
        self.instances.push(LoginInstance {
            token: token.clone(),
            role,
            data: data.clone(),
            created_at: now,
            last_activity: now,
        });
        self.mirror.insert(role, data);
        tracing::debug!(%role, "login instance created");
        token
    }

    /// Look up login data for `role`, optionally scoped to a tab token.
    ///
    /// Resolution order:
    /// 1. token given and matching an instance of this role: refresh its
    ///    `last_activity` and return its data;
    /// 2. first instance of the role in insertion order (first-created wins
    ///    when several tabs are logged in with the same role);
    /// 3. the legacy mirror, provided it carries a `user_id`.
    pub fn get_login(&mut self, role: Role, token: Option<&str>) -> Option<LoginData> {
        if let Some(token) = token
            && let Some(instance) = self
                .instances
                .iter_mut()
                .find(|i| i.token == token && i.role == role)
        {
            instance.last_activity = Utc::now();
            return Some(instance.data.clone());
        }

        if let Some(instance) = self.instances.iter().find(|i| i.role == role) {
            return Some(instance.data.clone());
        }

        self.mirror
            .get(&role)
            .filter(|data| data.user_id().is_some())
            .cloned()
    }

    /// Remove login instances for `role`.
    ///
    /// With a token, removes only that instance (when its role matches and,
    /// if `user_id` is given, its data carries the same user id); without
    /// one, removes every instance of the role, scoped by `user_id` when
    /// given. The legacy mirror for the role is additionally cleared under
    /// the same user-id condition, and the pre-token supplier slot is
    /// dropped whenever the supplier role is cleared. Matching nothing is a
    /// silent no-op.
    pub fn clear_login(&mut self, role: Role, user_id: Option<&str>, token: Option<&str>) {
        let user_matches =
            |data: &LoginData| user_id.is_none() || data.user_id() == user_id;

        match token {
            Some(token) => {
                if let Some(pos) = self.instances.iter().position(|i| {
                    i.token == token && i.role == role && user_matches(&i.data)
                }) {
                    self.instances.remove(pos);
                    if !self.instances.iter().any(|i| i.role == role) {
                        self.mirror.remove(&role);
                    }
                }
            }
            None => {
                self.instances
                    .retain(|i| !(i.role == role && user_matches(&i.data)));
            }
        }

        if self
            .mirror
            .get(&role)
            .is_some_and(|data| user_matches(data))
        {
            self.mirror.remove(&role);
        }

        if role == Role::Supplier {
            self.supplier_legacy = None;
        }
    }

    /// The per-session CSRF secret, created on first access.
    pub fn ensure_csrf_secret(&mut self) -> &str {
        if self.csrf_secret.is_none() {
            self.csrf_secret = Some(generate_csrf_secret());
        }
        self.csrf_secret.as_deref().expect("just set")
    }

    /// Serialize for the session backend.
    pub fn to_blob(&self) -> Result<String, TilldeskError> {
        serde_json::to_string(self).map_err(|e| TilldeskError::Session {
            message: "failed to serialize session state".to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Deserialize from a backend blob.
    pub fn from_blob(blob: &str) -> Result<Self, TilldeskError> {
        serde_json::from_str(blob).map_err(|e| TilldeskError::Session {
            message: "corrupt session state".to_string(),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(user_id: &str) -> LoginData {
        LoginData::new()
            .with("user_id", user_id)
            .with("username", format!("user-{user_id}"))
    }

    #[test]
    fn token_has_hex_prefix_and_timestamp_suffix() {
        let token = generate_token();
        assert!(token.len() > 32);
        assert!(token[..32].chars().all(|c| c.is_ascii_hexdigit()));
        let suffix: i64 = token[32..].parse().expect("timestamp suffix");
        assert!(suffix > 0);
    }

    #[test]
    fn create_then_get_by_token_refreshes_activity() {
        let mut state = SessionState::default();
        let before = Utc::now();
        let token = state.create_login(Role::Staff, data("1"));

        let got = state.get_login(Role::Staff, Some(&token)).unwrap();
        assert_eq!(got.user_id(), Some("1"));

        let instance = &state.instances[0];
        assert!(instance.last_activity >= before);
        assert!(instance.last_activity >= instance.created_at);
    }

    #[test]
    fn get_without_token_returns_first_created() {
        let mut state = SessionState::default();
        state.create_login(Role::Staff, data("first"));
        state.create_login(Role::Staff, data("second"));

        assert_eq!(state.instances.len(), 2);
        let got = state.get_login(Role::Staff, None).unwrap();
        assert_eq!(got.user_id(), Some("first"));
    }

    #[test]
    fn mirror_reflects_most_recent_login() {
        let mut state = SessionState::default();
        state.create_login(Role::Staff, data("first"));
        state.create_login(Role::Staff, data("second"));

        let mirror = state.mirror.get(&Role::Staff).unwrap();
        assert_eq!(mirror.user_id(), Some("second"));
    }

    #[test]
    fn mismatched_token_falls_back_to_role_scan() {
        let mut state = SessionState::default();
        state.create_login(Role::Admin, data("9"));

        let got = state.get_login(Role::Admin, Some("no-such-token")).unwrap();
        assert_eq!(got.user_id(), Some("9"));
    }

    #[test]
    fn token_of_wrong_role_does_not_leak_across_roles() {
        let mut state = SessionState::default();
        let staff_token = state.create_login(Role::Staff, data("1"));

        assert!(state.get_login(Role::Admin, Some(&staff_token)).is_none());
    }

    #[test]
    fn mirror_fallback_requires_user_id() {
        let mut state = SessionState::default();
        state
            .mirror
            .insert(Role::Admin, LoginData::new().with("username", "ghost"));

        assert!(state.get_login(Role::Admin, None).is_none());
    }

    #[test]
    fn clear_by_token_removes_exactly_one_instance() {
        let mut state = SessionState::default();
        let t1 = state.create_login(Role::Staff, data("1"));
        let t2 = state.create_login(Role::Staff, data("2"));

        state.clear_login(Role::Staff, None, Some(&t1));

        assert_eq!(state.instances.len(), 1);
        assert_eq!(state.instances[0].token, t2);
    }

    #[test]
    fn clear_last_token_unsets_mirror() {
        let mut state = SessionState::default();
        let token = state.create_login(Role::Staff, data("1"));

        state.clear_login(Role::Staff, None, Some(&token));

        assert!(state.instances.is_empty());
        assert!(!state.mirror.contains_key(&Role::Staff));
    }

    #[test]
    fn clear_without_token_removes_all_instances_of_role() {
        let mut state = SessionState::default();
        state.create_login(Role::Staff, data("1"));
        state.create_login(Role::Staff, data("2"));
        state.create_login(Role::Admin, data("3"));

        state.clear_login(Role::Staff, None, None);

        assert_eq!(state.instances.len(), 1);
        assert_eq!(state.instances[0].role, Role::Admin);
        assert!(!state.mirror.contains_key(&Role::Staff));
        assert!(state.mirror.contains_key(&Role::Admin));
    }

    #[test]
    fn clear_scoped_by_user_id_leaves_other_users() {
        let mut state = SessionState::default();
        state.create_login(Role::Staff, data("1"));
        state.create_login(Role::Staff, data("2"));

        state.clear_login(Role::Staff, Some("1"), None);

        assert_eq!(state.instances.len(), 1);
        assert_eq!(state.instances[0].data.user_id(), Some("2"));
        // Mirror holds user 2 (most recent login), which does not match the
        // user-id condition, so it survives.
        assert_eq!(
            state.mirror.get(&Role::Staff).unwrap().user_id(),
            Some("2")
        );
    }

    #[test]
    fn clear_by_token_with_wrong_user_id_is_a_no_op() {
        let mut state = SessionState::default();
        let token = state.create_login(Role::Staff, data("1"));

        state.clear_login(Role::Staff, Some("999"), Some(&token));

        assert_eq!(state.instances.len(), 1);
    }

    #[test]
    fn clear_unknown_token_is_silent() {
        let mut state = SessionState::default();
        state.create_login(Role::Staff, data("1"));

        state.clear_login(Role::Staff, None, Some("missing"));

        assert_eq!(state.instances.len(), 1);
        // The mirror is still cleared: the unconditional mirror rule applies
        // regardless of whether an instance matched.
        assert!(!state.mirror.contains_key(&Role::Staff));
    }

    #[test]
    fn clearing_supplier_drops_pre_token_slot() {
        let mut state = SessionState::default();
        state.supplier_legacy = Some(data("s1"));
        state.create_login(Role::Supplier, data("s1"));

        state.clear_login(Role::Supplier, None, None);

        assert!(state.supplier_legacy.is_none());
    }

    #[test]
    fn two_tabs_logout_scenario() {
        // Two tabs in one browser, both staff, different users.
        let mut state = SessionState::default();
        let t1 = state.create_login(Role::Staff, data("1"));
        let _t2 = state.create_login(Role::Staff, data("2"));

        assert_eq!(state.instances.len(), 2);
        assert_eq!(
            state.mirror.get(&Role::Staff).unwrap().user_id(),
            Some("2")
        );

        // Tab 1 logs out by token without a user-id scope: its instance goes,
        // tab 2's instance stays, and the mirror is cleared by the
        // unconditional rule (tab 2 logged in before the clear).
        state.clear_login(Role::Staff, None, Some(&t1));
        assert_eq!(state.instances.len(), 1);
        assert_eq!(state.instances[0].data.user_id(), Some("2"));
        assert!(!state.mirror.contains_key(&Role::Staff));

        // A fresh login re-establishes the mirror.
        state.create_login(Role::Staff, data("3"));
        assert_eq!(
            state.mirror.get(&Role::Staff).unwrap().user_id(),
            Some("3")
        );
    }

    #[test]
    fn csrf_secret_is_stable_per_session() {
        let mut state = SessionState::default();
        let first = state.ensure_csrf_secret().to_string();
        let second = state.ensure_csrf_secret().to_string();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn state_round_trips_through_blob() {
        let mut state = SessionState::default();
        state.create_login(Role::Admin, data("1"));
        state.create_login(Role::Supplier, data("2"));
        state.ensure_csrf_secret();

        let blob = state.to_blob().unwrap();
        let back = SessionState::from_blob(&blob).unwrap();
        assert_eq!(state, back);
    }

    #[test]
    fn corrupt_blob_is_a_session_error() {
        let err = SessionState::from_blob("{not json").unwrap_err();
        assert!(err.to_string().contains("corrupt session state"));
    }
}
