use super::ids::SessionId;
use super::session::Session;

/// Owns every session in creation order plus the active pointer.
///
/// The first session is held apart from the later ones, so the store is never
/// empty and `active()` always has a session to return.
#[derive(Debug, Clone)]
pub struct SessionStore {
    first: Session,
    later: Vec<Session>,
    active_id: SessionId,
}

impl SessionStore {
    pub fn new() -> Self {
        let first = Session::new();
        let active_id = first.id;
        Self {
            first,
            later: Vec::new(),
            active_id,
        }
    }

    /// Appends a fresh session and returns its id. The active pointer is left alone.
    pub fn create_session(&mut self) -> SessionId {
        let session = Session::new();
        let id = session.id;
        self.later.push(session);
        tracing::info!("created session {id}");
        id
    }

    /// Creation order, oldest first.
    pub fn list_sessions(&self) -> impl Iterator<Item = &Session> {
        std::iter::once(&self.first).chain(self.later.iter())
    }

    /// Display order for history views: newest first, newest creation wins ties.
    pub fn sessions_by_recency(&self) -> Vec<&Session> {
        let mut sessions = self.list_sessions().collect::<Vec<_>>();
        sessions.reverse();
        sessions.sort_by(|a, b| b.created_at_unix_millis().cmp(&a.created_at_unix_millis()));
        sessions
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.list_sessions().find(|session| session.id == id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.get(id).is_some()
    }

    /// Moves the active pointer. Unknown ids are ignored and reported as `false`.
    pub fn select_session(&mut self, id: SessionId) -> bool {
        if !self.contains(id) {
            tracing::debug!("ignoring selection of unknown session {id}");
            return false;
        }

        self.active_id = id;
        true
    }

    /// Applies `updater` to exactly the session matching `id`.
    pub fn update_session<R>(
        &mut self,
        id: SessionId,
        updater: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        let Some(session) = std::iter::once(&mut self.first)
            .chain(self.later.iter_mut())
            .find(|session| session.id == id)
        else {
            tracing::debug!("ignoring update of unknown session {id}");
            return None;
        };

        Some(updater(session))
    }

    pub fn active_id(&self) -> SessionId {
        self.active_id
    }

    pub fn active(&self) -> &Session {
        // Sessions are never removed and `select_session` rejects unknown ids.
        let active = self.get(self.active_id);
        debug_assert!(active.is_some(), "active session {} is not stored", self.active_id);
        active.unwrap_or(&self.first)
    }

    pub fn update_active<R>(&mut self, updater: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.update_session(self.active_id, updater)
    }

    pub fn len(&self) -> usize {
        1 + self.later.len()
    }

    /// Always `false`; the store starts with one session and never drops any.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{DEFAULT_SESSION_TITLE, Message};

    #[test]
    fn new_store_starts_with_one_active_empty_session() {
        let store = SessionStore::new();

        assert_eq!(store.len(), 1);
        let active = store.active();
        assert_eq!(active.title, DEFAULT_SESSION_TITLE);
        assert!(active.messages().is_empty());
        assert_eq!(active.selected_pack_index, None);
        assert_eq!(active.selected_skill, None);
        assert!(!active.skills_expanded);
    }

    #[test]
    fn sessions_are_listed_in_creation_order() {
        let mut store = SessionStore::new();
        let first = store.active_id();
        let second = store.create_session();
        let third = store.create_session();

        let ids = store
            .list_sessions()
            .map(|session| session.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![first, second, third]);

        let recent = store
            .sessions_by_recency()
            .iter()
            .map(|session| session.id)
            .collect::<Vec<_>>();
        assert_eq!(recent, vec![third, second, first]);
    }

    #[test]
    fn active_follows_selection_across_first_and_later_sessions() {
        let mut store = SessionStore::new();
        let first = store.active_id();
        let second = store.create_session();
        assert!(!store.is_empty());
        assert_eq!(store.len(), 2);

        assert!(store.select_session(second));
        assert_eq!(store.active().id, second);

        assert!(store.select_session(first));
        assert_eq!(store.active().id, first);
        assert_eq!(store.update_active(|session| session.id), Some(first));
    }

    #[test]
    fn selecting_unknown_session_is_a_noop() {
        let mut store = SessionStore::new();
        let before = store.active_id();

        assert!(!store.select_session(SessionId::new_v7()));
        assert_eq!(store.active_id(), before);
    }

    #[test]
    fn update_touches_only_the_matching_session() {
        let mut store = SessionStore::new();
        let first = store.active_id();
        let second = store.create_session();

        let applied = store.update_session(second, |session| {
            session.push_message(Message::user("hello"));
        });
        assert!(applied.is_some());

        assert!(store.get(first).is_some_and(|s| s.messages().is_empty()));
        assert_eq!(store.get(second).map(|s| s.messages().len()), Some(1));
        assert!(store.update_session(SessionId::new_v7(), |_| ()).is_none());
    }
}
