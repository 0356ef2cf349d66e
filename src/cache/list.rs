//! The cached page of users and its fetch state machine.
//!
//! ```text
//! Idle ──begin_fetch──→ Loading ──apply_page──→ Loaded
//!                          │                      │
//!                      fail_fetch            begin_fetch
//!                          ↓                      ↓
//!                        Error ──begin_fetch──→ Loading
//! ```
//!
//! Only the response carrying the ticket of the current `Loading` state is
//! applied. Any other response (an older page request, or one issued before a
//! logout) is discarded, so the most recently requested page always wins.

use super::filter::filter_users;
use crate::api::Ticket;
use crate::domain::{PageResult, User, UserChanges};

/// Fetch state of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// Nothing requested yet, or reset after logout.
    Idle,
    /// A page request is outstanding.
    Loading { page: u32, ticket: Ticket },
    /// The cache holds the page named by [`UserListCache::page`].
    Loaded,
    /// The last fetch failed. The cache is empty.
    Error,
}

/// In-memory copy of the currently displayed remote page.
///
/// Mirrors one page of the remote list. User ids are unique within the cache,
/// and local mutations keep the order of the remaining records.
#[derive(Debug, Clone)]
pub struct UserListCache {
    users: Vec<User>,
    state: ListState,
    page: u32,
    total_pages: u32,
    total: Option<u32>,
}

impl Default for UserListCache {
    fn default() -> Self {
        Self::new()
    }
}

impl UserListCache {
    /// Creates an empty, idle cache positioned on page 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            users: Vec::new(),
            state: ListState::Idle,
            page: 1,
            total_pages: 1,
            total: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ListState {
        self.state
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading { .. })
    }

    /// Page number to show in the footer.
    ///
    /// While loading this is the requested page, otherwise the last page
    /// received.
    #[must_use]
    pub const fn page(&self) -> u32 {
        match self.state {
            ListState::Loading { page, .. } => page,
            _ => self.page,
        }
    }

    /// Total page count reported by the last successful fetch (at least 1).
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        if self.total_pages == 0 {
            1
        } else {
            self.total_pages
        }
    }

    /// Total number of users on the server, when reported.
    ///
    /// Kept in step with local deletes.
    #[must_use]
    pub const fn total(&self) -> Option<u32> {
        self.total
    }

    /// Moves to `Loading` for `page`, invalidating the current content.
    ///
    /// Any earlier outstanding ticket is superseded.
    pub fn begin_fetch(&mut self, page: u32, ticket: Ticket) {
        tracing::debug!(page = page, ticket = %ticket, "page fetch started");
        self.users.clear();
        self.state = ListState::Loading { page, ticket };
    }

    /// Applies a successful page response.
    ///
    /// Returns `false` (and changes nothing) if `ticket` is not the current
    /// loading ticket.
    pub fn apply_page(&mut self, ticket: Ticket, result: PageResult) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = %ticket, "discarding stale page response");
            return false;
        }

        tracing::debug!(
            page = result.page,
            total_pages = result.total_pages,
            count = result.data.len(),
            "page loaded"
        );

        self.users = result.data;
        self.page = result.page.max(1);
        self.total_pages = result.total_pages;
        self.total = result.total;
        self.state = ListState::Loaded;
        true
    }

    /// Records a failed page fetch.
    ///
    /// Returns `false` for stale tickets. Otherwise the cache is emptied and
    /// enters `Error`.
    pub fn fail_fetch(&mut self, ticket: Ticket) -> bool {
        let ListState::Loading { page, .. } = self.state else {
            return false;
        };
        if !self.is_current(ticket) {
            return false;
        }

        self.users.clear();
        self.page = page;
        self.state = ListState::Error;
        true
    }

    /// Removes the user with `id` after a successful remote delete.
    ///
    /// Only applies while `Loaded`. Returns `true` if a record was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        if self.state != ListState::Loaded {
            return false;
        }
        let before = self.users.len();
        self.users.retain(|user| user.id != id);
        let removed = self.users.len() != before;
        if removed {
            self.total = self.total.map(|total| total.saturating_sub(1));
        }
        removed
    }

    /// Replaces the user with `id` in place after a successful remote update.
    ///
    /// Submitted fields are merged over the prior record; `id` and `avatar`
    /// are kept. Only applies while `Loaded`.
    pub fn replace(&mut self, id: u64, changes: &UserChanges) -> bool {
        if self.state != ListState::Loaded {
            return false;
        }
        match self.users.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                *user = user.merged_with(changes);
                true
            }
            None => false,
        }
    }

    /// Returns the cached user with `id`.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Returns the users matching `query`. Derived only.
    #[must_use]
    pub fn filtered(&self, query: &str) -> Vec<&User> {
        filter_users(&self.users, query)
    }

    /// Page after the current one, if within `1..=total_pages`.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        let page = self.page();
        if page < self.total_pages() {
            Some(page + 1)
        } else {
            None
        }
    }

    /// Page before the current one, if within `1..=total_pages`.
    #[must_use]
    pub const fn previous_page(&self) -> Option<u32> {
        let page = self.page();
        if page > 1 {
            Some(page - 1)
        } else {
            None
        }
    }

    /// Drops all content and returns to `Idle` on page 1.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        matches!(self.state, ListState::Loading { ticket: current, .. } if current == ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, first: &str, last: &str) -> User {
        User {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
            avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
        }
    }

    fn page(number: u32, users: Vec<User>) -> PageResult {
        PageResult {
            data: users,
            page: number,
            total_pages: 2,
            per_page: Some(6),
            total: Some(12),
        }
    }

    fn second_page() -> Vec<User> {
        vec![
            user(7, "Michael", "Lawson"),
            user(8, "Lindsay", "Ferguson"),
            user(9, "Tobias", "Funke"),
            user(10, "Byron", "Fields"),
        ]
    }

    fn loaded(users: Vec<User>) -> UserListCache {
        let mut cache = UserListCache::new();
        cache.begin_fetch(2, Ticket(1));
        assert!(cache.apply_page(Ticket(1), page(2, users)));
        cache
    }

    fn ids(cache: &UserListCache) -> Vec<u64> {
        cache.users().iter().map(|u| u.id).collect()
    }

    #[test]
    fn fetch_moves_through_states() {
        let mut cache = UserListCache::new();
        assert_eq!(cache.state(), ListState::Idle);

        cache.begin_fetch(1, Ticket(1));
        assert!(cache.is_loading());
        assert_eq!(cache.page(), 1);

        assert!(cache.apply_page(Ticket(1), page(1, vec![user(1, "George", "Bluth")])));
        assert_eq!(cache.state(), ListState::Loaded);
        assert_eq!(cache.total_pages(), 2);
    }

    #[test]
    fn refetching_same_page_is_idempotent() {
        let mut cache = loaded(second_page());
        let first = cache.users().to_vec();

        cache.begin_fetch(2, Ticket(2));
        cache.apply_page(Ticket(2), page(2, second_page()));

        assert_eq!(cache.users(), first.as_slice());
    }

    #[test]
    fn remove_keeps_order() {
        let mut cache = loaded(second_page());

        assert!(cache.remove(7));

        assert_eq!(ids(&cache), vec![8, 9, 10]);
        assert_eq!(cache.total(), Some(11));
        assert!(!cache.remove(7));
    }

    #[test]
    fn remove_middle_record() {
        let mut cache = loaded(second_page());
        cache.remove(9);
        assert_eq!(ids(&cache), vec![7, 8, 10]);
    }

    #[test]
    fn replace_merges_submitted_fields() {
        let mut cache = loaded(vec![user(3, "Emma", "Wong"), user(4, "Eve", "Holt")]);
        let before = cache.get(3).cloned().unwrap();

        let changes = UserChanges {
            first_name: "Jane".to_string(),
            last_name: before.last_name.clone(),
            email: before.email.clone(),
        };
        assert!(cache.replace(3, &changes));

        let after = cache.get(3).unwrap();
        assert_eq!(after.id, 3);
        assert_eq!(after.avatar, before.avatar);
        assert_eq!(after.first_name, "Jane");
        assert_eq!(after.last_name, "Wong");
        assert_eq!(ids(&cache), vec![3, 4]);
        assert_eq!(cache.get(4).unwrap().first_name, "Eve");
    }

    #[test]
    fn mutations_ignored_unless_loaded() {
        let mut cache = loaded(second_page());
        cache.begin_fetch(1, Ticket(2));

        assert!(!cache.remove(7));
        assert!(!cache.replace(
            7,
            &UserChanges {
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                email: "a@b.co".to_string(),
            }
        ));
    }

    #[test]
    fn failure_discards_content() {
        let mut cache = loaded(second_page());
        cache.begin_fetch(1, Ticket(2));

        assert!(cache.fail_fetch(Ticket(2)));

        assert_eq!(cache.state(), ListState::Error);
        assert!(cache.users().is_empty());
        assert_eq!(cache.page(), 1);
    }

    #[test]
    fn latest_request_wins() {
        let mut cache = UserListCache::new();
        cache.begin_fetch(2, Ticket(1));
        cache.begin_fetch(3, Ticket(2));

        let mut third = page(3, vec![user(13, "Third", "Page")]);
        third.total_pages = 3;
        assert!(cache.apply_page(Ticket(2), third));
        assert!(!cache.apply_page(Ticket(1), page(2, second_page())));

        assert_eq!(cache.page(), 3);
        assert_eq!(ids(&cache), vec![13]);
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut cache = UserListCache::new();
        cache.begin_fetch(2, Ticket(1));
        cache.begin_fetch(3, Ticket(2));

        assert!(!cache.fail_fetch(Ticket(1)));
        assert!(cache.is_loading());
    }

    #[test]
    fn reset_drops_late_responses() {
        let mut cache = UserListCache::new();
        cache.begin_fetch(1, Ticket(1));
        cache.reset();

        assert!(!cache.apply_page(Ticket(1), page(1, second_page())));
        assert_eq!(cache.state(), ListState::Idle);
    }

    #[test]
    fn paging_is_clamped() {
        let mut cache = UserListCache::new();
        cache.begin_fetch(1, Ticket(1));
        cache.apply_page(Ticket(1), page(1, vec![]));

        assert_eq!(cache.previous_page(), None);
        assert_eq!(cache.next_page(), Some(2));

        cache.begin_fetch(2, Ticket(2));
        cache.apply_page(Ticket(2), page(2, second_page()));

        assert_eq!(cache.next_page(), None);
        assert_eq!(cache.previous_page(), Some(1));
    }

    #[test]
    fn filtering_leaves_cache_untouched() {
        let cache = loaded(vec![user(1, "Ann", "Lee"), user(2, "Bob", "Stone")]);

        let filtered: Vec<u64> = cache.filtered("an").iter().map(|u| u.id).collect();

        assert_eq!(filtered, vec![1]);
        assert_eq!(ids(&cache), vec![1, 2]);
    }
}
