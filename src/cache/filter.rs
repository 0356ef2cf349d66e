//! Search filtering over cached users.

use crate::domain::User;

/// `needle` must already be lowercase. An empty needle matches every user.
fn matches(user: &User, needle: &str) -> bool {
    needle.is_empty() || user.search_text().contains(needle)
}

/// Returns the users matching `query`, in their original order.
///
/// Case-insensitive substring match against [`User::search_text`]. The input
/// slice is never modified.
#[must_use]
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let _span = tracing::debug_span!("filter_users", total = users.len(), query_len = query.len()).entered();

    let needle = query.to_lowercase();
    let filtered: Vec<&User> = users.iter().filter(|user| matches(user, &needle)).collect();

    tracing::debug!(filtered_count = filtered.len(), "search filter applied");
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, first: &str, last: &str) -> User {
        User {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            avatar: String::new(),
        }
    }

    #[test]
    fn filters_by_substring() {
        let users = vec![user(1, "Ann", "Lee"), user(2, "Bob", "Stone")];

        let ids: Vec<u64> = filter_users(&users, "an").iter().map(|u| u.id).collect();

        assert_eq!(ids, vec![1]);
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn empty_query_keeps_order() {
        let users = vec![user(1, "Ann", "Lee"), user(2, "Bob", "Stone")];
        let ids: Vec<u64> = filter_users(&users, "").iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn matching_is_case_insensitive_and_spans_fields() {
        let users = vec![user(1, "George", "Bluth")];
        for query in ["GEORGE BL", "bluth george@", "@EXAMPLE.com"] {
            assert_eq!(filter_users(&users, query).len(), 1, "{query}");
        }
        assert!(filter_users(&users, "janet").is_empty());
    }
}
