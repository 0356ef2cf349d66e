//! User record domain model.
//!
//! This module defines the [`User`] record served by the remote REST service,
//! the [`UserChanges`] payload accepted by its update endpoint, and the
//! [`PageResult`] envelope returned by each list fetch.

use serde::{Deserialize, Serialize};

/// A user record as served by the remote service.
///
/// The `id` is assigned by the server and never changes. All other fields may
/// be replaced by an update, although the console never edits `avatar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
}

impl User {
    /// Returns `"{first_name} {last_name}"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use zusers::domain::User;
    ///
    /// let user = User {
    ///     id: 1,
    ///     first_name: "George".to_string(),
    ///     last_name: "Bluth".to_string(),
    ///     email: "george.bluth@reqres.in".to_string(),
    ///     avatar: String::new(),
    /// };
    /// assert_eq!(user.full_name(), "George Bluth");
    /// ```
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Text the search filter matches against.
    ///
    /// The name and email fields joined by single spaces, lowercased.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.first_name, self.last_name, self.email).to_lowercase()
    }

    /// Last path segment of the avatar URL, e.g. `3-image.jpg`.
    #[must_use]
    pub fn avatar_file(&self) -> Option<&str> {
        self.avatar
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Returns a copy of this record with `changes` merged over it.
    ///
    /// `id` and `avatar` are carried over from `self` unchanged.
    #[must_use]
    pub fn merged_with(&self, changes: &UserChanges) -> Self {
        Self {
            id: self.id,
            first_name: changes.first_name.clone(),
            last_name: changes.last_name.clone(),
            email: changes.email.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// The editable fields of a [`User`], sent as the body of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for UserChanges {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// One page of users plus pagination metadata.
///
/// Matches the list endpoint's JSON envelope. Unknown fields (such as
/// `support`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub data: Vec<User>,
    pub page: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 3,
            first_name: "Emma".to_string(),
            last_name: "Wong".to_string(),
            email: "emma.wong@reqres.in".to_string(),
            avatar: "https://reqres.in/img/faces/3-image.jpg".to_string(),
        }
    }

    #[test]
    fn merge_keeps_identity_and_avatar() {
        let original = user();
        let changes = UserChanges {
            first_name: "Jane".to_string(),
            last_name: original.last_name.clone(),
            email: original.email.clone(),
        };

        let merged = original.merged_with(&changes);

        assert_eq!(merged.id, 3);
        assert_eq!(merged.avatar, original.avatar);
        assert_eq!(merged.first_name, "Jane");
        assert_eq!(merged.last_name, "Wong");
        assert_eq!(merged.email, "emma.wong@reqres.in");
    }

    #[test]
    fn avatar_file_is_last_segment() {
        assert_eq!(user().avatar_file(), Some("3-image.jpg"));

        let mut bare = user();
        bare.avatar = String::new();
        assert_eq!(bare.avatar_file(), None);
    }

    #[test]
    fn search_text_joins_fields_lowercased() {
        assert_eq!(user().search_text(), "emma wong emma.wong@reqres.in");
    }

    #[test]
    fn page_result_ignores_extra_fields() {
        let body = r#"{
            "page": 2,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": [
                {"id": 7, "email": "michael.lawson@reqres.in", "first_name": "Michael",
                 "last_name": "Lawson", "avatar": "https://reqres.in/img/faces/7-image.jpg"}
            ],
            "support": {"url": "https://reqres.in/#support-heading", "text": "thanks"}
        }"#;

        let page: PageResult = serde_json::from_str(body).unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.per_page, Some(6));
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].first_name, "Michael");
    }
}
