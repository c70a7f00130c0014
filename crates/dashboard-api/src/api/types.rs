//! Wire types of the authority endpoints

use dashboard_http::RequestOptions;
use serde::{Deserialize, Serialize};

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData<T> {
    /// Records of this page
    pub items: Vec<T>,
    /// Number of records across all pages
    pub total: u64,
}

/// Pagination and filters of a listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page number
    pub page: u32,
    /// Records per page
    pub page_size: u32,
    /// Extra filters, sent as query params after `page` and `pageSize`
    pub filters: Vec<(String, String)>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            filters: Vec::new(),
        }
    }
}

impl PageQuery {
    /// Query for page `page` of `page_size` records, without filters
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            filters: Vec::new(),
        }
    }

    /// Add a filter; empty values are skipped
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.filters.push((key.into(), value));
        }
        self
    }

    pub(crate) fn to_options(&self) -> RequestOptions {
        RequestOptions::new()
            .param("page", self.page)
            .param("pageSize", self.page_size)
            .params(self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

/// Credentials posted to the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account name
    pub username: String,
    /// Plain password, sent over TLS
    pub password: String,
}

/// Profile of the logged in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User id
    pub id: u64,
    /// Account name
    pub username: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar: Option<String>,
    /// Role codes
    #[serde(default)]
    pub roles: Vec<String>,
    /// Permission codes gating navigation and actions
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Login endpoint payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    /// Credential sent as `Authorization` on later requests
    pub token: String,
    /// Profile of the user who logged in
    pub user: UserInfo,
}

/// User as listed on the user management page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id
    pub id: u64,
    /// Account name
    pub username: String,
    /// Display name
    #[serde(default)]
    pub nickname: Option<String>,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Role codes
    #[serde(default)]
    pub roles: Vec<String>,
    /// Disabled users cannot log in
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Creation time as formatted by the server
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Fields submitted when creating or editing a user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    /// Account name
    pub username: String,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Contact email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Only sent when set, so editing keeps the current password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Role codes
    #[serde(default)]
    pub roles: Vec<String>,
    /// Whether the user may log in
    pub enabled: bool,
}

/// Navigation entry; menus form a tree through `children`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Menu id
    pub id: u64,
    /// Parent entry, `None` at the root
    #[serde(default)]
    pub parent_id: Option<u64>,
    /// Navigation label
    pub label: String,
    /// Front-end route
    pub path: String,
    /// Icon name
    #[serde(default)]
    pub icon: Option<String>,
    /// Position among siblings, ascending
    #[serde(default)]
    pub sort: i32,
    /// Permission required to see the entry
    #[serde(default)]
    pub permission: Option<String>,
    /// Hidden from navigation when false
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Nested entries
    #[serde(default)]
    pub children: Vec<Menu>,
}

/// Fields submitted when creating or editing a menu
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuForm {
    /// Parent entry, `None` at the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    /// Navigation label
    pub label: String,
    /// Front-end route
    pub path: String,
    /// Icon name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Position among siblings, ascending
    pub sort: i32,
    /// Permission required to see the entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    /// Hidden from navigation when false
    pub enabled: bool,
}

/// Form body with the id of the record being edited
#[derive(Debug, Serialize)]
pub(crate) struct WithId<'a, T> {
    pub id: u64,
    #[serde(flatten)]
    pub form: &'a T,
}

fn enabled() -> bool {
    true
}
