use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_LIMIT: u64 = 15;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Create payload. Unknown fields such as a placeholder `id` are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

fn default_role() -> String {
    "member".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub links: Links,
    pub meta: Meta,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Links {
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    pub current_page: u64,
    pub from: Option<u64>,
    pub last_page: u64,
    pub links: Vec<MetaLink>,
    pub path: String,
    pub per_page: u64,
    pub to: Option<u64>,
    pub total: u64,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    users: BTreeMap<u64, User>,
}

impl Store {
    fn insert(&mut self, input: CreateUser) -> User {
        self.next_id += 1;
        let user = User {
            id: self.next_id,
            name: input.name,
            email: input.email,
            role: input.role,
        };
        self.users.insert(user.id, user.clone());
        user
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_users(Vec::new())
}

/// Router whose store starts with `users`, assigned ids from 1.
pub fn app_with_users(users: Vec<CreateUser>) -> Router {
    let mut store = Store::default();
    for user in users {
        store.insert(user);
    }
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/users/{id}/", get(get_user).put(update_user).delete(delete_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type Rejection = (StatusCode, String);

fn bad_request(message: String) -> Rejection {
    (StatusCode::BAD_REQUEST, message)
}

/// Parsed collection query: pagination, search, sort and equality filters.
#[derive(Debug, Default)]
struct ListQuery {
    offset: u64,
    limit: u64,
    search: Option<String>,
    order: Option<String>,
    filters: Vec<(String, String)>,
}

impl ListQuery {
    fn parse(pairs: Vec<(String, String)>) -> Result<Self, Rejection> {
        let mut query = ListQuery {
            limit: DEFAULT_LIMIT,
            ..Default::default()
        };
        for (key, value) in pairs {
            match key.as_str() {
                "offset" => {
                    query.offset = value
                        .parse()
                        .map_err(|_| bad_request(format!("invalid offset: {value}")))?
                }
                "limit" => {
                    let limit: u64 = value
                        .parse()
                        .map_err(|_| bad_request(format!("invalid limit: {value}")))?;
                    query.limit = limit.max(1);
                }
                "search" => query.search = Some(value.to_lowercase()),
                "order" => query.order = Some(value),
                "id" | "name" | "email" | "role" => query.filters.push((key.clone(), value)),
                other => return Err(bad_request(format!("unknown filter field: {other}"))),
            }
        }
        Ok(query)
    }

    fn matches(&self, user: &User) -> bool {
        let searched = self.search.as_ref().map_or(true, |needle| {
            user.name.to_lowercase().contains(needle) || user.email.to_lowercase().contains(needle)
        });
        searched
            && self.filters.iter().all(|(field, value)| match field.as_str() {
                "id" => user.id.to_string() == *value,
                "name" => user.name == *value,
                "email" => user.email == *value,
                "role" => user.role == *value,
                _ => false,
            })
    }

    fn sort(&self, users: &mut [User]) -> Result<(), Rejection> {
        let Some(order) = self.order.as_deref() else {
            return Ok(());
        };
        let (field, descending) = match order.strip_prefix('-') {
            Some(field) => (field, true),
            None => (order, false),
        };
        match field {
            "id" => users.sort_by_key(|u| u.id),
            "name" => users.sort_by(|a, b| a.name.cmp(&b.name)),
            "email" => users.sort_by(|a, b| a.email.cmp(&b.email)),
            other => return Err(bad_request(format!("unknown order field: {other}"))),
        }
        if descending {
            users.reverse();
        }
        Ok(())
    }
}

fn page_url(offset: u64, limit: u64) -> String {
    format!("/users/?offset={offset}&limit={limit}")
}

fn paginate(users: Vec<User>, offset: u64, limit: u64) -> Page<User> {
    let total = users.len() as u64;
    let last_page = total.div_ceil(limit).max(1);
    let current_page = (offset / limit).saturating_add(1);

    let data: Vec<User> = users
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    let (from, to) = if data.is_empty() {
        (None, None)
    } else {
        (
            Some(offset.saturating_add(1)),
            Some(offset.saturating_add(data.len() as u64)),
        )
    };

    let prev = (offset > 0).then(|| page_url(offset.saturating_sub(limit), limit));
    let next_offset = offset.saturating_add(limit);
    let next = (next_offset < total).then(|| page_url(next_offset, limit));

    let mut meta_links = vec![MetaLink {
        url: prev.clone(),
        label: "&laquo; Previous".to_string(),
        active: false,
    }];
    meta_links.extend((1..=last_page).map(|page| MetaLink {
        url: Some(page_url((page - 1) * limit, limit)),
        label: page.to_string(),
        active: page == current_page,
    }));
    meta_links.push(MetaLink {
        url: next.clone(),
        label: "Next &raquo;".to_string(),
        active: false,
    });

    Page {
        data,
        links: Links {
            first: Some(page_url(0, limit)),
            last: Some(page_url((last_page - 1) * limit, limit)),
            prev,
            next,
        },
        meta: Meta {
            current_page,
            from,
            last_page,
            links: meta_links,
            path: "/users/".to_string(),
            per_page: limit,
            to,
            total,
        },
    }
}

async fn list_users(
    State(db): State<Db>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Page<User>>, Rejection> {
    let query = ListQuery::parse(pairs)?;
    let store = db.read().await;
    let mut users: Vec<User> = store
        .users
        .values()
        .filter(|u| query.matches(u))
        .cloned()
        .collect();
    query.sort(&mut users)?;
    Ok(Json(paginate(users, query.offset, query.limit)))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let user = db.write().await.insert(input);
    tracing::debug!(id = user.id, "user created");
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<User>, StatusCode> {
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<User>, StatusCode> {
    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(role) = input.role {
        user.role = role;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<bool>, StatusCode> {
    let mut store = db.write().await;
    store
        .users
        .remove(&id)
        .map(|_| Json(true))
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: "member".to_string(),
        }
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn create_user_ignores_placeholder_id_and_defaults_role() {
        let input: CreateUser =
            serde_json::from_str(r#"{"id":0,"name":"Ann","email":"ann@example.com"}"#).unwrap();
        assert_eq!(input.role, "member");
    }

    #[test]
    fn list_query_rejects_unknown_fields() {
        assert!(ListQuery::parse(pairs(&[("color", "red")])).is_err());
        assert!(ListQuery::parse(pairs(&[("offset", "-1")])).is_err());
    }

    #[test]
    fn list_query_clamps_zero_limit() {
        let query = ListQuery::parse(pairs(&[("limit", "0")])).unwrap();
        assert_eq!(query.limit, 1);
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_email() {
        let query = ListQuery::parse(pairs(&[("search", "ANN")])).unwrap();
        assert!(query.matches(&user(1, "Ann")));
        assert!(!query.matches(&user(2, "Bo")));
    }

    #[test]
    fn descending_order() {
        let query = ListQuery::parse(pairs(&[("order", "-name")])).unwrap();
        let mut users = vec![user(1, "Ann"), user(2, "Cy"), user(3, "Bo")];
        query.sort(&mut users).unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Cy", "Bo", "Ann"]);
    }

    #[test]
    fn paginate_middle_page() {
        let users: Vec<User> = (1..=5).map(|i| user(i, &format!("U{i}"))).collect();
        let page = paginate(users, 2, 2);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].id, 3);
        assert_eq!(page.meta.current_page, 2);
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.meta.from, Some(3));
        assert_eq!(page.meta.to, Some(4));
        assert_eq!(page.links.prev.as_deref(), Some("/users/?offset=0&limit=2"));
        assert_eq!(page.links.next.as_deref(), Some("/users/?offset=4&limit=2"));
        // prev, three pages, next
        assert_eq!(page.meta.links.len(), 5);
        assert!(page.meta.links[2].active);
    }

    #[test]
    fn paginate_past_the_end_saturates() {
        let page = paginate(vec![user(1, "Ann")], u64::MAX, DEFAULT_LIMIT);
        assert!(page.data.is_empty());
        assert!(page.meta.from.is_none());
        assert!(page.links.next.is_none());
        assert_eq!(page.meta.last_page, 1);

        let page = paginate(vec![user(1, "Ann")], u64::MAX, 1);
        assert!(page.data.is_empty());
        assert_eq!(page.meta.current_page, u64::MAX);
        assert!(page.meta.links.iter().all(|link| !link.active));
    }

    #[test]
    fn paginate_empty() {
        let page = paginate(Vec::new(), 0, DEFAULT_LIMIT);
        assert!(page.data.is_empty());
        assert_eq!(page.meta.last_page, 1);
        assert!(page.meta.from.is_none());
        assert!(page.links.prev.is_none());
        assert!(page.links.next.is_none());
    }
}
