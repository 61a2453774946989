use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Content types `/customers` will answer with when asked via `Accept`.
static JSON_CONTENT_TYPES: [&str; 4] = [
    "application/json",
    "text/json",
    "text/x-json",
    "text/javascript",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    pub surname: String,
}

#[derive(Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    #[serde(default)]
    pub surname: String,
}

#[derive(Deserialize)]
pub struct CustomerFilter {
    pub name: Option<String>,
    pub surname: Option<String>,
}

#[derive(Deserialize)]
pub struct PaddingSize {
    pub bytes: usize,
}

/// What the fallback route saw, echoed back to the caller.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub path: String,
    pub query: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub struct Store {
    customers: BTreeMap<u32, Customer>,
    next_id: u32,
}

impl Store {
    /// Two customers, ids 1 and 2.
    pub fn seeded() -> Self {
        let mut store = Store {
            customers: BTreeMap::new(),
            next_id: 1,
        };
        store.insert("Jane".to_string(), "Wade".to_string());
        store.insert("John".to_string(), "Smith".to_string());
        store
    }

    fn insert(&mut self, name: String, surname: String) -> Customer {
        let customer = Customer {
            id: self.next_id,
            name,
            surname,
        };
        self.next_id += 1;
        self.customers.insert(customer.id, customer.clone());
        customer
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/", get(root))
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/{id}", get(get_customer))
        .route("/customers-requires-header", get(list_customers_requiring_header))
        .route("/greeting", get(greeting))
        .route("/padding", get(padding))
        .fallback(echo)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn root() -> StatusCode {
    StatusCode::OK
}

async fn list_customers(
    State(db): State<Db>,
    Query(filter): Query<CustomerFilter>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let store = db.read().await;
    let customers: Vec<Customer> = store
        .customers
        .values()
        .filter(|c| filter.name.as_ref().map_or(true, |n| &c.name == n))
        .filter(|c| filter.surname.as_ref().map_or(true, |s| &c.surname == s))
        .cloned()
        .collect();

    let content_type = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .and_then(|accept| JSON_CONTENT_TYPES.iter().find(|ct| **ct == accept))
        .copied()
        .unwrap_or("application/json");

    ([(header::CONTENT_TYPE, content_type)], Json(customers))
}

async fn get_customer(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Result<Json<Customer>, StatusCode> {
    let store = db.read().await;
    store.customers.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_customer(
    State(db): State<Db>,
    Json(input): Json<CreateCustomer>,
) -> (StatusCode, Json<Customer>) {
    let customer = db.write().await.insert(input.name, input.surname);
    (StatusCode::CREATED, Json(customer))
}

async fn list_customers_requiring_header(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Customer>>, StatusCode> {
    if !headers.contains_key("header") {
        return Err(StatusCode::BAD_REQUEST);
    }
    let store = db.read().await;
    Ok(Json(store.customers.values().cloned().collect()))
}

async fn greeting() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "hello")
}

/// A JSON string of `bytes` characters, quotes excluded.
async fn padding(Query(size): Query<PaddingSize>) -> impl IntoResponse {
    let mut body = String::with_capacity(size.bytes + 2);
    body.push('"');
    body.extend(std::iter::repeat('x').take(size.bytes));
    body.push('"');
    ([(header::CONTENT_TYPE, "application/json")], body)
}

async fn echo(uri: Uri, headers: HeaderMap) -> Json<Echo> {
    Json(Echo {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_serializes_to_json() {
        let customer = Customer {
            id: 1,
            name: "Jane".to_string(),
            surname: "Wade".to_string(),
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Jane");
        assert_eq!(json["surname"], "Wade");
    }

    #[test]
    fn seeded_store_has_two_customers() {
        let store = Store::seeded();
        assert_eq!(store.customers.len(), 2);
        assert_eq!(store.customers[&1].name, "Jane");
        assert_eq!(store.customers[&2].name, "John");
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut store = Store::seeded();
        let customer = store.insert("Ann".to_string(), "Lee".to_string());
        assert_eq!(customer.id, 3);
        assert_eq!(store.insert("Bo".to_string(), String::new()).id, 4);
    }

    #[test]
    fn create_customer_defaults_surname() {
        let input: CreateCustomer = serde_json::from_str(r#"{"name":"Solo"}"#).unwrap();
        assert_eq!(input.name, "Solo");
        assert!(input.surname.is_empty());
    }

    #[test]
    fn create_customer_rejects_missing_name() {
        let result: Result<CreateCustomer, _> = serde_json::from_str(r#"{"surname":"Wade"}"#);
        assert!(result.is_err());
    }
}
