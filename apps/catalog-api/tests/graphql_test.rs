//! GraphQL schema tests over in-memory repositories
//!
//! Requests run through `Schema::execute`; the caller's identity is added to
//! the request data the way the HTTP handler does it.

use async_graphql::{Request, Response, Variables};
use async_trait::async_trait;
use axum_helpers::{Identity, JwtAuth, JwtConfig};
use catalog_api::graphql::{CatalogSchema, build_schema};
use catalog_api::state::AppState;
use domain_products::InMemoryProductRepository;
use domain_users::{InMemoryUserRepository, MIN_HASH_COST, User, UserRepository, UserResult};
use realtime::{Broadcaster, RealtimeConfig};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// In-memory users that count single-user lookups.
#[derive(Default)]
struct CountingUsers {
    inner: InMemoryUserRepository,
    lookups: AtomicUsize,
}

impl CountingUsers {
    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for CountingUsers {
    async fn insert(&self, user: User) -> UserResult<User> {
        self.inner.insert(user).await
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> UserResult<Vec<User>> {
        self.inner.find_by_ids(ids).await
    }

    async fn update_status(&self, id: Uuid, status: &str) -> UserResult<Option<User>> {
        self.inner.update_status(id, status).await
    }

    async fn push_product(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        self.inner.push_product(user_id, product_id).await
    }

    async fn pull_product(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        self.inner.pull_product(user_id, product_id).await
    }
}

struct TestSchema {
    schema: CatalogSchema,
    jwt: JwtAuth,
}

impl TestSchema {
    fn new() -> Self {
        Self::with_users(Arc::new(InMemoryUserRepository::new()))
    }

    fn with_users(users: Arc<dyn UserRepository>) -> Self {
        let jwt = JwtAuth::new(&JwtConfig::new("graphql-test-secret-with-at-least-32-chars"));
        let state = AppState::new(
            users,
            Arc::new(InMemoryProductRepository::new()),
            jwt.clone(),
            Broadcaster::new(&RealtimeConfig::default()),
        )
        .with_hash_cost(MIN_HASH_COST);

        Self {
            schema: build_schema(&state),
            jwt,
        }
    }

    async fn run(&self, query: &str, variables: Value, token: Option<&str>) -> Response {
        let mut request = Request::new(query).variables(Variables::from_json(variables));
        if let Some(token) = token {
            let identity: Identity = self.jwt.identify(token).unwrap();
            request = request.data(identity);
        }
        self.schema.execute(request).await
    }

    async fn signup_and_login(&self, email: &str) -> (String, String) {
        let response = self
            .run(
                r#"mutation($input: UserInputData!) { createUser(userInput: $input) { _id } }"#,
                json!({ "input": { "email": email, "name": "Max", "password": "abcde" } }),
                None,
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);

        let response = self
            .run(
                r#"query($email: String!) { login(email: $email, password: "abcde") { token userId } }"#,
                json!({ "email": email }),
                None,
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);

        let data = data(response);
        (
            data["login"]["token"].as_str().unwrap().to_string(),
            data["login"]["userId"].as_str().unwrap().to_string(),
        )
    }

    async fn create_product(&self, token: &str, title: &str) -> String {
        let response = self
            .run(
                CREATE_PRODUCT,
                json!({ "input": { "title": title, "description": "A good read", "price": "9.99" } }),
                Some(token),
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        data(response)["createProduct"]["_id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

const CREATE_PRODUCT: &str = r#"
    mutation($input: ProductInputData!) {
        createProduct(productInput: $input) {
            _id title price creator { _id name products { _id } }
        }
    }
"#;

fn data(response: Response) -> Value {
    response.data.into_json().unwrap()
}

fn error_code(response: &Response) -> Value {
    let extensions = response.errors[0].extensions.as_ref().unwrap();
    extensions.get("code").cloned().unwrap().into_json().unwrap()
}

#[tokio::test]
async fn test_signup_login_and_create_scenario() {
    let t = TestSchema::new();

    let response = t
        .run(
            r#"mutation {
                createUser(userInput: { email: "a@b.com", name: "Max", password: "abcde" }) {
                    _id email password status
                }
            }"#,
            json!({}),
            None,
        )
        .await;
    let created = data(response);
    assert_eq!(created["createUser"]["password"], Value::Null);
    assert_eq!(created["createUser"]["status"], "I am new!");
    let user_id = created["createUser"]["_id"].as_str().unwrap().to_string();

    let response = t
        .run(
            r#"{ login(email: "a@b.com", password: "abcde") { token userId } }"#,
            json!({}),
            None,
        )
        .await;
    let login = data(response);
    assert_eq!(login["login"]["userId"], user_id);
    let token = login["login"]["token"].as_str().unwrap().to_string();
    assert_eq!(t.jwt.identify(&token).unwrap().user_id.to_string(), user_id);

    let response = t
        .run(
            CREATE_PRODUCT,
            json!({ "input": { "title": "A book", "description": "A good read", "price": "9.99" } }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), json!(401));

    let response = t
        .run(
            CREATE_PRODUCT,
            json!({ "input": { "title": "hi", "description": "short", "price": "" } }),
            Some(&token),
        )
        .await;
    assert_eq!(response.errors[0].message, "Invalid input.");
    assert_eq!(error_code(&response), json!(422));
    let messages = response.errors[0]
        .extensions
        .as_ref()
        .unwrap()
        .get("data")
        .cloned()
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(
        messages,
        json!([{ "message": "Title is invalid." }, { "message": "Price is invalid." }])
    );

    let response = t
        .run(
            CREATE_PRODUCT,
            json!({ "input": { "title": "A book", "description": "A good read", "price": "9.99" } }),
            Some(&token),
        )
        .await;
    let product = data(response);
    assert_eq!(product["createProduct"]["price"], "9.99");
    assert_eq!(product["createProduct"]["creator"]["_id"], user_id);
    assert_eq!(
        product["createProduct"]["creator"]["products"],
        json!([{ "_id": product["createProduct"]["_id"] }])
    );
}

#[tokio::test]
async fn test_duplicate_user_is_conflict() {
    let t = TestSchema::new();
    t.signup_and_login("a@b.com").await;

    let response = t
        .run(
            r#"mutation {
                createUser(userInput: { email: "a@b.com", name: "Max", password: "abcde" }) { _id }
            }"#,
            json!({}),
            None,
        )
        .await;
    assert_eq!(response.errors[0].message, "User exists already!");
    assert_eq!(error_code(&response), json!(409));
}

#[tokio::test]
async fn test_login_failures() {
    let t = TestSchema::new();
    t.signup_and_login("a@b.com").await;

    let response = t
        .run(
            r#"{ login(email: "a@b.com", password: "wrong") { token } }"#,
            json!({}),
            None,
        )
        .await;
    assert_eq!(response.errors[0].message, "Password is incorrect.");
    assert_eq!(error_code(&response), json!(401));

    let response = t
        .run(
            r#"{ login(email: "x@y.com", password: "abcde") { token } }"#,
            json!({}),
            None,
        )
        .await;
    assert_eq!(error_code(&response), json!(404));
}

#[tokio::test]
async fn test_queries_require_authentication() {
    let t = TestSchema::new();

    for query in [
        "{ products { totalProducts } }",
        r#"{ product(id: "00000000-0000-0000-0000-000000000000") { _id } }"#,
        "{ user { _id } }",
    ] {
        let response = t.run(query, json!({}), None).await;
        assert_eq!(error_code(&response), json!(401), "{query}");
        assert_eq!(response.errors[0].message, "Not authenticated!");
    }
}

#[tokio::test]
async fn test_products_page_and_product_lookup() {
    let t = TestSchema::new();
    let (token, _) = t.signup_and_login("a@b.com").await;
    let first = t.create_product(&token, "First book").await;
    t.create_product(&token, "Second book").await;
    t.create_product(&token, "Third book").await;

    let response = t
        .run(
            "query($page: Int) { products(page: $page) { totalProducts products { title creator { name } } } }",
            json!({ "page": 2 }),
            Some(&token),
        )
        .await;
    let page = data(response);
    assert_eq!(page["products"]["totalProducts"], 3);
    assert_eq!(
        page["products"]["products"],
        json!([{ "title": "First book", "creator": { "name": "Max" } }])
    );

    let response = t
        .run(
            "query($id: ID!) { product(id: $id) { _id title createdAt } }",
            json!({ "id": first }),
            Some(&token),
        )
        .await;
    let product = data(response);
    assert_eq!(product["product"]["title"], "First book");

    let response = t
        .run(r#"{ product(id: "not-an-id") { _id } }"#, json!({}), Some(&token))
        .await;
    assert_eq!(error_code(&response), json!(404));
    assert_eq!(response.errors[0].message, "Could not find product.");
}

#[tokio::test]
async fn test_update_and_delete_are_creator_only() {
    let t = TestSchema::new();
    let (owner, _) = t.signup_and_login("a@b.com").await;
    let (other, _) = t.signup_and_login("c@d.com").await;
    let id = t.create_product(&owner, "A book").await;

    let update = r#"
        mutation($id: ID!) {
            updateProduct(id: $id, productInput: { title: "Hijacked", description: "Hijacked", price: "1" }) { title }
        }
    "#;
    let response = t.run(update, json!({ "id": id }), Some(&other)).await;
    assert_eq!(error_code(&response), json!(403));

    let delete = "mutation($id: ID!) { deleteProduct(id: $id) }";
    let response = t.run(delete, json!({ "id": id }), Some(&other)).await;
    assert_eq!(error_code(&response), json!(403));
    assert_eq!(response.errors[0].message, "Not authorized!");

    let response = t.run(update, json!({ "id": id }), Some(&owner)).await;
    assert_eq!(data(response)["updateProduct"]["title"], "Hijacked");

    let response = t.run(delete, json!({ "id": id }), Some(&owner)).await;
    assert_eq!(data(response)["deleteProduct"], true);

    let response = t
        .run("{ user { products { _id } } }", json!({}), Some(&owner))
        .await;
    assert_eq!(data(response)["user"]["products"], json!([]));
}

#[tokio::test]
async fn test_update_status() {
    let t = TestSchema::new();
    let (token, _) = t.signup_and_login("a@b.com").await;

    let response = t
        .run(
            r#"mutation { updateStatus(status: "Busy") { status } }"#,
            json!({}),
            Some(&token),
        )
        .await;
    assert_eq!(data(response)["updateStatus"]["status"], "Busy");

    let response = t.run("{ user { status } }", json!({}), Some(&token)).await;
    assert_eq!(data(response)["user"]["status"], "Busy");
}

fn validation_messages(response: &Response) -> Value {
    let extensions = response.errors[0].extensions.as_ref().unwrap();
    extensions.get("data").cloned().unwrap().into_json().unwrap()
}

#[test]
fn test_mutation_inputs_are_nullable() {
    let sdl = TestSchema::new().schema.sdl();
    let has_line = |expected: &str| sdl.lines().any(|line| line.trim() == expected);

    for expected in [
        "createUser(userInput: UserInputData): User!",
        "createProduct(productInput: ProductInputData): Product!",
        "updateProduct(id: ID!, productInput: ProductInputData): Product!",
        "deleteProduct(id: ID!): Boolean",
        "updateStatus(status: String!): User!",
    ] {
        assert!(has_line(expected), "missing `{expected}` in:\n{sdl}");
    }
}

#[tokio::test]
async fn test_absent_input_is_invalid() {
    let t = TestSchema::new();

    let response = t.run("mutation { createUser { _id } }", json!({}), None).await;
    assert_eq!(error_code(&response), json!(422));
    assert_eq!(
        validation_messages(&response),
        json!([{ "message": "E-Mail is invalid." }, { "message": "Password too short!" }])
    );

    let (token, _) = t.signup_and_login("a@b.com").await;
    let response = t
        .run(
            "mutation($input: ProductInputData) { createProduct(productInput: $input) { _id } }",
            json!({ "input": null }),
            Some(&token),
        )
        .await;
    assert_eq!(error_code(&response), json!(422));
    assert_eq!(
        validation_messages(&response),
        json!([
            { "message": "Title is invalid." },
            { "message": "Description is invalid." },
            { "message": "Price is invalid." }
        ])
    );

    let response = t
        .run("mutation { createProduct { _id } }", json!({}), None)
        .await;
    assert_eq!(error_code(&response), json!(401));
}

#[tokio::test]
async fn test_listed_creators_are_not_looked_up_again() {
    let users = Arc::new(CountingUsers::default());
    let t = TestSchema::with_users(users.clone());
    let (token, user_id) = t.signup_and_login("a@b.com").await;
    t.create_product(&token, "First book").await;
    t.create_product(&token, "Second book").await;

    let before = users.lookups();
    let response = t
        .run(
            "{ products { products { title creator { _id name } } } }",
            json!({}),
            Some(&token),
        )
        .await;
    let page = data(response);
    assert_eq!(users.lookups(), before);
    for product in page["products"]["products"].as_array().unwrap() {
        assert_eq!(product["creator"], json!({ "_id": user_id, "name": "Max" }));
    }

    let before = users.lookups();
    let response = t
        .run(
            "{ products { products { creator { email } } } }",
            json!({}),
            Some(&token),
        )
        .await;
    let page = data(response);
    assert_eq!(users.lookups(), before + 2);
    assert_eq!(page["products"]["products"][0]["creator"]["email"], "a@b.com");
}
