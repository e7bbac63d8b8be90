use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use trattoria_cart::{
    CartSession, CartStore, CookieJar, Hydrator, LookupErrorKind, ProductLookup, Quantity,
    MAX_COOKIE_BYTES,
};
use trattoria_client::{
    load_cart_page, AddToCartError, CachedLookup, CartPage, ClientConfig, ClientError, NoticeLevel,
    OrderRequest, OrderState, StoreClient,
};
use trattoria_test_utils::pid;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> StoreClient {
    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_timeout_secs(5)
        .with_notice_ttl_ms(3_000);
    StoreClient::new(&config).expect("valid test config")
}

fn qty(n: u32) -> Quantity {
    Quantity::new(n).unwrap()
}

fn confirmed() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"message": "Added to cart"}))
}

fn out_of_stock() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({"error": "Not enough stock"}))
}

#[tokio::test]
async fn add_to_cart_posts_form_quantity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/3"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("quantity=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Added to cart"})))
        .expect(1)
        .mount(&server)
        .await;

    let added = client_for(&server).add_to_cart(pid(3), qty(2)).await.unwrap();
    assert_eq!(added.message, "Added to cart");
}

#[tokio::test]
async fn rejection_message_is_passed_through_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/5"))
        .respond_with(out_of_stock())
        .mount(&server)
        .await;

    let err = client_for(&server).add_to_cart(pid(5), qty(99)).await.unwrap_err();
    assert_eq!(
        err,
        AddToCartError::Rejected {
            status: 400,
            message: "Not enough stock".to_string()
        }
    );
}

#[tokio::test]
async fn rejection_without_error_field_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/5"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).add_to_cart(pid(5), qty(1)).await.unwrap_err();
    assert_eq!(err.user_message(), "Error adding product to cart");
}

#[tokio::test]
async fn session_is_untouched_until_server_confirms() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/1"))
        .respond_with(confirmed())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/2"))
        .respond_with(out_of_stock())
        .mount(&server)
        .await;

    let client = client_for(&server);
    let jar = CookieJar::new();
    let mut session = CartSession::new(&jar);

    let ok = client.add_to_session(&mut session, pid(1), qty(2)).await;
    assert_eq!(ok.level, NoticeLevel::Success);
    assert_eq!(ok.message, "Product added to cart successfully");
    assert_eq!(ok.ttl, Duration::from_secs(3));

    let refused = client.add_to_session(&mut session, pid(2), qty(1)).await;
    assert_eq!(refused.level, NoticeLevel::Danger);
    assert_eq!(refused.message, "Not enough stock");

    assert_eq!(session.cart().quantity(pid(1)), 2);
    assert!(!session.cart().contains(pid(2)));
    assert_eq!(jar.set_cookie_header(), "cart=1:2; Path=/; SameSite=Lax");
}

#[tokio::test]
async fn success_status_without_confirmation_body_is_not_an_add() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Please log in</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.add_to_cart(pid(1), qty(1)).await.unwrap_err();
    assert!(matches!(err, AddToCartError::Malformed(_)));

    let jar = CookieJar::new();
    let mut session = CartSession::new(&jar);
    let notice = client.add_to_session(&mut session, pid(1), qty(1)).await;
    assert_eq!(notice.level, NoticeLevel::Danger);
    assert_eq!(notice.message, "Error adding product to cart");
    assert!(session.cart().is_empty());
    assert!(jar.load().is_none());
}

#[tokio::test]
async fn login_redirect_is_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/1"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/login"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Log in</html>"))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).add_to_cart(pid(1), qty(1)).await.unwrap_err();
    assert_eq!(
        err,
        AddToCartError::Rejected {
            status: 302,
            message: "Error adding product to cart".to_string()
        }
    );
}

#[tokio::test]
async fn confirmed_add_that_overflows_cookie_is_undone_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/2000000"))
        .respond_with(confirmed())
        .mount(&server)
        .await;

    let jar = CookieJar::new();
    let mut session = CartSession::new(&jar);
    for id in 1_000_000..1_000_272 {
        session.cart_mut().add(pid(id), qty(999_999));
    }
    session.save().unwrap();
    let stored = jar.load();
    let before = session.cart().clone();

    let notice = client_for(&server)
        .add_to_session(&mut session, pid(2_000_000), qty(999_999))
        .await;
    assert_eq!(notice.level, NoticeLevel::Danger);
    assert_eq!(session.cart(), &before);
    assert_eq!(jar.load(), stored);
    assert!(jar.name().len() + 1 + stored.map_or(0, |v| v.len()) <= MAX_COOKIE_BYTES);

    // What is in memory is exactly what a reload restores
    let mut reloaded = CartSession::new(&jar);
    reloaded.load();
    assert_eq!(reloaded.cart(), session.cart());
}

#[tokio::test]
async fn confirmed_add_to_existing_line_rolls_back_to_previous_quantity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/1000000"))
        .respond_with(confirmed())
        .mount(&server)
        .await;

    let jar = CookieJar::new();
    let mut session = CartSession::new(&jar);
    session.cart_mut().add(pid(1_000_000), qty(1));
    for id in 1_000_001..1_000_273 {
        session.cart_mut().add(pid(id), qty(999_999));
    }
    session.save().unwrap();

    let notice = client_for(&server)
        .add_to_session(&mut session, pid(1_000_000), qty(999_999_999))
        .await;
    assert_eq!(notice.level, NoticeLevel::Danger);
    assert_eq!(session.cart().quantity(pid(1_000_000)), 1);
    assert_eq!(session.cart().iter().next().map(|(id, _)| id), Some(pid(1_000_000)));
}

#[tokio::test]
async fn product_lookup_maps_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "Hammer", "price": 19.99, "image_url": "/static/images/placeholder.jpg"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/4"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let hammer = client.product(pid(1)).await.unwrap();
    assert_eq!(hammer.price.to_string(), "19.99");

    assert_eq!(client.product(pid(2)).await.unwrap_err().kind, LookupErrorKind::NotFound);
    assert!(matches!(
        client.product(pid(3)).await.unwrap_err().kind,
        LookupErrorKind::Malformed(_)
    ));
    assert_eq!(client.product(pid(4)).await.unwrap_err().kind, LookupErrorKind::Status(503));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_lookup_error() {
    let config = ClientConfig::new().with_base_url("http://127.0.0.1:9/").with_timeout_secs(1);
    let client = StoreClient::new(&config).unwrap();
    let err = client.product(pid(1)).await.unwrap_err();
    assert!(matches!(err.kind, LookupErrorKind::Transport(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn cart_page_prices_through_the_server_and_flags_gaps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Hammer", "price": 19.99, "image_url": "/static/images/placeholder.jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_lookup_cache(100, 60);
    let lookup = CachedLookup::from_config(StoreClient::new(&config).unwrap(), &config);
    let jar = CookieJar::from_header("cart=1:2|2:1");
    let mut session = CartSession::new(&jar);
    let hydrator = Hydrator::new();

    let page = load_cart_page(&mut session, &hydrator, &lookup).await;
    assert!(page.checkout_enabled());
    match &page {
        CartPage::Priced { cart, notices } => {
            assert_eq!(cart.total().to_string(), "39.98");
            assert_eq!(cart.unresolved().len(), 1);
            assert_eq!(notices.len(), 1);
            assert_eq!(notices[0].level, NoticeLevel::Danger);
        }
        other => panic!("expected priced page, got {other:?}"),
    }

    // Second render hits the cache for product 1
    let again = load_cart_page(&mut session, &hydrator, &lookup).await;
    assert!(matches!(again, CartPage::Priced { .. }));
}

#[tokio::test]
async fn malformed_cookie_renders_empty_page() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let jar = CookieJar::from_header("cart={1: 2}");
    let mut session = CartSession::new(&jar);

    let page = load_cart_page(&mut session, &Hydrator::new(), &client).await;
    match page {
        CartPage::Empty { notice } => {
            assert_eq!(notice.level, NoticeLevel::Info);
            assert_eq!(notice.message, "Your cart is empty.");
        }
        other => panic!("expected empty page, got {other:?}"),
    }
}

#[tokio::test]
async fn place_order_and_poll_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/place_order"))
        .and(body_json(json!({
            "table_number": 4,
            "items": [
                {"id": 4, "quantity": 1, "special_instructions": ""},
                {"id": 7, "quantity": 2, "special_instructions": ""}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": "Order placed successfully", "order_id": 17})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/order_status/17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "pending",
            "created_at": "Mon, 19 Oct 2026 12:00:00 GMT",
            "total_amount": 40.97
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/order_status/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let jar = CookieJar::from_header("cart=4:1|7:2");
    let mut session = CartSession::new(&jar);
    session.load();

    let placed = client
        .place_order(&OrderRequest::from_cart(session.cart()).with_table(4))
        .await
        .unwrap();
    assert_eq!(placed.order_id, 17);

    let status = client.order_status(placed.order_id).await.unwrap();
    assert_eq!(status.status, OrderState::Pending);
    assert_eq!(status.total_amount.to_string(), "40.97");

    let missing = client.order_status(99).await.unwrap_err();
    assert!(matches!(missing, ClientError::Rejected { status: 404, .. }));
    assert!(!missing.is_retryable());
}

#[tokio::test]
async fn checkout_clears_cart_once_order_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/place_order"))
        .and(body_json(json!({
            "table_number": 2,
            "items": [{"id": 5, "quantity": 1, "special_instructions": ""}]
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": "Order placed successfully", "order_id": 8})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let jar = CookieJar::from_header("cart=5:1");
    let mut session = CartSession::new(&jar);
    session.load();

    let outcome = client_for(&server).checkout(&mut session, Some(2)).await;
    assert!(outcome.is_placed());
    assert_eq!(outcome.order.map(|o| o.order_id), Some(8));
    assert_eq!(outcome.notice.level, NoticeLevel::Success);
    assert_eq!(outcome.notice.message, "Order placed successfully");
    assert!(session.cart().is_empty());
    assert_eq!(jar.set_cookie_header(), "cart=; Path=/; Max-Age=0");
}

#[tokio::test]
async fn refused_checkout_keeps_cart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/place_order"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "Not enough stock for Tiramisu"})),
        )
        .mount(&server)
        .await;

    let jar = CookieJar::from_header("cart=7:3");
    let mut session = CartSession::new(&jar);
    session.load();

    let outcome = client_for(&server).checkout(&mut session, None).await;
    assert!(!outcome.is_placed());
    assert_eq!(outcome.notice.level, NoticeLevel::Danger);
    assert_eq!(outcome.notice.message, "Not enough stock for Tiramisu");
    assert_eq!(session.cart().quantity(pid(7)), 3);
    assert_eq!(jar.load().as_deref(), Some("7:3"));
}

#[tokio::test]
async fn empty_checkout_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/place_order"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let jar = CookieJar::new();
    let mut session = CartSession::new(&jar);
    let outcome = client_for(&server).checkout(&mut session, Some(1)).await;
    assert!(!outcome.is_placed());
    assert_eq!(outcome.notice.message, "Your cart is empty.");
}

#[tokio::test]
async fn configured_cookie_name_scopes_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add_to_cart/3"))
        .respond_with(confirmed())
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_cookie_name("table_cart");
    let client = StoreClient::new(&config).unwrap();
    let jar = CookieJar::from_header_named(&config.cookie_name, "cart=9:9; table_cart=3:1");
    let mut session = CartSession::new(&jar);
    session.load();

    client.add_to_session(&mut session, pid(3), qty(1)).await;
    assert_eq!(jar.set_cookie_header(), "table_cart=3:2; Path=/; SameSite=Lax");
    assert_eq!(jar.get("cart").as_deref(), Some("9:9"));
}
