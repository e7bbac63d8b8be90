//! HTTP client for the shop endpoints
//!
//! - `POST /add_to_cart/{id}` (form `quantity=<n>`)
//! - `GET /product/{id}`
//! - `POST /api/place_order`
//! - `GET /api/order_status/{id}`
//!
//! Redirects are not followed: the shop answers a logged-out request with a
//! redirect to its login page, which must not read as a confirmation.

use crate::config::ClientConfig;
use crate::error::{AddToCartError, ClientError, ADD_TO_CART_FALLBACK};
use crate::notice::Notice;
use crate::order::{CheckoutOutcome, OrderRequest, OrderStatus, PlacedOrder};
use async_trait::async_trait;
use reqwest::{redirect, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use trattoria_cart::{
    CartSession, CartStore, LookupError, Product, ProductId, ProductLookup, Quantity,
};
use url::Url;

/// Success body of `POST /add_to_cart/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddedToCart {
    /// Confirmation text
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the cart and order endpoints
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base: Url,
    notice_ttl: Duration,
}

impl StoreClient {
    /// Create client from configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            base: config.base()?,
            notice_ttl: config.notice_ttl(),
        })
    }

    /// Base URL all endpoints are joined onto
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base.join(path)
    }

    /// Ask the server to add `quantity` units of `id` to the cart
    ///
    /// # Errors
    /// Returns [`AddToCartError::Rejected`] with the server's message
    /// verbatim on a non-2xx answer, [`AddToCartError::Malformed`] if a 2xx
    /// body is not a JSON confirmation, [`AddToCartError::Transport`] if no
    /// answer arrived
    pub async fn add_to_cart(
        &self,
        id: ProductId,
        quantity: Quantity,
    ) -> Result<AddedToCart, AddToCartError> {
        let url = self
            .endpoint(&format!("add_to_cart/{id}"))
            .map_err(|e| AddToCartError::Transport(e.to_string()))?;
        tracing::info!(%id, quantity = quantity.get(), "POST {}", url);

        let response = self
            .http
            .post(url)
            .form(&[("quantity", quantity.get())])
            .send()
            .await
            .map_err(|e| AddToCartError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AddToCartError::Transport(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|e| {
                tracing::warn!(%id, status = status.as_u16(), "Add to cart not confirmed: {}", e);
                AddToCartError::Malformed(e.to_string())
            });
        }

        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| ADD_TO_CART_FALLBACK.to_string());
        tracing::warn!(%id, status = status.as_u16(), "Add to cart rejected: {}", message);
        Err(AddToCartError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Add to the server cart, then mirror the change into `session`
    ///
    /// The session cart is only touched after the server confirms. If the
    /// grown cart no longer fits in its cookie the add is undone locally, so
    /// the working cart always matches what was stored. The returned notice
    /// reports the outcome either way.
    pub async fn add_to_session<S: CartStore>(
        &self,
        session: &mut CartSession<S>,
        id: ProductId,
        quantity: Quantity,
    ) -> Notice {
        if let Err(e) = self.add_to_cart(id, quantity).await {
            return Notice::from_add_error(&e).with_ttl(self.notice_ttl);
        }

        let previous = session.cart().quantity(id);
        session.cart_mut().add(id, quantity);
        if let Err(e) = session.save() {
            tracing::warn!(%id, "Cart accepted by server but not stored locally: {}", e);
            session.cart_mut().set_quantity(id, previous);
            return Notice::cart_full().with_ttl(self.notice_ttl);
        }
        Notice::cart_added().with_ttl(self.notice_ttl)
    }

    /// Fetch a product record
    ///
    /// # Errors
    /// Returns [`LookupError`] on network failure, non-2xx status or a body
    /// that is not a product
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, LookupError> {
        let url = self
            .endpoint(&format!("product/{id}"))
            .map_err(|e| LookupError::transport(id, e.to_string()))?;
        tracing::debug!(%id, "GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::transport(id, e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<Product>()
                .await
                .map_err(|e| LookupError::malformed(id, e.to_string())),
            StatusCode::NOT_FOUND => Err(LookupError::not_found(id)),
            status => Err(LookupError::status(id, status.as_u16())),
        }
    }

    /// Place a table order
    ///
    /// # Errors
    /// Returns [`ClientError::Rejected`] with the server's message on a
    /// non-2xx answer
    pub async fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder, ClientError> {
        let url = self.endpoint("api/place_order")?;
        tracing::info!(lines = order.items.len(), table = ?order.table_number, "POST {}", url);
        let response = self.http.post(url).json(order).send().await?;
        let placed: PlacedOrder = read_json(response).await?;
        tracing::info!(order_id = placed.order_id, "Order placed");
        Ok(placed)
    }

    /// Order everything in the session cart
    ///
    /// An empty cart is refused without contacting the server. The session
    /// is cleared only once the server accepts the order; on any failure the
    /// cart and its cookie stay as they were.
    pub async fn checkout<S: CartStore>(
        &self,
        session: &mut CartSession<S>,
        table: Option<u32>,
    ) -> CheckoutOutcome {
        if session.cart().is_empty() {
            return CheckoutOutcome {
                notice: Notice::empty_cart().with_ttl(self.notice_ttl),
                order: None,
            };
        }

        let mut request = OrderRequest::from_cart(session.cart());
        if let Some(table) = table {
            request = request.with_table(table);
        }

        match self.place_order(&request).await {
            Ok(placed) => {
                session.clear();
                CheckoutOutcome {
                    notice: Notice::order_placed(&placed.message).with_ttl(self.notice_ttl),
                    order: Some(placed),
                }
            }
            Err(e) => {
                tracing::warn!("Checkout failed, keeping cart: {}", e);
                CheckoutOutcome {
                    notice: Notice::from_order_error(&e).with_ttl(self.notice_ttl),
                    order: None,
                }
            }
        }
    }

    /// Fetch the status of a placed order
    ///
    /// # Errors
    /// Returns [`ClientError::Rejected`] for unknown orders
    pub async fn order_status(&self, order_id: u64) -> Result<OrderStatus, ClientError> {
        let url = self.endpoint(&format!("api/order_status/{order_id}"))?;
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }
}

async fn read_json<T>(response: Response) -> Result<T, ClientError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    serde_json::from_slice(&body).map_err(|e| ClientError::Malformed(e.to_string()))
}

#[async_trait]
impl ProductLookup for StoreClient {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.fetch_product(id).await
    }
}
