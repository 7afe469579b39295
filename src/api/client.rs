//! HTTP client for the pricing backend.

use super::PricingApi;
use crate::error::{ApiErrorKind, PriceDeskError, Result};
use crate::model::{
    CatalogStats, ColorTag, FilterState, InstallmentTier, Permissions, PriceList, Product,
    ProductId, ProductPage,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// Pricing API client configuration.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL, e.g. `https://precios.example.com/api`
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Bearer token, if the backend requires one
    pub token: Option<String>,
    /// Retries for read-only requests. Mutations are never retried.
    pub max_retries: u8,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002/api".to_string(),
            timeout: Duration::from_secs(30),
            token: None,
            max_retries: 2,
        }
    }
}

/// Blocking HTTP implementation of [`PricingApi`].
pub struct HttpPricingApi {
    client: Client,
    config: ApiClientConfig,
}

#[derive(Deserialize)]
struct MeResponse {
    #[serde(default, rename = "permisos")]
    permissions: Vec<String>,
}

fn network_error(context: &str, err: &reqwest::Error) -> PriceDeskError {
    PriceDeskError::network(context, err.to_string())
}

impl HttpPricingApi {
    /// Create a new client.
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("creating HTTP client", &e))?;

        Ok(Self { client, config })
    }

    /// Full URL for an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.config.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET with exponential backoff between attempts.
    fn get_json<T: DeserializeOwned>(&self, path: &str, query: Option<&str>) -> Result<T> {
        let mut url = self.url(path);
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(q);
        }
        let context = format!("GET /{path}");

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(250 << (attempt - 1));
                std::thread::sleep(delay);
                tracing::debug!("Retry attempt {} after {:?}", attempt, delay);
            }

            let sent = self
                .authorized(self.client.get(&url))
                .header("Accept", "application/json")
                .send();
            match sent {
                Ok(response) => {
                    let response = check_status(response, &context)?;
                    return response.json().map_err(|e| {
                        PriceDeskError::api(
                            context.clone(),
                            ApiErrorKind::InvalidResponse(e.to_string()),
                        )
                    });
                }
                Err(e) => {
                    tracing::debug!("{} attempt {} failed: {}", context, attempt + 1, e);
                    last_error = Some(network_error(&context, &e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PriceDeskError::network(context, "no attempt made")))
    }

    /// Send a mutation and read back the refreshed row, if any.
    fn send_mutation(&self, builder: RequestBuilder, context: &str) -> Result<Option<Product>> {
        let response = self
            .authorized(builder)
            .send()
            .map_err(|e| network_error(context, &e))?;
        let response = check_status(response, context)?;
        let body = response.text().map_err(|e| network_error(context, &e))?;
        Ok(parse_product_body(&body, context))
    }

    fn patch_product(
        &self,
        id: ProductId,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<Option<Product>> {
        let path = format!("productos/{id}/{endpoint}");
        let context = format!("PATCH /{path}");
        self.send_mutation(self.client.patch(self.url(&path)).json(body), &context)
    }
}

/// Map a non-success status to an error, extracting the backend's message.
fn check_status(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiErrorKind::Unauthorized,
        StatusCode::NOT_FOUND => ApiErrorKind::NotFound(context.to_string()),
        _ => ApiErrorKind::Status {
            status: status.as_u16(),
            message: error_message(&body),
        },
    };
    Err(PriceDeskError::api(context, kind))
}

/// Pull `detail` or `error` out of a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

/// Mutation responses may be empty, an acknowledgement, or the product row.
fn parse_product_body(body: &str, context: &str) -> Option<Product> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Product>(body) {
        Ok(product) => Some(product),
        Err(e) => {
            tracing::debug!("{context}: response is not a product row ({e})");
            None
        }
    }
}

impl PricingApi for HttpPricingApi {
    fn name(&self) -> &'static str {
        "http"
    }

    fn list_products(&self, filter: &FilterState) -> Result<ProductPage> {
        self.get_json("productos", Some(&filter.to_query_string()))
    }

    fn stats(&self, filter: &FilterState) -> Result<CatalogStats> {
        self.get_json("productos/stats", Some(&filter.to_query_string()))
    }

    fn permissions(&self) -> Result<Permissions> {
        let me: MeResponse = self.get_json("auth/me", None)?;
        Ok(Permissions::from_names(me.permissions.iter().map(String::as_str)))
    }

    fn set_price(
        &self,
        id: ProductId,
        list: PriceList,
        value: f64,
        recalculate_installments: bool,
    ) -> Result<Option<Product>> {
        self.patch_product(
            id,
            "precio",
            &json!({
                "lista": list,
                "precio": value,
                "recalcular_cuotas": recalculate_installments,
            }),
        )
    }

    fn set_rebate(
        &self,
        id: ProductId,
        enabled: bool,
        percentage: f64,
    ) -> Result<Option<Product>> {
        self.patch_product(
            id,
            "rebate",
            &json!({ "participa": enabled, "porcentaje": percentage }),
        )
    }

    fn set_web_transfer(
        &self,
        id: ProductId,
        enabled: bool,
        percentage: f64,
        preserve: bool,
    ) -> Result<Option<Product>> {
        self.patch_product(
            id,
            "web-transferencia",
            &json!({
                "participa": enabled,
                "porcentaje": percentage,
                "preservar_porcentaje": preserve,
            }),
        )
    }

    fn set_installment(
        &self,
        id: ProductId,
        list: PriceList,
        tier: InstallmentTier,
        value: Option<f64>,
    ) -> Result<Option<Product>> {
        self.patch_product(
            id,
            "cuotas",
            &json!({
                "lista": list,
                "cuotas": tier.payments(),
                "precio": value,
            }),
        )
    }

    fn set_color(&self, id: ProductId, color: ColorTag) -> Result<Option<Product>> {
        self.patch_product(id, "color", &json!({ "color": color }))
    }

    fn set_color_batch(&self, ids: &[ProductId], color: ColorTag) -> Result<()> {
        let context = "POST /productos/color-lote";
        let builder = self
            .client
            .post(self.url("productos/color-lote"))
            .json(&json!({ "ids": ids, "color": color }));
        self.send_mutation(builder, context).map(|_| ())
    }

    fn set_out_of_cards(&self, id: ProductId, enabled: bool) -> Result<Option<Product>> {
        self.patch_product(id, "out-of-cards", &json!({ "out_of_cards": enabled }))
    }
}
