//! HTTP transport for the reservation backend API
//!
//! One typed operation per REST resource, each a thin wrapper around the
//! envelope-aware request helpers.

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{
    ApiReservation, ApiResponse, ApiShift, ApiShiftPatch, PushTokenRegistration, RejectRequest,
    ReservationStats,
};

use crate::{ClientConfig, ClientError, ClientResult};

/// Filters for listing reservations
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// "pending", "accepted" or "rejected"
    pub status: Option<String>,
    pub limit: Option<u32>,
}

impl ReservationFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(date) = &self.date {
            params.push(("date", date.clone()));
        }
        if let Some(status) = &self.status {
            params.push(("status", status.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// HTTP client for making network requests to the reservation backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send the request and decode the response envelope, translating
    /// failures into the client error taxonomy.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &str,
        request: RequestBuilder,
    ) -> ClientResult<ApiResponse<T>> {
        tracing::debug!(method, url, "api request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::error!(method, url, "request timed out");
                return Err(ClientError::Timeout);
            }
            Err(e) => {
                tracing::error!(method, url, error = %e, "network error");
                return Err(ClientError::Network(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            // Prefer the server-provided message over a generic status line
            let message = match response.json::<ApiResponse<serde_json::Value>>().await {
                Ok(envelope) => envelope.error_message().map(str::to_string),
                Err(e) if e.is_timeout() => {
                    tracing::error!(method, url, "request timed out reading the response");
                    return Err(ClientError::Timeout);
                }
                Err(_) => None,
            }
            .unwrap_or_else(|| format!("HTTP error, status: {status}"));
            tracing::error!(method, url, %status, %message, "api error");
            return Err(ClientError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        // The configured timeout can also expire mid body read; that is still
        // a timeout, not a malformed response
        let envelope: ApiResponse<T> = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) if e.is_timeout() => {
                tracing::error!(method, url, "request timed out reading the response");
                return Err(ClientError::Timeout);
            }
            Err(e) => return Err(ClientError::InvalidResponse(e.to_string())),
        };

        if !envelope.success {
            let message = envelope
                .error_message()
                .unwrap_or("request failed")
                .to_string();
            tracing::error!(method, url, %message, "api rejected request");
            return Err(ClientError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(method, url, %status, "api response");
        Ok(envelope)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ClientResult<ApiResponse<T>> {
        let url = self.url(path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.dispatch("GET", &url, request).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        let url = self.url(path);
        let request = self.client.post(&url).json(body);
        self.dispatch("POST", &url, request).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiResponse<T>> {
        let url = self.url(path);
        let request = self.client.post(&url);
        self.dispatch("POST", &url, request).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        let url = self.url(path);
        let request = self.client.put(&url).json(body);
        self.dispatch("PUT", &url, request).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiResponse<T>> {
        let url = self.url(path);
        let request = self.client.delete(&url);
        self.dispatch("DELETE", &url, request).await
    }

    // ========== Reservations API ==========

    /// List reservations, optionally filtered by date, status and limit
    pub async fn list_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> ClientResult<Vec<ApiReservation>> {
        let envelope: ApiResponse<Vec<ApiReservation>> =
            self.get("/reservations", &filter.query()).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Fetch one reservation; an unknown id is `None`, not an error
    pub async fn reservation_by_id(&self, id: &str) -> ClientResult<Option<ApiReservation>> {
        match self
            .get::<ApiReservation>(&format!("/reservations/{id}"), &[])
            .await
        {
            Ok(envelope) => Ok(envelope.data),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_reservation(
        &self,
        reservation: &ApiReservation,
    ) -> ClientResult<ApiReservation> {
        let envelope: ApiResponse<ApiReservation> =
            self.post("/reservations", reservation).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("missing reservation data".to_string()))
    }

    pub async fn update_reservation(
        &self,
        id: &str,
        updates: &ApiReservation,
    ) -> ClientResult<()> {
        self.put::<serde_json::Value, _>(&format!("/reservations/{id}"), updates)
            .await
            .map(|_| ())
    }

    pub async fn delete_reservation(&self, id: &str) -> ClientResult<()> {
        self.delete::<serde_json::Value>(&format!("/reservations/{id}"))
            .await
            .map(|_| ())
    }

    pub async fn accept_reservation(&self, id: &str) -> ClientResult<()> {
        self.post_empty::<serde_json::Value>(&format!("/reservations/{id}/accept"))
            .await
            .map(|_| ())
    }

    pub async fn reject_reservation(&self, id: &str, reason: Option<String>) -> ClientResult<()> {
        self.post::<serde_json::Value, _>(
            &format!("/reservations/{id}/reject"),
            &RejectRequest { reason },
        )
        .await
        .map(|_| ())
    }

    // ========== Shifts API ==========

    pub async fn shifts_for_date(&self, date: &str) -> ClientResult<Vec<ApiShift>> {
        let envelope: ApiResponse<Vec<ApiShift>> =
            self.get(&format!("/shifts/{date}"), &[]).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Fetch one shift; an unknown slot is `None`, not an error
    pub async fn shift(&self, date: &str, time: &str) -> ClientResult<Option<ApiShift>> {
        match self
            .get::<ApiShift>(&format!("/shifts/{date}/{time}"), &[])
            .await
        {
            Ok(envelope) => Ok(envelope.data),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn update_shift(
        &self,
        date: &str,
        time: &str,
        patch: &ApiShiftPatch,
    ) -> ClientResult<()> {
        self.put::<serde_json::Value, _>(&format!("/shifts/{date}/{time}"), patch)
            .await
            .map(|_| ())
    }

    /// Create the default shift set for a date
    pub async fn initialize_shifts(&self, date: &str) -> ClientResult<()> {
        self.post_empty::<serde_json::Value>(&format!("/shifts/{date}/initialize"))
            .await
            .map(|_| ())
    }

    pub async fn shift_stats(&self, date: &str) -> ClientResult<ReservationStats> {
        let envelope: ApiResponse<ReservationStats> =
            self.get(&format!("/shifts/{date}/stats"), &[]).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("missing stats data".to_string()))
    }

    pub async fn available_times(&self) -> ClientResult<Vec<String>> {
        let envelope: ApiResponse<Vec<String>> =
            self.get("/shifts/times/available", &[]).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    // ========== Push tokens API ==========

    pub async fn register_push_token(
        &self,
        registration: &PushTokenRegistration,
    ) -> ClientResult<()> {
        self.post::<serde_json::Value, _>("/push-tokens", registration)
            .await
            .map(|_| ())
    }

    pub async fn unregister_push_token(&self, device_id: &str) -> ClientResult<()> {
        self.delete::<serde_json::Value>(&format!("/push-tokens/{device_id}"))
            .await
            .map(|_| ())
    }

    // ========== Health ==========

    /// Liveness probe against `/health`, outside the `/api` prefix.
    /// Any failure reads as "not reachable" rather than an error.
    pub async fn health_check(&self) -> bool {
        let root = self
            .base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url);
        let url = format!("{root}/health");
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(%url, error = %e, "health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_builds_query_params() {
        let filter = ReservationFilter {
            date: Some("2025-06-14".to_string()),
            status: Some("pending".to_string()),
            limit: Some(10),
        };
        assert_eq!(
            filter.query(),
            vec![
                ("date", "2025-06-14".to_string()),
                ("status", "pending".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[test]
    fn empty_filter_builds_no_params() {
        assert!(ReservationFilter::default().query().is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:3001/api/"));
        assert_eq!(client.url("/reservations"), "http://localhost:3001/api/reservations");
    }
}
