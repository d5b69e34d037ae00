use crate::{Limiter, LimiterError};

use reqwest::{Error, RequestBuilder, Response};

pub type ReqwestResult = Result<Response, Error>;

/// Why a limited request produced no response.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error(transparent)]
    Limiter(#[from] LimiterError),

    #[error(transparent)]
    Request(#[from] Error),
}

pub trait ReqwestRequestBuilderExt {
    /// Sends the request once `limiter` admits it.
    fn send_limited(
        self,
        limiter: impl AsRef<Limiter<ReqwestResult>>,
    ) -> impl Future<Output = Result<Response, SendError>>;
}

impl ReqwestRequestBuilderExt for RequestBuilder {
    async fn send_limited(
        self,
        limiter: impl AsRef<Limiter<ReqwestResult>>,
    ) -> Result<Response, SendError> {
        let (client, req) = self.build_split();
        let req = req?;

        let res = limiter
            .as_ref()
            .submit(move || async move { client.execute(req).await })
            .await??;

        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use reqwest::{Client, StatusCode};
    use std::{sync::Arc, time::Duration};
    use tokio::time::Instant;

    #[tokio::test]
    async fn it_should_work() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v1/accounts")
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let client = Client::new();
        let limiter = Limiter::new(1, Duration::from_millis(50));
        let before = Instant::now();

        let response = client
            .get(format!("{}/api/v1/accounts", server.url()))
            .send_limited(&limiter)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(Instant::now() - before >= Duration::from_millis(50));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_statuses_are_returned_as_responses() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/api/v1/orders")
            .with_status(429)
            .create_async()
            .await;

        let limiter = Limiter::new(1, Duration::from_millis(10));

        let response = Client::new()
            .post(format!("{}/api/v1/orders", server.url()))
            .send_limited(&limiter)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(limiter.active(), 0);
    }

    #[tokio::test]
    async fn stopped_limiter_rejects_requests() {
        let server = mockito::Server::new_async().await;
        let limiter = Limiter::new(1, Duration::from_millis(10));

        limiter.stop();

        let result = Client::new()
            .get(server.url())
            .send_limited(&limiter)
            .await;

        assert!(matches!(
            result,
            Err(SendError::Limiter(LimiterError::Stopped))
        ));
    }

    #[tokio::test]
    async fn invalid_requests_fail_without_being_queued() {
        let limiter = Limiter::new(1, Duration::from_millis(10));

        let result = Client::new()
            .get("not a url")
            .send_limited(&limiter)
            .await;

        assert!(matches!(result, Err(SendError::Request(_))));
        assert_eq!(limiter.stats().admitted, 0);
    }

    #[tokio::test]
    async fn twenty_requests_respect_the_limit() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/api/v1/orders")
            .with_status(200)
            .with_body(r#"{"code":"200000"}"#)
            .expect(20)
            .create_async()
            .await;

        let client = Client::new();
        let url = format!("{}/api/v1/orders", server.url());

        let limiter = Arc::new(Limiter::new(5, Duration::from_millis(20)));
        let before = Instant::now();

        let requests = (0..20).map(|i| {
            client
                .post(&url)
                .body(format!(r#"{{"clientOid":"{i}","price":"{}"}}"#, 20000 + i * 10))
                .send_limited(limiter.clone())
        });

        let responses = join_all(requests).await;

        assert!(
            responses
                .iter()
                .all(|res| res.as_ref().is_ok_and(|res| res.status() == StatusCode::OK))
        );
        assert!(Instant::now() - before >= Duration::from_millis(80));

        let stats = limiter.stats();
        assert_eq!(stats.admitted, 20);
        assert_eq!(stats.active, 0);
        assert_eq!(stats.queued, 0);

        mock.assert_async().await;
    }
}
