use std::time::Instant;

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

/// How a finished request is reported in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Served,
    /// 4xx: the caller sent something we refused.
    Rejected,
    /// 5xx: the server could not handle the request.
    Failed,
}

impl RequestOutcome {
    pub fn of(status: StatusCode) -> Self {
        if status.is_server_error() {
            RequestOutcome::Failed
        } else if status.is_client_error() {
            RequestOutcome::Rejected
        } else {
            RequestOutcome::Served
        }
    }
}

/// Log method, path, status and elapsed time of every request.
pub async fn profile_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    match RequestOutcome::of(response.status()) {
        RequestOutcome::Served => {
            tracing::info!(%method, %path, status, elapsed_ms, "request took {elapsed_ms} ms")
        }
        RequestOutcome::Rejected => {
            tracing::warn!(%method, %path, status, elapsed_ms, "request rejected")
        }
        RequestOutcome::Failed => {
            tracing::error!(%method, %path, status, elapsed_ms, "request failed")
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_failures() {
        assert_eq!(RequestOutcome::of(StatusCode::INTERNAL_SERVER_ERROR), RequestOutcome::Failed);
        assert_eq!(RequestOutcome::of(StatusCode::BAD_GATEWAY), RequestOutcome::Failed);
    }

    #[test]
    fn client_errors_are_rejections() {
        assert_eq!(RequestOutcome::of(StatusCode::NOT_FOUND), RequestOutcome::Rejected);
        assert_eq!(RequestOutcome::of(StatusCode::UNPROCESSABLE_ENTITY), RequestOutcome::Rejected);
    }

    #[test]
    fn success_and_redirects_are_served() {
        assert_eq!(RequestOutcome::of(StatusCode::OK), RequestOutcome::Served);
        assert_eq!(RequestOutcome::of(StatusCode::CREATED), RequestOutcome::Served);
        assert_eq!(RequestOutcome::of(StatusCode::SEE_OTHER), RequestOutcome::Served);
    }
}
