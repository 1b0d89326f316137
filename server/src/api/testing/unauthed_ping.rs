use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnauthedPingResponse {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/test/unauthed-ping",
    tag = "testing",
    responses(
        (status = 200, description = "Unauthed ping response", body = UnauthedPingResponse)
    )
)]
pub async fn unauthed_ping() -> Json<UnauthedPingResponse> {
    Json(UnauthedPingResponse {
        message: "unauthed-ping".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responds_with_fixed_message() {
        let Json(response) = unauthed_ping().await;
        assert_eq!(response.message, "unauthed-ping");
    }
}
