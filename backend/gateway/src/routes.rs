//! JSON routes, one per service operation.
//!
//! Bodies and replies are the service's request/reply structs. Replies are
//! always 200 with `errorMessages`; only dispatcher faults map to an error
//! status.

use axum::{extract::State, Json};

use visprobe_service::{
    ApplicationConfiguration, BackgroundQuery, BackgroundReply, CoordinatesReply, ElementQuery,
    ElementReply, ElementRequest, ImageReply, InputRequest, PropertyQuery, PropertyReply,
    ResourceQuery, ResourceReply, SetPropertyRequest, StatusReply, WindowConfiguration,
    WindowReply, WindowsReply,
};

use crate::error::ApiError;
use crate::server::GatewayState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// `POST /v1/windows`
pub async fn windows(State(state): State<GatewayState>) -> ApiResult<WindowsReply> {
    Ok(Json(state.service.get_windows().await?))
}

/// `POST /v1/main-window`
pub async fn main_window(State(state): State<GatewayState>) -> ApiResult<WindowsReply> {
    Ok(Json(state.service.get_main_window().await?))
}

/// `POST /v1/element`
pub async fn element(
    State(state): State<GatewayState>,
    Json(request): Json<ElementQuery>,
) -> ApiResult<ElementReply> {
    Ok(Json(state.service.get_element(request).await?))
}

pub async fn get_property(
    State(state): State<GatewayState>,
    Json(request): Json<PropertyQuery>,
) -> ApiResult<PropertyReply> {
    Ok(Json(state.service.get_property(request).await?))
}

pub async fn set_property(
    State(state): State<GatewayState>,
    Json(request): Json<SetPropertyRequest>,
) -> ApiResult<PropertyReply> {
    Ok(Json(state.service.set_property(request).await?))
}

pub async fn background(
    State(state): State<GatewayState>,
    Json(request): Json<BackgroundQuery>,
) -> ApiResult<BackgroundReply> {
    Ok(Json(state.service.get_effective_background(request).await?))
}

pub async fn resource(
    State(state): State<GatewayState>,
    Json(request): Json<ResourceQuery>,
) -> ApiResult<ResourceReply> {
    Ok(Json(state.service.get_resource(request).await?))
}

pub async fn coordinates(
    State(state): State<GatewayState>,
    Json(request): Json<ElementRequest>,
) -> ApiResult<CoordinatesReply> {
    Ok(Json(state.service.get_coordinates(request).await?))
}

pub async fn initialize_application(
    State(state): State<GatewayState>,
    Json(request): Json<ApplicationConfiguration>,
) -> ApiResult<StatusReply> {
    Ok(Json(state.service.initialize_application(request).await?))
}

/// `POST /v1/window`: builds a window from markup and shows it.
pub async fn create_window(
    State(state): State<GatewayState>,
    Json(request): Json<WindowConfiguration>,
) -> ApiResult<WindowReply> {
    Ok(Json(state.service.create_window(request).await?))
}

pub async fn image(
    State(state): State<GatewayState>,
    Json(request): Json<ElementRequest>,
) -> ApiResult<ImageReply> {
    Ok(Json(state.service.get_image(request).await?))
}

pub async fn focus(
    State(state): State<GatewayState>,
    Json(request): Json<ElementRequest>,
) -> ApiResult<StatusReply> {
    Ok(Json(state.service.move_keyboard_focus(request).await?))
}

pub async fn input(
    State(state): State<GatewayState>,
    Json(request): Json<InputRequest>,
) -> ApiResult<StatusReply> {
    Ok(Json(state.service.send_input(request).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::sync::Arc;
    use visprobe_service::{Host, ProbeService, ServiceOptions};

    const WINDOW: &str = r##"
type: Window
name: Main
properties:
  Background: "#FF0000FF"
children:
  - type: Grid
    children:
      - type: Button
        name: Ok
"##;

    fn state() -> GatewayState {
        let service = ProbeService::headless(ServiceOptions::default()).unwrap();
        GatewayState::new(Arc::new(service))
    }

    async fn open_window(state: &GatewayState) -> String {
        let Json(reply) = create_window(
            State(state.clone()),
            Json(WindowConfiguration {
                markup: WINDOW.into(),
            }),
        )
        .await
        .unwrap();
        reply.window_id.unwrap()
    }

    #[tokio::test]
    async fn test_window_then_element_lookup() {
        let state = state();
        let window_id = open_window(&state).await;

        let Json(windows) = windows(State(state.clone())).await.unwrap();
        assert_eq!(windows.window_ids, vec![window_id.clone()]);

        let Json(reply) = element(
            State(state.clone()),
            Json(ElementQuery {
                window_id: Some(window_id),
                parent_id: None,
                query: "~Ok".into(),
            }),
        )
        .await
        .unwrap();
        assert!(reply.error_messages.is_empty());
        assert_eq!(reply.element_ids.len(), 1);
    }

    #[tokio::test]
    async fn test_recoverable_errors_stay_in_reply() {
        let state = state();
        let Json(reply) = get_property(
            State(state),
            Json(PropertyQuery {
                element_id: "missing".into(),
                name: "Width".into(),
                owner_type: None,
            }),
        )
        .await
        .unwrap();
        assert!(!reply.error_messages.is_empty());
    }

    #[tokio::test]
    async fn test_dead_owner_maps_to_unavailable() {
        let service = ProbeService::start(ServiceOptions::default(), |_| -> Host {
            panic!("host failed to start")
        })
        .unwrap();
        let state = GatewayState::new(Arc::new(service));

        let err = windows(State(state)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_reports_registered_elements() {
        let state = state();
        open_window(&state).await;
        let Json(report) = crate::health_api::get_health(State(state)).await;
        assert_eq!(report.status, "ok");
        assert_eq!(report.registered_elements, 1);
    }
}
