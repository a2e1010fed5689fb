//! Async front door to the request handlers.
//!
//! Each call is marshalled onto the tree-owner thread, optionally bounded by
//! a timeout, and recorded as one audit event.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use visprobe_core::ProbeError;
use visprobe_logging::{RequestEvent, RequestEventLogger};
use visprobe_tree::Registry;

use crate::dispatcher::{Dispatcher, DEFAULT_QUEUE_CAPACITY};
use crate::host::Host;
use crate::protocol::{
    ApplicationConfiguration, BackgroundQuery, BackgroundReply, CoordinatesReply, ElementQuery,
    ElementReply, ElementRequest, ImageReply, InputRequest, PropertyQuery, PropertyReply, Reply,
    ResourceQuery, ResourceReply, SetPropertyRequest, StatusReply, WindowConfiguration,
    WindowReply, WindowsReply,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOptions {
    pub queue_capacity: usize,
    /// Bounds how long a caller waits; the job itself still runs to completion.
    pub request_timeout: Option<Duration>,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            request_timeout: None,
        }
    }
}

pub struct ProbeService {
    dispatcher: Dispatcher<Host>,
    registry: Arc<Registry>,
    options: ServiceOptions,
    owner: Option<JoinHandle<()>>,
}

impl ProbeService {
    /// Starts the tree-owner thread; `init` builds the host on it.
    pub fn start<F>(options: ServiceOptions, init: F) -> Result<Self, ProbeError>
    where
        F: FnOnce(Arc<Registry>) -> Host + Send + 'static,
    {
        let registry = Arc::new(Registry::new());
        let owner_registry = Arc::clone(&registry);
        let (dispatcher, owner) =
            Dispatcher::spawn(options.queue_capacity, move || init(owner_registry))?;

        info!(
            queue_capacity = options.queue_capacity,
            timeout_ms = options.request_timeout.map(|t| t.as_millis() as u64),
            "Probe service started"
        );
        Ok(Self {
            dispatcher,
            registry,
            options,
            owner: Some(owner),
        })
    }

    /// Starts a service over the in-memory scene.
    pub fn headless(options: ServiceOptions) -> Result<Self, ProbeError> {
        Self::start(options, Host::headless)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    async fn call<R, F>(
        &self,
        operation: &str,
        element_id: Option<&str>,
        extra: Option<RequestEvent>,
        job: F,
    ) -> Result<R, ProbeError>
    where
        R: Reply + Send + 'static,
        F: FnOnce(&mut Host) -> R + Send + 'static,
    {
        let request_id = Uuid::new_v4().to_string();
        let pending = self.dispatcher.run(job);

        let result = match self.options.request_timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .unwrap_or_else(|_| Err(ProbeError::Timeout(limit.as_millis() as u64))),
            None => pending.await,
        };

        if let Some(event) = extra {
            RequestEventLogger::log_event(&request_id, event);
        }
        let event = match &result {
            Ok(reply) => RequestEvent::handled(operation, element_id, reply.error_messages().len()),
            Err(err) => RequestEvent::failed(operation, err),
        };
        RequestEventLogger::log_event(&request_id, event);
        result
    }

    pub async fn get_windows(&self) -> Result<WindowsReply, ProbeError> {
        self.call("get_windows", None, None, |host| host.get_windows())
            .await
    }

    pub async fn get_main_window(&self) -> Result<WindowsReply, ProbeError> {
        self.call("get_main_window", None, None, |host| host.get_main_window())
            .await
    }

    pub async fn get_element(&self, request: ElementQuery) -> Result<ElementReply, ProbeError> {
        let scope = request.window_id.clone().or_else(|| request.parent_id.clone());
        self.call("get_element", scope.as_deref(), None, move |host| {
            host.get_element(&request)
        })
        .await
    }

    pub async fn get_property(&self, request: PropertyQuery) -> Result<PropertyReply, ProbeError> {
        let id = request.element_id.clone();
        self.call("get_property", Some(id.as_str()), None, move |host| host.get_property(&request))
            .await
    }

    pub async fn set_property(
        &self,
        request: SetPropertyRequest,
    ) -> Result<PropertyReply, ProbeError> {
        let id = request.element_id.clone();
        self.call("set_property", Some(id.as_str()), None, move |host| host.set_property(&request))
            .await
    }

    pub async fn get_effective_background(
        &self,
        request: BackgroundQuery,
    ) -> Result<BackgroundReply, ProbeError> {
        let id = request.element_id.clone();
        self.call("get_effective_background", Some(id.as_str()), None, move |host| {
            host.get_effective_background(&request)
        })
        .await
    }

    pub async fn get_resource(&self, request: ResourceQuery) -> Result<ResourceReply, ProbeError> {
        let id = request.element_id.clone();
        self.call("get_resource", id.as_deref(), None, move |host| host.get_resource(&request))
            .await
    }

    pub async fn get_coordinates(
        &self,
        request: ElementRequest,
    ) -> Result<CoordinatesReply, ProbeError> {
        let id = request.element_id.clone();
        self.call("get_coordinates", Some(id.as_str()), None, move |host| {
            host.get_coordinates(&request)
        })
        .await
    }

    pub async fn initialize_application(
        &self,
        request: ApplicationConfiguration,
    ) -> Result<StatusReply, ProbeError> {
        self.call("initialize_application", None, None, move |host| {
            host.initialize_application(&request)
        })
        .await
    }

    pub async fn create_window(
        &self,
        request: WindowConfiguration,
    ) -> Result<WindowReply, ProbeError> {
        self.call("create_window", None, None, move |host| host.create_window(&request))
            .await
    }

    pub async fn get_image(&self, request: ElementRequest) -> Result<ImageReply, ProbeError> {
        let id = request.element_id.clone();
        self.call("get_image", Some(id.as_str()), None, move |host| host.get_image(&request))
            .await
    }

    pub async fn move_keyboard_focus(
        &self,
        request: ElementRequest,
    ) -> Result<StatusReply, ProbeError> {
        let id = request.element_id.clone();
        self.call("move_keyboard_focus", Some(id.as_str()), None, move |host| {
            host.move_keyboard_focus(&request)
        })
        .await
    }

    pub async fn send_input(&self, request: InputRequest) -> Result<StatusReply, ProbeError> {
        let id = request.element_id.clone();
        let audit = RequestEvent::text_input(id.as_deref(), &request.text);
        self.call("send_input", id.as_deref(), Some(audit), move |host| {
            host.send_input(&request)
        })
        .await
    }

    /// Runs an arbitrary job against the host. Used by embedders and tests.
    pub async fn with_host<R, F>(&self, job: F) -> Result<R, ProbeError>
    where
        R: Send + 'static,
        F: FnOnce(&mut Host) -> R + Send + 'static,
    {
        self.dispatcher.run(job).await
    }

    /// Closes the queue and waits for the owner thread to finish.
    pub async fn shutdown(mut self) -> Result<(), ProbeError> {
        let owner = self.owner.take();
        drop(self.dispatcher);
        if let Some(owner) = owner {
            tokio::task::spawn_blocking(move || owner.join())
                .await
                .map_err(|e| ProbeError::Other(e.into()))?
                .map_err(|_| ProbeError::ChannelClosed("tree owner panicked".into()))?;
        }
        info!("Probe service stopped");
        Ok(())
    }
}

impl std::fmt::Debug for ProbeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeService")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: &str = r#"
type: Window
name: Main
children:
  - type: StackPanel
    children:
      - type: TextBox
        name: Input
"#;

    async fn service_with_window() -> (ProbeService, String) {
        let service = ProbeService::headless(ServiceOptions::default()).unwrap();
        let reply = service
            .create_window(WindowConfiguration {
                markup: WINDOW.into(),
            })
            .await
            .unwrap();
        let id = reply.window_id.unwrap();
        (service, id)
    }

    #[tokio::test]
    async fn test_end_to_end_query_and_input() {
        let (service, window_id) = service_with_window().await;
        let element = service
            .get_element(ElementQuery {
                window_id: Some(window_id.clone()),
                parent_id: None,
                query: "~Input".into(),
            })
            .await
            .unwrap();
        let input_id = element.element_ids[0].clone();

        let reply = service
            .send_input(InputRequest {
                element_id: Some(input_id.clone()),
                text: "hello".into(),
            })
            .await
            .unwrap();
        assert!(reply.is_ok());

        let text = service
            .get_property(PropertyQuery {
                element_id: input_id,
                name: "Text".into(),
                owner_type: None,
            })
            .await
            .unwrap();
        assert_eq!(text.value, "hello");

        let windows = service.get_windows().await.unwrap();
        assert_eq!(windows.window_ids, vec![window_id]);
        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_registry_is_shared_with_owner() {
        let (service, window_id) = service_with_window().await;
        assert!(service.registry().resolve(&window_id).is_some());
        let len = service.with_host(|host| host.registry.len()).await.unwrap();
        assert_eq!(len, service.registry().len());
        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_bounds_the_wait() {
        let service = ProbeService::headless(ServiceOptions {
            queue_capacity: 4,
            request_timeout: Some(Duration::from_millis(20)),
        })
        .unwrap();

        // Occupy the owner thread longer than the timeout.
        let blocker = service.with_host(|_| std::thread::sleep(Duration::from_millis(200)));
        let (_, result) = tokio::join!(blocker, service.get_windows());
        assert!(matches!(result, Err(ProbeError::Timeout(20))));

        // The owner is still healthy afterwards.
        assert!(service.get_windows().await.is_ok());
        service.shutdown().await.unwrap();
    }
}
