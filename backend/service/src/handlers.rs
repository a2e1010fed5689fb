//! Request handlers. Each runs on the tree-owner thread and folds
//! recoverable failures into the reply's `error_messages`.

use tracing::{debug, info, warn};

use visprobe_core::{Capability, NodeRef, ProbeError, PropertyRead};
use visprobe_tree::{effective_background, resolve_element};

use crate::host::Host;
use crate::protocol::{
    ApplicationConfiguration, BackgroundQuery, BackgroundReply, CoordinatesReply, ElementQuery,
    ElementReply, ElementRequest, ImageReply, InputRequest, PropertyQuery, PropertyReply,
    ResourceQuery, ResourceReply, SetPropertyRequest, StatusReply, WindowConfiguration,
    WindowReply, WindowsReply,
};

const ELEMENT_NOT_FOUND: &str = "Could not find element";

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn fill_property_reply(reply: &mut PropertyReply, read: PropertyRead) {
    reply.value_type = read.value_type();
    reply.property_type = read.declared_type;
    reply.value = read.value.to_string();
}

impl Host {
    pub fn get_windows(&mut self) -> WindowsReply {
        let window_ids = self
            .application
            .windows()
            .iter()
            .map(|window| self.registry.get_or_assign_id(window))
            .collect();
        WindowsReply {
            window_ids,
            error_messages: Vec::new(),
        }
    }

    pub fn get_main_window(&mut self) -> WindowsReply {
        let window_ids = self
            .application
            .main_window()
            .map(|window| self.registry.get_or_assign_id(&window))
            .into_iter()
            .collect();
        WindowsReply {
            window_ids,
            error_messages: Vec::new(),
        }
    }

    pub fn get_element(&mut self, request: &ElementQuery) -> ElementReply {
        let mut reply = ElementReply::default();
        let Some(root) = self.search_root(request, &mut reply.error_messages) else {
            return reply;
        };

        if request.query.trim().is_empty() {
            reply.error_messages.push("ElementQuery did not specify a query".into());
            return reply;
        }

        match resolve_element(&root, &request.query, self.properties.as_ref()) {
            Ok(element) => {
                let id = self.registry.get_or_assign_id(&element);
                debug!(query = %request.query, id = %id, "Resolved element query");
                reply.element_ids.push(id);
            }
            Err(err) => {
                reply.error_messages.push(format!(
                    "Failed to find element by query '{}' in '{}'",
                    request.query,
                    root.type_name()
                ));
                reply.error_messages.push(err.to_string());
            }
        }
        reply
    }

    fn search_root(&self, request: &ElementQuery, errors: &mut Vec<String>) -> Option<NodeRef> {
        if let Some(window_id) = non_blank(&request.window_id) {
            let window = self.registry.resolve_as(window_id, Capability::Window);
            if window.is_none() {
                errors.push("Failed to find parent window".into());
            }
            return window;
        }
        if let Some(parent_id) = non_blank(&request.parent_id) {
            let parent = self.registry.resolve_as(parent_id, Capability::Element);
            if parent.is_none() {
                errors.push("Failed to find parent element".into());
            }
            return parent;
        }
        errors.push("No parent element specified as part of the query".into());
        None
    }

    pub fn get_property(&mut self, request: &PropertyQuery) -> PropertyReply {
        let mut reply = PropertyReply::default();
        let Some(element) = self.registry.resolve(&request.element_id) else {
            reply.error_messages.push(ELEMENT_NOT_FOUND.into());
            return reply;
        };

        match self
            .properties
            .get_property(&element, &request.name, non_blank(&request.owner_type))
        {
            Ok(read) => fill_property_reply(&mut reply, read),
            Err(err) => reply.error_messages.push(err.to_string()),
        }
        reply
    }

    pub fn set_property(&mut self, request: &SetPropertyRequest) -> PropertyReply {
        let mut reply = PropertyReply::default();
        let Some(element) = self.registry.resolve(&request.element_id) else {
            reply.error_messages.push(ELEMENT_NOT_FOUND.into());
            return reply;
        };

        let result = self.properties.set_property(
            &element,
            &request.name,
            &request.value,
            non_blank(&request.value_type),
            non_blank(&request.owner_type),
        );
        match result {
            Ok(read) => {
                debug!(name = %request.name, type_name = element.type_name(), "Property set");
                fill_property_reply(&mut reply, read);
            }
            Err(err) => reply.error_messages.push(err.to_string()),
        }
        reply
    }

    pub fn get_effective_background(&mut self, request: &BackgroundQuery) -> BackgroundReply {
        let mut reply = BackgroundReply::default();
        let Some(element) = self.registry.resolve(&request.element_id) else {
            reply.error_messages.push(ELEMENT_NOT_FOUND.into());
            return reply;
        };
        // An unknown `to` element behaves as if none was given.
        let to = non_blank(&request.to_element_id).and_then(|id| self.registry.resolve(id));

        match effective_background(&element, to.as_ref()) {
            Ok(color) => {
                reply.alpha = color.a;
                reply.red = color.r;
                reply.green = color.g;
                reply.blue = color.b;
            }
            Err(err) => reply.error_messages.push(err.to_string()),
        }
        reply
    }

    pub fn get_resource(&mut self, request: &ResourceQuery) -> ResourceReply {
        let scope = non_blank(&request.element_id)
            .and_then(|id| self.registry.resolve_as(id, Capability::Element));
        let value = self.application.find_resource(scope.as_ref(), &request.key);

        ResourceReply {
            key: request.key.clone(),
            value: value.as_ref().map(ToString::to_string).unwrap_or_default(),
            value_type: value.and_then(|v| v.type_name()).unwrap_or_default(),
            error_messages: Vec::new(),
        }
    }

    pub fn get_coordinates(&mut self, request: &ElementRequest) -> CoordinatesReply {
        let mut reply = CoordinatesReply::default();
        let Some(element) = self.registry.resolve(&request.element_id) else {
            reply.error_messages.push(ELEMENT_NOT_FOUND.into());
            return reply;
        };
        if !element.has_capability(Capability::Element) {
            let err = ProbeError::CapabilityMismatch {
                node_type: element.type_name().to_string(),
                capability: Capability::Element,
            };
            reply.error_messages.push(err.to_string());
            return reply;
        }

        match self.application.screen_bounds(&element) {
            Some(rect) => {
                reply.left = rect.left;
                reply.top = rect.top;
                reply.right = rect.right;
                reply.bottom = rect.bottom;
            }
            None => reply.error_messages.push(format!(
                "Could not compute screen bounds of '{}'",
                element.type_name()
            )),
        }
        reply
    }

    pub fn initialize_application(&mut self, request: &ApplicationConfiguration) -> StatusReply {
        let mut reply = StatusReply::default();
        if self.initialized {
            reply.error_messages.push("Application has already been initialized".into());
            return reply;
        }
        self.initialized = true;

        if let Some(markup) = request.resource_markup.as_deref() {
            match self.loader.parse_resources(markup) {
                Ok(resources) => {
                    info!(count = resources.len(), "Loaded application resources");
                    self.application.merge_resources(resources);
                }
                Err(err) => reply
                    .error_messages
                    .push(format!("Error loading application resources\n{err}")),
            }
        }
        reply
    }

    pub fn create_window(&mut self, request: &WindowConfiguration) -> WindowReply {
        let mut reply = WindowReply::default();

        let window = match self.loader.parse(&request.markup) {
            Ok(window) => match self.application.show_window(window.clone()) {
                Ok(()) => Some(window),
                Err(err) => {
                    reply.error_messages.push(format!("Error loading window\n{err}"));
                    None
                }
            },
            Err(err) => {
                reply.error_messages.push(format!("Error loading window\n{err}"));
                None
            }
        };

        match window {
            Some(window) => {
                let id = self.registry.get_or_assign_id(&window);
                info!(id = %id, name = ?window.name(), "Created window");
                reply.window_id = Some(id);
            }
            None => {
                warn!("Window markup did not produce a window");
                reply.error_messages.push("Failed to load window".into());
            }
        }
        reply
    }

    pub fn get_image(&mut self, request: &ElementRequest) -> ImageReply {
        let mut reply = ImageReply::default();
        let Some(element) = self.registry.resolve_as(&request.element_id, Capability::Element) else {
            reply.error_messages.push(ELEMENT_NOT_FOUND.into());
            return reply;
        };
        let Some(rect) = self.application.screen_bounds(&element) else {
            reply.error_messages.push(format!(
                "Could not compute screen bounds of '{}'",
                element.type_name()
            ));
            return reply;
        };

        let left = rect.left.floor() as i32;
        let top = rect.top.floor() as i32;
        let width = rect.width().ceil().max(0.0) as u32;
        let height = rect.height().ceil().max(0.0) as u32;

        match self.capture.capture(left, top, width, height) {
            Ok(data) => reply.data = data,
            Err(err) => reply.error_messages.push(err.to_string()),
        }
        reply
    }

    pub fn move_keyboard_focus(&mut self, request: &ElementRequest) -> StatusReply {
        let mut reply = StatusReply::default();
        let Some(element) = self.registry.resolve_as(&request.element_id, Capability::Input) else {
            reply.error_messages.push(ELEMENT_NOT_FOUND.into());
            return reply;
        };
        if !self.application.focus(&element) {
            reply
                .error_messages
                .push(format!("Failed to move focus to element {}", element.type_name()));
        }
        reply
    }

    pub fn send_input(&mut self, request: &InputRequest) -> StatusReply {
        let mut reply = StatusReply::default();

        let target = match non_blank(&request.element_id) {
            Some(id) => match self.registry.resolve_as(id, Capability::Visual) {
                Some(element) => element,
                None => {
                    reply.error_messages.push(ELEMENT_NOT_FOUND.into());
                    return reply;
                }
            },
            None => match self.application.focused() {
                Some(focused) => focused,
                None => {
                    reply.error_messages.push("No source element to generate text.".into());
                    return reply;
                }
            },
        };

        if let Err(err) = self.application.send_text(&target, &request.text) {
            reply.error_messages.push(err.to_string());
        }
        reply
    }
}
