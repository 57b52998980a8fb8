use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::collections::VecDeque;

#[cfg(not(target_arch = "wasm32"))]
use constants::timing::NATIVE_OUTBOX_CAPACITY;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

use crate::engine::core::app_setup::EffectsSet;
use crate::engine::error::EffectsError;
use crate::rpc::handlers::{EffectsCommands, EffectsState, dispatch};

/// Notification methods the engine posts itself. Seen again on input when
/// the canvas shares a window with the host, and dropped there.
pub const OUTBOUND_NOTIFICATIONS: [&str; 10] = [
    "engine_ready",
    "loading_finished",
    "active_section_changed",
    "header_scrolled_changed",
    "scroll_to",
    "reveal_frames",
    "reveal_completed",
    "theme_changed",
    "fps_update",
    "debug_message",
];

/// JSON-RPC 2.0 request structure. Requests without an id are notifications.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
    /// Serialized messages delivered on native builds, oldest first.
    #[cfg(not(target_arch = "wasm32"))]
    native_outbox: VecDeque<String>,
}

impl WebRpcInterface {
    /// Send notification to the host without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    /// Drain everything delivered so far on native builds.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn take_native_outbox(&mut self) -> Vec<String> {
        self.native_outbox.drain(..).collect()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn deliver_native(&mut self, json: String) {
        if self.native_outbox.len() >= NATIVE_OUTBOX_CAPACITY {
            self.native_outbox.pop_front();
        }
        self.native_outbox.push_back(json);
    }
}

/// Raw JSON strings received from the host, waiting for the next frame.
///
/// Shared with the browser message listener, which only ever appends.
#[derive(Resource, Clone, Default)]
pub struct MessageQueue(Arc<Mutex<Vec<String>>>);

impl MessageQueue {
    pub fn push(&self, message: impl Into<String>) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(message.into());
        }
    }

    fn drain(&self) -> Vec<String> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

/// Plugin establishing the JSON-RPC layer between the host page and the engine.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .init_resource::<MessageQueue>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .in_set(EffectsSet::Rpc),
            )
            .add_systems(Update, send_outgoing_messages.in_set(EffectsSet::Flush));

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(message_queue: Res<MessageQueue>) {
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                queue_clone.push(message_str);
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
}

/// Event representing incoming RPC message from the host.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Res<MessageQueue>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    for message_str in message_queue.drain() {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut state: EffectsState,
    mut commands: EffectsCommands,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        let value = match serde_json::from_str::<serde_json::Value>(&event.content) {
            Ok(value) => value,
            Err(parse_error) => {
                warn!("Malformed RPC message: {}", parse_error);
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
                continue;
            }
        };

        if is_own_message(&value) {
            continue;
        }

        match serde_json::from_value::<RpcRequest>(value) {
            Ok(request) => {
                if let Some(response) =
                    handle_rpc_request(&request, &mut state, &mut commands, &mut rpc_interface)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Responses and the engine's own notifications, echoed back by a shared window.
fn is_own_message(value: &serde_json::Value) -> bool {
    match value.get("method").and_then(serde_json::Value::as_str) {
        Some(method) => value.get("id").is_none() && OUTBOUND_NOTIFICATIONS.contains(&method),
        None => value.get("result").is_some() || value.get("error").is_some(),
    }
}

/// Handle individual RPC message. Notifications are applied but never answered.
fn handle_rpc_request(
    request: &RpcRequest,
    state: &mut EffectsState,
    commands: &mut EffectsCommands,
    rpc_interface: &mut WebRpcInterface,
) -> Option<RpcResponse> {
    let id = request.id.clone();

    if request.jsonrpc != "2.0" {
        warn!("Rejected RPC with jsonrpc version '{}'", request.jsonrpc);
        return id.map(|id| {
            create_error_response(
                id,
                -32600,
                "Invalid request",
                Some(serde_json::json!({ "jsonrpc": request.jsonrpc })),
            )
        });
    }

    let Some(result) = dispatch(
        &request.method,
        &request.params,
        state,
        commands,
        rpc_interface,
    ) else {
        warn!("Unknown RPC method: {}", request.method);
        return id.map(|id| {
            create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({ "method": request.method })),
            )
        });
    };

    let result = result.map_err(|error| {
        warn!("RPC '{}' failed: {}", request.method, error);
        RpcError::from(error)
    });

    let id = id?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    let notifications = std::mem::take(&mut rpc_interface.outgoing_notifications);
    let responses = std::mem::take(&mut rpc_interface.outgoing_responses);

    // Notifications first, responses second to maintain order.
    for notification in &notifications {
        deliver(&mut rpc_interface, notification);
    }
    for response in &responses {
        deliver(&mut rpc_interface, response);
    }
}

fn deliver<T: Serialize>(rpc_interface: &mut WebRpcInterface, message: &T) {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize message: {}", e);
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        let _ = rpc_interface;
        send_message_to_parent(&json);
    }

    #[cfg(not(target_arch = "wasm32"))]
    rpc_interface.deliver_native(json);
}

/// Post serialized message to the parent window (the page itself when not framed).
#[cfg(target_arch = "wasm32")]
fn send_message_to_parent(json: &str) {
    if let Some(window) = window() {
        if let Some(parent) = window.parent().ok().flatten() {
            if let Err(e) = parent.post_message(&JsValue::from_str(json), "*") {
                error!("Failed to send message to parent: {:?}", e);
            }
        } else {
            warn!("No parent window available for message transmission");
        }
    } else {
        error!("Window object not available");
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Every engine error stems from host input, so all map to invalid params.
impl From<EffectsError> for RpcError {
    fn from(error: EffectsError) -> Self {
        Self::invalid_params(&error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_without_params_or_id() {
        let request: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"toggle_theme"}"#).unwrap();
        assert_eq!(request.params, serde_json::Value::Null);
        assert!(request.id.is_none());
    }

    #[test]
    fn test_own_messages_are_recognised() {
        assert!(is_own_message(&json!({"jsonrpc": "2.0", "method": "reveal_frames", "params": {}})));
        assert!(is_own_message(&json!({"jsonrpc": "2.0", "result": {}, "id": 1})));
        assert!(!is_own_message(&json!({"jsonrpc": "2.0", "method": "scroll", "params": {}})));
        // A request that happens to reuse a notification name still gets answered.
        assert!(!is_own_message(&json!({"jsonrpc": "2.0", "method": "scroll_to", "id": 3})));
    }

    #[test]
    fn test_effects_errors_map_to_invalid_params() {
        let error = RpcError::from(EffectsError::UnknownTheme("sepia".to_string()));
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Unknown theme: sepia");
    }

    #[test]
    fn test_success_response_omits_error() {
        let response = RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(json!({"ok": true})),
            error: None,
            id: Some(json!(1)),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(value["result"]["ok"], json!(true));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_outbox_is_bounded() {
        let mut interface = WebRpcInterface::default();
        for index in 0..NATIVE_OUTBOX_CAPACITY + 5 {
            interface.deliver_native(index.to_string());
        }
        let outbox = interface.take_native_outbox();
        assert_eq!(outbox.len(), NATIVE_OUTBOX_CAPACITY);
        assert_eq!(outbox[0], "5");
    }
}
