//! Pose synchronisation protocol
//!
//! Wire shapes of the camera and joint messages exchanged with the external
//! transport. Outbound camera poses are JSON-RPC 2.0 notifications:
//!
//! ```json
//! { "jsonrpc": "2.0", "method": "change-camera",
//!   "params": { "clientId": "...", "radius": 1.0, "theta": 0.0, "phi": 1.57,
//!               "camX": 1.0, "camY": 0.0, "camZ": 0.0,
//!               "targetX": 0.0, "targetY": 0.0, "targetZ": 0.0 } }
//! ```
//!
//! Inbound messages are either the same `change-camera` shape (every field
//! optional) or a `set_joint_angles` command. A joint entry is either a bare
//! number or an object carrying its own rotation axis, for peers driving a
//! viewer that has no axis configuration:
//!
//! ```json
//! { "method": "set_joint_angles",
//!   "params": { "units": "degrees",
//!               "joints": { "elbow_flex.pos": 30,
//!                           "shoulder_pan.pos": { "axis": "y", "value": 15 } } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{Result, TwinError};
use crate::joints::axis::Axis;
use crate::joints::engine::JointValue;
use crate::joints::transforms::AngleUnits;

pub const JSONRPC_VERSION: &str = "2.0";
pub const METHOD_CHANGE_CAMERA: &str = "change-camera";
pub const METHOD_SET_JOINT_ANGLES: &str = "set_joint_angles";

/// JSON-RPC style envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcMessage<P> {
    pub jsonrpc: String,
    pub method: String,
    pub params: P,
}

impl<P> RpcMessage<P> {
    #[must_use]
    pub fn new(method: &str, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
        }
    }
}

/// Outbound camera pose. Angles in radians, `theta` azimuthal, `phi` polar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPoseParams {
    pub client_id: String,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    pub cam_x: f32,
    pub cam_y: f32,
    pub cam_z: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub target_z: f32,
}

pub type CameraPoseMessage = RpcMessage<CameraPoseParams>;

/// Inbound camera pose from a remote peer.
///
/// Every numeric field is optional. Absent, `null` and non-numeric values
/// all read as `None` and take the controller's documented default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCameraPose {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub radius: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub theta: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub phi: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub cam_x: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub cam_y: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub cam_z: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub target_x: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub target_y: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub target_z: Option<f32>,
}

impl From<&CameraPoseParams> for RemoteCameraPose {
    fn from(p: &CameraPoseParams) -> Self {
        Self {
            client_id: Some(p.client_id.clone()),
            radius: Some(p.radius),
            theta: Some(p.theta),
            phi: Some(p.phi),
            cam_x: Some(p.cam_x),
            cam_y: Some(p.cam_y),
            cam_z: Some(p.cam_z),
            target_x: Some(p.target_x),
            target_y: Some(p.target_y),
            target_z: Some(p.target_z),
        }
    }
}

fn lenient_f32<'de, D>(deserializer: D) -> std::result::Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f32))
}

fn value_as_f32(value: &Value) -> Option<f32> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    let number = number as f32;
    number.is_finite().then_some(number)
}

/// Reads a joint entry: a number, or `{ "value": .., "axis": .. }`.
///
/// An unrecognised axis is dropped with a warning and the value kept, so a
/// configured viewer still applies it.
fn value_as_joint(name: &str, value: &Value) -> Option<JointValue> {
    let Value::Object(entry) = value else {
        return value_as_f32(value).map(JointValue::from);
    };

    let value = entry.get("value").and_then(value_as_f32)?;
    let axis = match entry.get("axis") {
        None | Some(Value::Null) => None,
        Some(Value::String(axis)) => match axis.parse::<Axis>() {
            Ok(axis) => Some(axis),
            Err(err) => {
                log::warn!("Ignoring axis for joint '{name}': {err}");
                None
            }
        },
        Some(other) => {
            log::warn!("Ignoring non-string axis for joint '{name}': {other}");
            None
        }
    };
    Some(JointValue { value, axis })
}

fn lenient_units<'de, D>(deserializer: D) -> std::result::Result<AngleUnits, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => AngleUnits::default(),
        Some(value) => serde_json::from_value::<AngleUnits>(value.clone()).unwrap_or_else(|_| {
            log::warn!("Unknown angle units {value}, assuming degrees");
            AngleUnits::default()
        }),
    })
}

/// A decoded `set_joint_angles` command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointAnglesCommand {
    pub units: AngleUnits,
    /// Joint name (as sent, suffix included) and value, in key order.
    pub joints: Vec<(String, JointValue)>,
}

#[derive(Debug, Deserialize)]
struct RawJointAngles {
    #[serde(default, deserialize_with = "lenient_units")]
    units: AngleUnits,
    #[serde(default)]
    joints: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Value,
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    ChangeCamera(RemoteCameraPose),
    SetJointAngles(JointAnglesCommand),
}

impl InboundMessage {
    /// Decodes one message.
    ///
    /// Fails on malformed JSON or an unhandled method. Unreadable joint
    /// values and unknown units are logged and dropped or defaulted rather
    /// than failing the message.
    pub fn parse(json: &str) -> Result<Self> {
        let envelope: RawEnvelope = serde_json::from_str(json)?;
        let method = envelope.method.unwrap_or_default();
        let params = if envelope.params.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            envelope.params
        };

        match method.as_str() {
            METHOD_CHANGE_CAMERA => Ok(Self::ChangeCamera(serde_json::from_value(params)?)),
            METHOD_SET_JOINT_ANGLES => {
                let raw: RawJointAngles = serde_json::from_value(params)?;
                let joints = raw
                    .joints
                    .into_iter()
                    .filter_map(|(name, value)| match value_as_joint(&name, &value) {
                        Some(v) => Some((name, v)),
                        None => {
                            log::warn!("Dropping unreadable value for joint '{name}': {value}");
                            None
                        }
                    })
                    .collect();
                Ok(Self::SetJointAngles(JointAnglesCommand {
                    units: raw.units,
                    joints,
                }))
            }
            other => Err(TwinError::UnknownMethod(other.to_string())),
        }
    }
}

/// Outbound transport capability.
///
/// The viewer never talks to the network itself; it hands each outbound
/// camera pose to this sink together with the sender id and model name.
pub trait PoseTransport {
    fn send(&mut self, client_id: &str, model_name: &str, message: &CameraPoseMessage);
}

impl<F> PoseTransport for F
where
    F: FnMut(&str, &str, &CameraPoseMessage),
{
    fn send(&mut self, client_id: &str, model_name: &str, message: &CameraPoseMessage) {
        self(client_id, model_name, message);
    }
}

/// A transport that drops everything, for views with no peer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl PoseTransport for NullTransport {
    fn send(&mut self, _client_id: &str, _model_name: &str, _message: &CameraPoseMessage) {}
}
