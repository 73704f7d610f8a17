use crate::types::Href;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Envelope operation kind for requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommuniqueType {
    ReadRequest,
    CreateRequest,
    UpdateRequest,
}

/// Wire request envelope
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    #[serde(rename = "CommuniqueType")]
    pub communique_type: CommuniqueType,
    #[serde(rename = "Header")]
    pub header: RequestHeader,
    #[serde(rename = "Body", skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Request header
#[derive(Debug, Clone, Serialize)]
pub struct RequestHeader {
    #[serde(rename = "Url")]
    pub url: Href,
}

/// Wire response envelope
///
/// Fields are permissive: responses the caller is expected to interpret
/// (login results, command acknowledgements) pass through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "CommuniqueType", default, skip_serializing_if = "Option::is_none")]
    pub communique_type: Option<String>,
    #[serde(rename = "Header", default, skip_serializing_if = "Option::is_none")]
    pub header: Option<ResponseHeader>,
    #[serde(rename = "Body", default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Response header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseHeader {
    #[serde(rename = "StatusCode", default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(rename = "Url", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Href>,
    #[serde(rename = "MessageBodyType", default, skip_serializing_if = "Option::is_none")]
    pub message_body_type: Option<String>,
}

impl Request {
    fn new(communique_type: CommuniqueType, url: impl Into<Href>, body: Option<Value>) -> Self {
        Self {
            communique_type,
            header: RequestHeader { url: url.into() },
            body,
        }
    }

    /// Read the resource at `url`
    pub fn read(url: impl Into<Href>) -> Self {
        Self::new(CommuniqueType::ReadRequest, url, None)
    }

    /// Run `command` against the command processor at `url`
    pub fn create(url: impl Into<Href>, command: Value) -> Self {
        Self::new(
            CommuniqueType::CreateRequest,
            url,
            Some(json!({ "Command": command })),
        )
    }

    /// Update the resource at `url` with `body`
    pub fn update(url: impl Into<Href>, body: Value) -> Self {
        Self::new(CommuniqueType::UpdateRequest, url, Some(body))
    }
}

impl Response {
    /// Look up a field of the response body, if any
    pub fn body_field(&self, key: &str) -> Option<&Value> {
        self.body.as_ref()?.get(key)
    }

    /// Deserialize one body field into a typed shape.
    ///
    /// Returns `None` when the field is absent or does not match the
    /// expected shape; callers decide whether that is an error.
    pub(crate) fn body_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        serde_json::from_value(self.body_field(key)?.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_request_wire_shape() {
        let request = Request::read("/area/rootarea");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "CommuniqueType": "ReadRequest",
                "Header": { "Url": "/area/rootarea" }
            })
        );
    }

    #[test]
    fn create_request_wraps_command() {
        let request = Request::create("/zone/7/commandprocessor", json!({ "CommandType": "GoToSwitchedLevel" }));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "CommuniqueType": "CreateRequest",
                "Header": { "Url": "/zone/7/commandprocessor" },
                "Body": { "Command": { "CommandType": "GoToSwitchedLevel" } }
            })
        );
    }

    #[test]
    fn update_request_passes_body_through() {
        let request = Request::update("/login", json!({ "Login": { "LoginID": "user" } }));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "CommuniqueType": "UpdateRequest",
                "Header": { "Url": "/login" },
                "Body": { "Login": { "LoginID": "user" } }
            })
        );
    }

    #[test]
    fn response_body_field_lookup() {
        let response: Response = serde_json::from_value(json!({
            "CommuniqueType": "ReadResponse",
            "Header": { "StatusCode": "200 OK", "Url": "/area/1" },
            "Body": { "Area": { "href": "/area/1", "Name": "Home" } }
        }))
        .unwrap();
        assert_eq!(response.body_field("Area").unwrap()["Name"], "Home");
        assert!(response.body_field("Zone").is_none());
    }

    #[test]
    fn response_without_body_parses() {
        let response: Response =
            serde_json::from_value(json!({ "Header": { "StatusCode": "204 NoContent" } })).unwrap();
        assert!(response.body.is_none());
        assert!(response.body_field("Area").is_none());
    }
}
