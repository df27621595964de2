use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct HubName<'a> {
    pub name: &'a str,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NegotiateResponse {
    pub connection_token: String,
    pub connection_id: Option<String>,
    pub protocol_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartResponse {
    pub response: String,
}

/// A frame on the persistent connection. Keep-alive frames are an empty object.
#[allow(dead_code)]
#[derive(Debug, Default, Deserialize)]
pub struct PersistentResponse {
    #[serde(rename = "C")]
    pub message_id: Option<String>,
    #[serde(rename = "S")]
    pub initialized: Option<u8>,
    #[serde(rename = "M", default)]
    pub messages: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct HubInvocation {
    #[serde(rename = "H")]
    pub hub: String,
    #[serde(rename = "M")]
    pub method: String,
    #[serde(rename = "A", default)]
    pub arguments: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_a_hub_message() -> Result<(), serde_json::Error> {
        let json = r#"
        {
          "C": "d-5E7C1F2A-B,0|E,0|F,1",
          "M": [
            {
              "H": "ApplianceHub",
              "M": "updated",
              "A": [{ "Id": "12", "State": { "On": true, "DimLevel": 40 } }]
            }
          ]
        }
        "#;

        let response = serde_json::from_str::<PersistentResponse>(json)?;
        assert_eq!(response.messages.len(), 1);

        let invocation = serde_json::from_value::<HubInvocation>(response.messages[0].clone())?;
        assert_eq!(invocation.hub, "ApplianceHub");
        assert_eq!(invocation.method, "updated");
        assert_eq!(invocation.arguments.len(), 1);
        Ok(())
    }

    #[test]
    fn deserialize_a_keep_alive() -> Result<(), serde_json::Error> {
        let response = serde_json::from_str::<PersistentResponse>("{}")?;

        assert!(response.messages.is_empty());
        assert_eq!(response.initialized, None);
        Ok(())
    }

    #[test]
    fn serialize_connection_data() -> Result<(), serde_json::Error> {
        let connection_data = serde_json::to_string(&[HubName { name: "applianceHub" }])?;

        assert_eq!(connection_data, r#"[{"name":"applianceHub"}]"#);
        Ok(())
    }
}
