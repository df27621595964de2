use crate::sse::{self, ServerSentEvent};
use crate::tommotica::client::{TommoticaClient, ensure_success};
use crate::tommotica::domain::{ApplianceUpdated, HubInvocation, HubName, NegotiateResponse, PersistentResponse, StartResponse};
use crate::tommotica::error::{TommoticaError, TransportError};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::fmt::Debug;
use tracing::{debug, info, instrument, warn};

const HUB: &str = "applianceHub";
const UPDATED: &str = "updated";
const CLIENT_PROTOCOL: &str = "1.5";
const INITIALIZED: &str = "initialized";

#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    Updated(ApplianceUpdated),
    /// Any frame without an update, proves the session is alive.
    KeepAlive,
}

pub type PushStream = BoxStream<'static, Result<PushEvent, TommoticaError>>;

/// A push-notification session source. Every `open` starts a fresh, subscribed session.
#[async_trait]
pub trait PushChannel: Debug + Send + Sync {
    async fn open(&self) -> Result<PushStream, TommoticaError>;
}

/// Classic SignalR over the server-sent events transport.
#[derive(Debug, Clone)]
pub struct SignalRChannel {
    client: TommoticaClient,
    base_url: String,
}

impl SignalRChannel {
    pub fn new(client: TommoticaClient, base_url: String) -> Self {
        SignalRChannel { client, base_url }
    }
}

#[async_trait]
impl PushChannel for SignalRChannel {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn open(&self) -> Result<PushStream, TommoticaError> {
        let connection_data = serde_json::to_string(&[HubName { name: HUB }])?;

        debug!("📡 Negotiating SignalR connection...");
        let response = self
            .client
            .get(format!("{}/signalr/negotiate", self.base_url))
            .query(&[("clientProtocol", CLIENT_PROTOCOL), ("connectionData", connection_data.as_str())])
            .send()
            .await?;
        let body = ensure_success(response)?.bytes().await?;
        let negotiate = serde_json::from_slice::<NegotiateResponse>(&body)?;
        debug!(connection_id = ?negotiate.connection_id, "📡 Negotiating SignalR connection... OK");

        let query = [
            ("transport", "serverSentEvents"),
            ("clientProtocol", CLIENT_PROTOCOL),
            ("connectionToken", negotiate.connection_token.as_str()),
            ("connectionData", connection_data.as_str()),
        ];

        let events = sse::connect(self.client.get(format!("{}/signalr/connect", self.base_url)).query(&query)).await?;

        let response = self.client.get(format!("{}/signalr/start", self.base_url)).query(&query).send().await?;
        let body = ensure_success(response)?.bytes().await?;
        let start = serde_json::from_slice::<StartResponse>(&body)?;
        if start.response != "started" {
            return Err(TommoticaError::MalformedSession(format!("unexpected start response '{}'", start.response)));
        }

        info!("📡 Subscribed to '{}'", HUB);
        Ok(events.flat_map(|event| stream::iter(push_events(event))).boxed())
    }
}

fn push_events(event: Result<ServerSentEvent, TransportError>) -> Vec<Result<PushEvent, TommoticaError>> {
    let event = match event {
        Ok(event) => event,
        Err(e) => return vec![Err(e.into())],
    };

    let updates = match event.data.as_deref() {
        Some(INITIALIZED) | None => Vec::new(),
        Some(_) => appliance_updates(&event),
    };

    if updates.is_empty() {
        return vec![Ok(PushEvent::KeepAlive)];
    }

    updates.into_iter().map(|update| Ok(PushEvent::Updated(update))).collect()
}

// Extracts the `updated` invocations of the appliance hub, anything else in the frame is ignored
fn appliance_updates(event: &ServerSentEvent) -> Vec<ApplianceUpdated> {
    let response = match event.parse_data::<PersistentResponse>() {
        Some(Ok(response)) => response,
        Some(Err(e)) => {
            warn!(frame = ?event.data, "⚠️ Ignoring malformed SignalR frame: {}", e);
            return Vec::new();
        }
        None => return Vec::new(),
    };

    response
        .messages
        .into_iter()
        .filter_map(|message| serde_json::from_value::<HubInvocation>(message).ok())
        .filter(|invocation| invocation.hub.eq_ignore_ascii_case(HUB) && invocation.method.eq_ignore_ascii_case(UPDATED))
        .flat_map(|invocation| invocation.arguments)
        .filter_map(|argument| match serde_json::from_value::<ApplianceUpdated>(argument) {
            Ok(update) => Some(update),
            Err(e) => {
                warn!("⚠️ Ignoring malformed appliance update: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::domain::ApplianceState;
    use crate::tommotica::client::new_push_client;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use std::error::Error;

    const CONNECTION_DATA: &str = r#"[{"name":"applianceHub"}]"#;

    fn channel(url: String) -> Result<SignalRChannel, Box<dyn Error>> {
        let config = AppConfigBuilder::new().server_url(url.clone()).build();
        Ok(SignalRChannel::new(new_push_client(&config)?, url))
    }

    async fn mock_negotiate(server: &mut mockito::Server) -> mockito::Mock {
        server
            .mock("GET", "/signalr/negotiate")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("clientProtocol".to_string(), "1.5".to_string()),
                Matcher::UrlEncoded("connectionData".to_string(), CONNECTION_DATA.to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{ "Url": "/signalr", "ConnectionToken": "token+/=", "ConnectionId": "c1", "ProtocolVersion": "1.5" }"#)
            .create_async()
            .await
    }

    fn session_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("transport".to_string(), "serverSentEvents".to_string()),
            Matcher::UrlEncoded("connectionToken".to_string(), "token+/=".to_string()),
            Matcher::UrlEncoded("connectionData".to_string(), CONNECTION_DATA.to_string()),
        ])
    }

    #[test_log::test(tokio::test)]
    async fn open_negotiates_connects_and_starts() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new_async().await;
        let negotiate = mock_negotiate(&mut server).await;
        let connect = server
            .mock("GET", "/signalr/connect")
            .match_query(session_query())
            .match_header("accept", "text/event-stream")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(concat!(
                "data: initialized\n\n",
                "data: {}\n\n",
                "data: {\"C\":\"d-1\",\"M\":[",
                "{\"H\":\"ApplianceHub\",\"M\":\"updated\",\"A\":[{\"Id\":\"11\",\"State\":{\"On\":false,\"DimLevel\":10}}]},",
                "{\"H\":\"SceneHub\",\"M\":\"updated\",\"A\":[{\"Id\":\"s1\"}]}",
                "]}\n\n"
            ))
            .create_async()
            .await;
        let start = server
            .mock("GET", "/signalr/start")
            .match_query(session_query())
            .with_status(200)
            .with_body(r#"{ "Response": "started" }"#)
            .create_async()
            .await;

        let stream = channel(server.url())?.open().await?;
        let events = stream.collect::<Vec<_>>().await;

        negotiate.assert_async().await;
        connect.assert_async().await;
        start.assert_async().await;

        let events = events.into_iter().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(
            events,
            vec![
                PushEvent::KeepAlive,
                PushEvent::KeepAlive,
                PushEvent::Updated(ApplianceUpdated {
                    id: "11".to_string(),
                    state: ApplianceState::new(false, Some(10.0)),
                }),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn open_fails_when_negotiation_fails() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/signalr/negotiate").match_query(Matcher::Any).with_status(401).create_async().await;

        let result = channel(server.url())?.open().await;

        assert!(matches!(result, Err(TommoticaError::Transport(TransportError::Status { status, .. })) if status == 401));
        Ok(())
    }

    #[tokio::test]
    async fn open_fails_when_the_session_is_not_started() -> Result<(), Box<dyn Error>> {
        let mut server = mockito::Server::new_async().await;
        mock_negotiate(&mut server).await;
        server
            .mock("GET", "/signalr/connect")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("data: initialized\n\n")
            .create_async()
            .await;
        server
            .mock("GET", "/signalr/start")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{ "Response": "nope" }"#)
            .create_async()
            .await;

        let result = channel(server.url())?.open().await;

        assert!(matches!(result, Err(TommoticaError::MalformedSession(_))));
        Ok(())
    }

    #[test]
    fn push_events_skips_malformed_updates() {
        let event = ServerSentEvent {
            data: Some(r#"{"M":[{"H":"applianceHub","M":"Updated","A":[{"Id":"1"},{"Id":"2","State":{"On":true}}]}]}"#.to_string()),
            ..Default::default()
        };

        let events = push_events(Ok(event));

        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Ok(PushEvent::Updated(update)) if update.id == "2"));
    }

    #[test]
    fn push_events_treats_a_malformed_frame_as_keep_alive() {
        let event = ServerSentEvent {
            data: Some("not json".to_string()),
            ..Default::default()
        };

        let events = push_events(Ok(event));

        assert!(matches!(events.as_slice(), [Ok(PushEvent::KeepAlive)]));
    }

    #[test]
    fn push_events_passes_transport_errors() {
        let events = push_events(Err(TransportError::SessionClosed));

        assert!(matches!(events.as_slice(), [Err(TommoticaError::Transport(TransportError::SessionClosed))]));
    }
}
