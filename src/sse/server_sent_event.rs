use serde::de::DeserializeOwned;

#[derive(Debug, PartialEq, Default)]
pub struct ServerSentEvent {
    pub id: Option<String>,
    pub event: Option<String>,
    pub retry: Option<usize>,
    pub comment: Option<String>,
    /// Data lines joined by a newline.
    pub data: Option<String>,
}

impl ServerSentEvent {
    /// Parses a single event block, the blank line separating events must already be stripped.
    pub fn parse(block: &str) -> ServerSentEvent {
        let mut event = ServerSentEvent::default();

        for line in block.lines() {
            if let Some(value) = line.strip_prefix("id:") {
                event.id = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("event:") {
                event.event = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("retry:") {
                event.retry = value.trim().parse::<usize>().ok();
            } else if let Some(value) = line.strip_prefix(':') {
                event.comment = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("data:") {
                let value = value.strip_prefix(' ').unwrap_or(value);
                match &mut event.data {
                    Some(data) => {
                        data.push('\n');
                        data.push_str(value);
                    }
                    None => event.data = Some(value.to_string()),
                }
            }
        }

        event
    }

    pub fn parse_data<T>(&self) -> Option<Result<T, serde_json::Error>>
    where
        T: DeserializeOwned,
    {
        self.data.as_deref().map(serde_json::from_str)
    }
}
