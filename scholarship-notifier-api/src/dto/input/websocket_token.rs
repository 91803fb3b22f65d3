use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WebSocketToken {
    pub token: Option<String>,
}
