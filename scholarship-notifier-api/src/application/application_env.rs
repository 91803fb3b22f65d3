use crate::auth::{parse_jwt_algorithms, parse_jwt_key};
use anyhow::anyhow;
use jsonwebtoken::{Algorithm, DecodingKey};
use std::{net::SocketAddr, time::Duration};

pub struct ApplicationEnv {
    pub log_directory: String,
    pub log_filename: String,

    pub bind_address: SocketAddr,

    pub db_connection_string: String,
    pub db_name: String,

    pub max_message_len: usize,
    pub max_http_content_len: usize,

    pub websocket_ping_interval: Duration,
    pub websocket_connection_buffer_size: usize,

    /// Algorithms must belong to the same family
    pub jwt_algorithms: Vec<Algorithm>,
    pub jwt_key: DecodingKey,
}

impl ApplicationEnv {
    pub fn parse() -> anyhow::Result<Self> {
        let log_directory = Self::env_var("SCHOLARSHIP_NOTIFIER_API_LOG_DIRECTORY")?;
        let log_filename = Self::env_var("SCHOLARSHIP_NOTIFIER_API_LOG_FILENAME")?;
        let bind_address = Self::env_var("SCHOLARSHIP_NOTIFIER_API_BIND_ADDRESS")?.parse()?;
        let db_connection_string =
            Self::env_var("SCHOLARSHIP_NOTIFIER_API_DB_CONNECTION_STRING")?;
        let db_name = Self::env_var("SCHOLARSHIP_NOTIFIER_API_DB_NAME")?;
        let max_message_len =
            Self::env_var("SCHOLARSHIP_NOTIFIER_API_MAX_MESSAGE_LEN")?.parse()?;
        let max_http_content_len =
            Self::env_var("SCHOLARSHIP_NOTIFIER_API_MAX_HTTP_CONTENT_LEN")?.parse()?;
        let websocket_ping_interval = Duration::from_secs(
            Self::env_var("SCHOLARSHIP_NOTIFIER_API_WEBSOCKET_PING_INTERVAL_S")?.parse()?,
        );
        let websocket_connection_buffer_size =
            Self::env_var("SCHOLARSHIP_NOTIFIER_API_WEBSOCKET_CONNECTION_BUFFER_SIZE")?.parse()?;
        let jwt_algorithms =
            parse_jwt_algorithms(Self::env_var("SCHOLARSHIP_NOTIFIER_API_JWT_ALGORITHMS")?)?;
        let jwt_algorithm = jwt_algorithms.first().ok_or(anyhow!(
            "SCHOLARSHIP_NOTIFIER_API_JWT_ALGORITHMS need to contain at least one algorithm"
        ))?;
        let jwt_key = parse_jwt_key(
            jwt_algorithm,
            Self::env_var("SCHOLARSHIP_NOTIFIER_API_JWT_KEY")?,
        )?;

        Ok(Self {
            log_directory,
            log_filename,
            bind_address,
            db_connection_string,
            db_name,
            max_message_len,
            max_http_content_len,
            websocket_ping_interval,
            websocket_connection_buffer_size,
            jwt_algorithms,
            jwt_key,
        })
    }

    fn env_var(name: &'static str) -> anyhow::Result<String> {
        std::env::var(name).map_err(|_| anyhow!("environment variable {name} not set"))
    }
}
