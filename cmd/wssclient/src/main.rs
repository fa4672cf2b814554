//! wssclient - Connect to the gateway over WebSocket MQTT.
//!
//! Builds a signed connection token for the given identity and opens a
//! WebSocket MQTT connection, passing the authorizer name, detached
//! signature and token as upgrade query parameters. Once connected it
//! subscribes to the identity's private topic `d/<id>` and publishes a
//! greeting there, so an authenticated session is visible end to end.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use mqgate_client::TokenFactory;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, Transport};
use tracing::{info, warn};
use uuid::Uuid;

/// Connect to the gateway over WebSocket MQTT with a custom-auth token.
#[derive(Parser, Debug)]
#[command(name = "wssclient")]
#[command(about = "Connect over WebSocket MQTT with a custom-auth token")]
struct Args {
    /// Gateway endpoint hostname
    #[arg(long)]
    endpoint: String,

    /// Identity to embed as the token subject
    #[arg(long)]
    id: String,

    /// Path to the PEM RSA private key
    #[arg(long)]
    key_path: PathBuf,

    /// Name of the authorizer registered at the gateway
    #[arg(long, default_value = "TokenAuthorizer")]
    authorizer: String,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .init();

    let pem = std::fs::read(&args.key_path)
        .with_context(|| format!("reading key {}", args.key_path.display()))?;
    let factory = TokenFactory::from_rsa_pem(&pem)?;
    let signed = factory.issue(&args.id)?;

    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("x-amz-customauthorizer-name", &args.authorizer)
        .append_pair("x-amz-customauthorizer-signature", &signed.signature)
        .append_pair("token", &signed.token)
        .finish();
    let broker_url = format!("wss://{}/mqtt?{}", args.endpoint, query);

    info!(endpoint = %args.endpoint, id = %args.id, "connecting");

    let client_id = format!("{}-{}", args.id, Uuid::new_v4());
    let mut options = MqttOptions::new(client_id, broker_url, 443);
    options.set_transport(Transport::wss_with_default_config());
    options.set_keep_alive(Duration::from_secs(30));

    let (client, mut event_loop) = AsyncClient::new(options, 10);
    let topic = format!("d/{}", args.id);

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!(?ack, "connected");
                client.subscribe(&topic, QoS::AtLeastOnce).await?;
                client
                    .publish(
                        &topic,
                        QoS::AtLeastOnce,
                        false,
                        format!("hello from {}", args.id),
                    )
                    .await?;
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                info!(
                    topic = %publish.topic,
                    payload = %String::from_utf8_lossy(&publish.payload),
                    "message"
                );
            }
            Ok(event) => {
                tracing::debug!(?event, "event");
            }
            Err(err) => {
                warn!(%err, "connection error");
                return Err(err.into());
            }
        }
    }
}
