//! Pattern dispatch and the lifecycle of one bridge run.
//!
//! [`exchange`] performs the pattern's steps against any [`Endpoint`]: a
//! send step reads the input to completion and sends it as one message, a
//! receive step relays one message to the output. [`run`] wraps it with the
//! process streams and a ZeroMQ endpoint opened from a [`BridgeConfig`].

use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tracing::{debug, info};

use crate::{
    assembler::Assembler,
    config::BridgeConfig,
    endpoint::{Endpoint, connect_or_bind},
    error::{BridgeError, Result},
    pattern::{Pattern, Step},
    relay::{RelayStats, relay},
};

/// What a run moved in each direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Payload bytes sent, if the pattern sends.
    pub sent: Option<usize>,
    /// Receive counters, if the pattern receives.
    pub received: Option<RelayStats>,
}

/// Perform `pattern`'s steps in order against `endpoint`.
///
/// Send-only patterns never receive and receive-only patterns never send.
///
/// # Errors
///
/// Returns the first [`BridgeError`] raised by a step; later steps are not
/// attempted.
pub async fn exchange<E, R, W>(
    pattern: Pattern,
    endpoint: &mut E,
    assembler: &Assembler,
    input: &mut R,
    output: &mut W,
) -> Result<Summary>
where
    E: Endpoint,
    R: AsyncBufRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut summary = Summary::default();
    for step in pattern.steps() {
        match step {
            Step::Send => {
                let assembled = assembler.assemble(input).await?;
                let len = assembled.len();
                info!("sending {len} bytes");
                endpoint
                    .send(assembled.into_payload())
                    .await
                    .map_err(BridgeError::Send)?;
                summary.sent = Some(len);
            }
            Step::Receive => {
                summary.received = Some(relay(endpoint, output).await?);
            }
        }
    }
    Ok(summary)
}

/// Bridge the process's standard streams through the configured endpoint.
///
/// # Errors
///
/// Returns [`BridgeError::Setup`] if the endpoint cannot be opened, any
/// error raised by [`exchange`], or [`BridgeError::Teardown`] if closing the
/// endpoint fails.
pub async fn run(config: &BridgeConfig) -> Result<Summary> {
    let mut endpoint = connect_or_bind(
        config.pattern,
        &config.endpoint,
        config.bind,
        &config.subscription,
    )
    .await
    .map_err(BridgeError::Setup)?;

    if config.bind {
        info!("bound to {}", endpoint.address());
    } else {
        info!("connecting to {}", endpoint.address());
    }

    let assembler = config.assembler();
    let mut input = BufReader::with_capacity(config.chunk_capacity.get(), tokio::io::stdin());
    let mut output = tokio::io::stdout();

    let outcome = exchange(
        config.pattern,
        &mut endpoint,
        &assembler,
        &mut input,
        &mut output,
    )
    .await;

    match outcome {
        Ok(summary) => {
            endpoint.close().await.map_err(BridgeError::Teardown)?;
            Ok(summary)
        }
        Err(err) => {
            if let Err(close_err) = endpoint.close().await {
                debug!(error = %close_err, "close after failed exchange also failed");
            }
            Err(err)
        }
    }
}
