//! Push channel and event bus configuration.

use serde::{Deserialize, Serialize};

/// Event stream (SSE) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Keep-alive interval for open event streams, in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_seconds: u64,
    /// Buffered events per subscriber before the bus starts dropping.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            keep_alive_seconds: default_keep_alive(),
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

fn default_keep_alive() -> u64 {
    25
}

fn default_channel_buffer() -> usize {
    64
}
