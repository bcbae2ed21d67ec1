// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::credential::factory::ClientFactory;

/// Shared application state handed to every handler.
pub struct AppState {
    pub factory: Arc<ClientFactory>,
}

impl AppState {
    /// Outbound calls made through the factory abort once `shutdown` fires.
    pub fn new(config: &Config, shutdown: CancellationToken) -> anyhow::Result<Self> {
        let factory = ClientFactory::new(config, shutdown)?;
        Ok(Self { factory })
    }
}
