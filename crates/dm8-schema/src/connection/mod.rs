//! Concrete connections to a DM8 server.

#[cfg(feature = "odbc")]
mod odbc;

#[cfg(feature = "odbc")]
pub use odbc::OdbcConnection;

use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::core::traits::Connection;
use crate::error::Result;

/// Open a connection for `config`.
///
/// Without the `odbc` feature there is no driver to talk to and this fails
/// with a configuration error.
pub async fn connect(config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
    #[cfg(feature = "odbc")]
    {
        Ok(Arc::new(OdbcConnection::connect(config).await?))
    }

    #[cfg(not(feature = "odbc"))]
    {
        Err(crate::error::SchemaError::Config(format!(
            "cannot connect to {}: built without the `odbc` feature",
            if config.tns.is_empty() { &config.host } else { &config.tns }
        )))
    }
}
