//! The connection factory trait.
//!
//! A [`ConnectionFactory`] knows how to open and close one kind of
//! connection. The pool never looks inside a connection; everything the
//! connection does once it is open belongs to the caller holding a lease.

use crate::config::ConnectParams;
use crate::error::Result;

/// Opens and closes pooled connections.
///
/// `connect` is called at warm start and by the background creator;
/// `close` is called by the reaper and at shutdown. Both run on pool
/// threads, so implementations must be `Send + Sync`.
pub trait ConnectionFactory: Send + Sync + 'static {
    /// The connection type handed out in leases.
    type Connection: Send + 'static;

    /// Short identifier used in errors and log events (e.g. "mysql").
    fn id(&self) -> &str;

    /// Open a new connection.
    fn connect(&self, params: &ConnectParams) -> Result<Self::Connection>;

    /// Tear a connection down permanently.
    fn close(&self, connection: Self::Connection) {
        drop(connection);
    }
}
