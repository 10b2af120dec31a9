//! Protocol notifiers. Both senders share the same contract: discover an
//! endpoint on the already-fetched page, attempt the protocol-specific
//! request, and report an [`Outcome`]. Failures are logged and absorbed
//! here; nothing propagates to the run loop.

pub mod pingback;
pub mod webmention;
mod xmlrpc;

pub use pingback::send_pingback;
pub use webmention::send_webmention;

/// Result of one notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The receiver accepted the notification.
    Sent,
    /// Pingback fault 48: the receiver already knows about this link pair.
    AlreadyRegistered,
    /// The target does not advertise an endpoint for this protocol.
    NoEndpoint,
    /// Endpoint found but the request failed; details were logged.
    Failed,
}

impl Outcome {
    pub fn is_sent(self) -> bool {
        matches!(self, Outcome::Sent)
    }
}
