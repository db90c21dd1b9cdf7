use std::time::Duration;

use crate::adapter::{HandlerRequest, Reply};

/// Hook pair applied around handler invocation by the server facade.
///
/// `before` may short-circuit by returning a reply, in which case the
/// handler never runs. `after` sees the reply a handler produced and may
/// amend it; it is not called when `before` short-circuited or the handler
/// failed.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<Reply> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _reply: &mut Reply, _latency: Duration) {}
}
