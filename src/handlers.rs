//! Built-in leaf handlers used by configured route tables.

use futures_util::future::{ready, BoxFuture, FutureExt};
use std::borrow::Cow;

use crate::context::Context;
use crate::http::{response, Request};
use crate::routing::{Handler, HandlerResult};

/// Responds with a fixed `text/plain` body.
#[derive(Debug, Clone)]
pub struct Text {
    body: String,
}

/// Handler answering every request with `body`.
pub fn text(body: impl Into<String>) -> Text {
    Text { body: body.into() }
}

impl Handler for Text {
    fn call<'a>(&'a self, _req: Request, _ctx: Context) -> BoxFuture<'a, HandlerResult> {
        ready(response::respond(response::text(self.body.clone()))).boxed()
    }

    fn name(&self) -> Cow<'static, str> {
        "text".into()
    }
}

/// Redirects to a fixed location.
#[derive(Debug, Clone)]
pub struct Redirect {
    location: String,
}

pub fn redirect(location: impl Into<String>) -> Redirect {
    Redirect {
        location: location.into(),
    }
}

impl Handler for Redirect {
    fn call<'a>(&'a self, _req: Request, _ctx: Context) -> BoxFuture<'a, HandlerResult> {
        ready(response::respond(response::redirect(&self.location))).boxed()
    }

    fn name(&self) -> Cow<'static, str> {
        format!("redirect({})", self.location).into()
    }
}

/// Echoes the routing context as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextJson;

/// Handler showing how nested routers split the request path.
pub fn context_json() -> ContextJson {
    ContextJson
}

impl Handler for ContextJson {
    fn call<'a>(&'a self, _req: Request, ctx: Context) -> BoxFuture<'a, HandlerResult> {
        ready(response::respond(response::json(&ctx))).boxed()
    }

    fn name(&self) -> Cow<'static, str> {
        "context".into()
    }
}
