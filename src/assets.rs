//! Static asset serving.
//!
//! # Responsibilities
//! - Map the unrouted request path onto files under a directory
//! - Canonicalize `.html` and `index` URLs through redirects
//! - Decline anything it cannot serve so routing falls through
//!
//! # Design Decisions
//! - Hidden files and TypeScript sources are treated as absent
//! - Decoded `.`/`..` segments never reach the filesystem
//! - Redirects are absolute, built from the request URL
//! - File bodies are streamed from disk, never buffered whole

use axum::body::Body;
use axum::http::header;
use axum::response::IntoResponse;
use futures_util::future::{BoxFuture, FutureExt};
use std::borrow::Cow;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;

use crate::context::Context;
use crate::http::response::{decline, redirect, respond};
use crate::http::Request;
use crate::routing::pattern::decode;
use crate::routing::{Handler, HandlerResult};

/// Handler serving files from a directory.
#[derive(Debug, Clone)]
pub struct Assets {
    dir: PathBuf,
    serve_ts: bool,
}

impl Assets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            serve_ts: false,
        }
    }

    /// Serve `.ts` files instead of treating them as absent.
    pub fn serve_ts(mut self, serve_ts: bool) -> Self {
        self.serve_ts = serve_ts;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn serve(&self, ctx: Context) -> HandlerResult {
        let pathname = ctx.url().path();
        let base = decode(basename(pathname));

        if base.starts_with('.') || (!self.serve_ts && base.ends_with(".ts")) {
            tracing::trace!(base = %base, "Skipping hidden or source asset");
            return decline();
        }

        let Some(path) = self.resolve(ctx.path()) else {
            tracing::debug!(path = %ctx.path(), "Rejected asset path");
            return decline();
        };

        let found = stat(&path).await;
        if is_file(&found) {
            if base == "index.html" {
                return redirect_to(&ctx, parent_of(pathname));
            }
            if let Some(stripped) = pathname.strip_suffix(".html") {
                return redirect_to(&ctx, stripped);
            }
            return serve_file(&path).await;
        }

        let html = with_extension(&path, ".html");
        if is_file(&stat(&html).await) {
            if base == "index" {
                return redirect_to(&ctx, parent_of(pathname));
            }
            return serve_file(&html).await;
        }

        if let Some(trimmed) = pathname.strip_suffix('/') {
            if let Some(parent) = path.parent() {
                if is_file(&stat(parent).await)
                    || is_file(&stat(&with_extension(parent, ".html")).await)
                {
                    return redirect_to(&ctx, trimmed);
                }
            }
        } else if found.as_ref().is_some_and(Metadata::is_dir)
            && (is_file(&stat(&path.join("index")).await)
                || is_file(&stat(&path.join("index.html")).await))
        {
            return redirect_to(&ctx, &format!("{pathname}/"));
        }

        decline()
    }

    /// Join the unrouted path onto the asset directory.
    fn resolve(&self, unrouted: &str) -> Option<PathBuf> {
        let mut path = self.dir.clone();
        for raw in unrouted.split('/').filter(|s| !s.is_empty()) {
            let segment = decode(raw);
            if segment == "." || segment == ".." || segment.contains(|c: char| c == '/' || c == '\\') {
                return None;
            }
            path.push(segment.as_ref());
        }
        Some(path)
    }
}

impl Handler for Assets {
    fn call<'a>(&'a self, _req: Request, ctx: Context) -> BoxFuture<'a, HandlerResult> {
        self.serve(ctx).boxed()
    }

    fn name(&self) -> Cow<'static, str> {
        format!("assets({})", self.dir.display()).into()
    }
}

async fn stat(path: &Path) -> Option<Metadata> {
    tokio::fs::metadata(path).await.ok()
}

fn is_file(meta: &Option<Metadata>) -> bool {
    meta.as_ref().is_some_and(Metadata::is_file)
}

async fn serve_file(path: &Path) -> HandlerResult {
    let file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    tracing::trace!(path = %path.display(), mime = %mime, len, "Serving asset");

    let body = Body::from_stream(ReaderStream::new(file));
    respond(
        (
            [
                (header::CONTENT_TYPE, mime.to_string()),
                (header::CONTENT_LENGTH, len.to_string()),
            ],
            body,
        )
            .into_response(),
    )
}

fn redirect_to(ctx: &Context, pathname: &str) -> HandlerResult {
    let mut url = ctx.url().clone();
    url.set_path(pathname);
    respond(redirect(url.as_str()))
}

/// Last non-empty segment of a URL path.
fn basename(pathname: &str) -> &str {
    pathname
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

/// The directory URL containing the last segment, with a trailing slash.
fn parent_of(pathname: &str) -> &str {
    match pathname.rfind('/') {
        Some(i) => &pathname[..=i],
        None => "/",
    }
}

fn with_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(ext);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        assert_eq!(basename("/a/b.txt"), "b.txt");
        assert_eq!(basename("/nested/"), "nested");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of("/index.html"), "/");
        assert_eq!(parent_of("/docs/index"), "/docs/");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let assets = Assets::new("/srv/public");
        assert_eq!(
            assets.resolve("/css/site.css"),
            Some(PathBuf::from("/srv/public/css/site.css"))
        );
        assert_eq!(assets.resolve("/../etc/passwd"), None);
        assert_eq!(assets.resolve("/%2E%2E/etc"), None);
        assert_eq!(assets.resolve("/a%2Fb"), None);
    }

    #[test]
    fn test_with_extension_appends() {
        assert_eq!(
            with_extension(Path::new("/srv/about"), ".html"),
            PathBuf::from("/srv/about.html")
        );
    }
}
