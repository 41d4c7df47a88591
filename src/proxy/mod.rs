// proxy/mod.rs - Declarative forwarding routes
//
// Every resource route is a RouteSpec entry in `catalog`. One generic
// forwarding function (`dispatch::forward`) serves them all:
//
//   browser → validate → build upstream URL → forward → relay/reshape → browser

pub mod catalog;
pub mod dispatch;
pub mod fallback;
pub mod redact;
pub mod relay;
pub mod validate;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    routing::MethodRouter,
    Extension, Router,
};

use crate::auth::AuthContext;
use crate::types::{AppState, Verb};

pub use fallback::Fallback;
pub use validate::LengthRule;

/// Which service a route forwards to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Backend,
    Calendar,
}

/// Public routes work with zero session state and never forward credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Public,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    None,
    Json,
    Multipart,
}

/// Response (and, for legacy resources, request) reshaping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Passthrough,
    Contacts,
    Tiles,
    /// Login/register answers get a normalized `user` object
    Session,
    /// Current-user answer, gaps filled from the session token
    Profile,
    /// Bytes and content-type relayed untouched, with CORS headers
    Binary,
}

/// What the caller sees when the upstream cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unreachable {
    /// 500, unexpected failure
    Internal,
    /// 503, transient, retry later
    RetryLater,
}

#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub name: &'static str,
    pub verb: Verb,
    /// Router path, axum syntax (`/api/tasks/:taskId`)
    pub path: &'static str,
    pub upstream: Upstream,
    /// Upstream path template (`/tasks/{taskId}`)
    pub target: &'static str,
    pub forward_query: Vec<&'static str>,
    pub required_query: Vec<&'static str>,
    pub required_body: Vec<&'static str>,
    pub length_rules: Vec<LengthRule>,
    pub access: Access,
    pub body: BodyKind,
    pub shape: Shape,
    pub fallback: Option<Fallback>,
    pub unreachable: Unreachable,
}

impl RouteSpec {
    pub fn new(name: &'static str, verb: Verb, path: &'static str, target: &'static str) -> Self {
        let body = match verb {
            Verb::Get | Verb::Delete => BodyKind::None,
            Verb::Post | Verb::Put | Verb::Patch => BodyKind::Json,
        };

        Self {
            name,
            verb,
            path,
            upstream: Upstream::Backend,
            target,
            forward_query: Vec::new(),
            required_query: Vec::new(),
            required_body: Vec::new(),
            length_rules: Vec::new(),
            access: Access::Protected,
            body,
            shape: Shape::Passthrough,
            fallback: None,
            unreachable: Unreachable::Internal,
        }
    }

    pub fn get(name: &'static str, path: &'static str, target: &'static str) -> Self {
        Self::new(name, Verb::Get, path, target)
    }

    pub fn post(name: &'static str, path: &'static str, target: &'static str) -> Self {
        Self::new(name, Verb::Post, path, target)
    }

    pub fn put(name: &'static str, path: &'static str, target: &'static str) -> Self {
        Self::new(name, Verb::Put, path, target)
    }

    pub fn patch(name: &'static str, path: &'static str, target: &'static str) -> Self {
        Self::new(name, Verb::Patch, path, target)
    }

    pub fn delete(name: &'static str, path: &'static str, target: &'static str) -> Self {
        Self::new(name, Verb::Delete, path, target)
    }

    /// Pre-authentication route: no credential required or forwarded, 503 when unreachable.
    pub fn public(mut self) -> Self {
        self.access = Access::Public;
        self.unreachable = Unreachable::RetryLater;
        self
    }

    pub fn retry_later_when_unreachable(mut self) -> Self {
        self.unreachable = Unreachable::RetryLater;
        self
    }

    pub fn calendar(mut self) -> Self {
        self.upstream = Upstream::Calendar;
        self
    }

    /// Query parameters copied to the upstream call when present
    pub fn query(mut self, names: &[&'static str]) -> Self {
        for &name in names {
            if !self.forward_query.contains(&name) {
                self.forward_query.push(name);
            }
        }
        self
    }

    /// Query parameters that must be present; implies forwarding
    pub fn require_query(mut self, names: &[&'static str]) -> Self {
        self.required_query.extend_from_slice(names);
        self.query(names)
    }

    pub fn require_body(mut self, names: &[&'static str]) -> Self {
        self.required_body.extend_from_slice(names);
        self
    }

    pub fn limit(mut self, rule: LengthRule) -> Self {
        self.length_rules.push(rule);
        self
    }

    pub fn multipart(mut self) -> Self {
        self.body = BodyKind::Multipart;
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// Turn catalog entries into (public, protected) routers, one handler per entry.
pub fn routes(catalog: Vec<RouteSpec>) -> (Router<AppState>, Router<AppState>) {
    let mut grouped: BTreeMap<(Access, &'static str), MethodRouter<AppState>> = BTreeMap::new();

    for spec in catalog {
        let key = (spec.access, spec.path);
        let method_router = grouped.remove(&key).unwrap_or_else(MethodRouter::new);
        grouped.insert(key, with_spec(method_router, Arc::new(spec)));
    }

    let mut public = Router::new();
    let mut protected = Router::new();
    for ((access, path), method_router) in grouped {
        match access {
            Access::Public => public = public.route(path, method_router),
            Access::Protected => protected = protected.route(path, method_router),
        }
    }

    (public, protected)
}

fn with_spec(method_router: MethodRouter<AppState>, spec: Arc<RouteSpec>) -> MethodRouter<AppState> {
    let filter = spec.verb.filter();

    method_router.on(
        filter,
        move |State(state): State<AppState>,
              auth: Option<Extension<AuthContext>>,
              params: Option<Path<HashMap<String, String>>>,
              Query(query): Query<HashMap<String, String>>,
              request: Request| {
            let spec = Arc::clone(&spec);
            async move {
                let auth = auth.map(|Extension(a)| a).unwrap_or_else(AuthContext::anonymous);
                let params = params.map(|Path(p)| p).unwrap_or_default();
                dispatch::forward(&spec, &state, &auth, &params, &query, request).await
            }
        },
    )
}
