//! Built-in demo application.
//!
//! A small task service spanning three nested modules. `trellis serve` and
//! `trellis routes` run against this tree, and the integration tests use
//! it as a realistic fixture.

use crate::adapter::{HandlerRequest, Reply};
use crate::metadata;
use crate::module::{Component, ComponentBuilder, Module};
use http::Method;
use serde_json::{json, Value};
use std::sync::Arc;

struct Status;

impl Status {
    fn show(&self, _req: &HandlerRequest, reply: &mut Reply) -> anyhow::Result<()> {
        reply.body(json!({
            "service": "trellis-demo",
            "status": "running",
        }));
        Ok(())
    }
}

struct Tasks {
    tasks: Vec<Value>,
}

impl Tasks {
    fn seeded() -> Self {
        Self {
            tasks: vec![
                json!({ "id": 1, "title": "water the plants", "done": false }),
                json!({ "id": 2, "title": "file the report", "done": true }),
            ],
        }
    }

    fn list(&self, req: &HandlerRequest, reply: &mut Reply) -> anyhow::Result<()> {
        let done_filter = req
            .get_query_param("done")
            .and_then(|v| v.parse::<bool>().ok());
        let tasks: Vec<&Value> = self
            .tasks
            .iter()
            .filter(|t| done_filter.map_or(true, |want| t["done"] == json!(want)))
            .collect();
        reply.body(json!({ "tasks": tasks }));
        Ok(())
    }

    fn create(&self, req: &HandlerRequest, reply: &mut Reply) -> anyhow::Result<()> {
        let title = req
            .body
            .as_ref()
            .and_then(|body| body.get("title"))
            .and_then(Value::as_str);
        match title {
            Some(title) => {
                reply.body(json!({
                    "id": self.tasks.len() + 1,
                    "title": title,
                    "done": false,
                }));
            }
            None => {
                reply
                    .status(400)
                    .body(json!({ "error": "task title required" }));
            }
        }
        Ok(())
    }

    fn stats(&self, _req: &HandlerRequest, reply: &mut Reply) -> anyhow::Result<()> {
        let done = self
            .tasks
            .iter()
            .filter(|t| t["done"] == json!(true))
            .count();
        reply.body(json!({
            "total": self.tasks.len(),
            "done": done,
            "open": self.tasks.len() - done,
        }));
        Ok(())
    }
}

struct Archive;

impl Archive {
    fn list(&self, _req: &HandlerRequest, reply: &mut Reply) -> anyhow::Result<()> {
        reply.body(json!({
            "tasks": [
                { "id": 9, "title": "renew the domain", "done": true },
            ],
        }));
        Ok(())
    }
}

fn status_component() -> Arc<Component> {
    ComponentBuilder::new("status", || Status)
        .route("show", Method::GET, "", Status::show)
        .build()
}

fn tasks_component() -> Arc<Component> {
    ComponentBuilder::new("tasks", Tasks::seeded)
        .metadata("service", json!("trellis-demo"))
        .route("list", Method::GET, "", Tasks::list)
        .route("create", Method::POST, "", Tasks::create)
        .method_meta("create", metadata::STATUS, json!(201))
        .method_meta("create", metadata::HEADERS, json!({ "x-task-source": "demo" }))
        .route("stats", Method::GET, "stats", Tasks::stats)
        .build()
}

fn archive_component() -> Arc<Component> {
    ComponentBuilder::new("archive", || Archive)
        .route("list", Method::GET, "", Archive::list)
        .build()
}

/// Build the demo module tree.
///
/// Compiles to five routes:
///
/// | Verb | Path             | Handler      |
/// |------|------------------|--------------|
/// | GET  | `/`              | status.show  |
/// | GET  | `/tasks`         | tasks.list   |
/// | POST | `/tasks`         | tasks.create |
/// | GET  | `/tasks/stats`   | tasks.stats  |
/// | GET  | `/tasks/archive` | archive.list |
#[must_use]
pub fn demo_module() -> Arc<Module> {
    let archive = Module::builder()
        .path("archive")
        .export(archive_component())
        .build();
    let tasks = Module::builder()
        .path("tasks")
        .export(tasks_component())
        .import(archive)
        .build();
    Module::builder()
        .export(status_component())
        .import(tasks)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{HeaderVec, ParamVec};
    use crate::bootstrap::App;
    use crate::ids::RequestId;

    fn request(method: Method, path: &str, body: Option<Value>) -> HandlerRequest {
        HandlerRequest {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            query_params: ParamVec::new(),
            headers: HeaderVec::new(),
            cookies: HeaderVec::new(),
            body,
        }
    }

    #[test]
    fn test_demo_tree_compiles_expected_routes() {
        let app = App::build(&demo_module());
        assert_eq!(app.routes().len(), 5);
        for (method, path) in [
            (Method::GET, "/"),
            (Method::GET, "/tasks"),
            (Method::POST, "/tasks"),
            (Method::GET, "/tasks/stats"),
            (Method::GET, "/tasks/archive"),
        ] {
            assert!(
                app.routes().lookup(&method, path).is_some(),
                "missing {method} {path}"
            );
        }
    }

    #[test]
    fn test_create_uses_recorded_response_defaults() {
        let app = App::build(&demo_module());
        let route = app
            .routes()
            .lookup(&Method::POST, "/tasks")
            .cloned()
            .unwrap();
        let req = request(Method::POST, "/tasks", Some(json!({ "title": "ship it" })));
        let reply = (route.handler)(&req).unwrap();
        assert_eq!(reply.status_code(), 201);
        assert_eq!(reply.get_header("x-task-source"), Some("demo"));
    }

    #[test]
    fn test_create_without_title_overrides_default_status() {
        let app = App::build(&demo_module());
        let route = app
            .routes()
            .lookup(&Method::POST, "/tasks")
            .cloned()
            .unwrap();
        let reply = (route.handler)(&request(Method::POST, "/tasks", None)).unwrap();
        assert_eq!(reply.status_code(), 400);
    }

    #[test]
    fn test_class_metadata_readable_with_fallback() {
        let app = App::build(&demo_module());
        let value = app
            .metadata()
            .get("tasks", "service", None, Some("list"))
            .unwrap();
        assert_eq!(value, json!("trellis-demo"));
    }
}
