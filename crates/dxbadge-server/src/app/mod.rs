//! Request routing and handlers
//!
//! The application half of the service. Everything here is written against
//! the platform-agnostic core types and knows nothing about the transport;
//! the adapter hands it a completed [`Request`] and takes back a
//! [`Response`].

pub mod luoxue;
pub mod rating;

use crate::config::ServerConfig;
use dxbadge_core::{
    Handler, Method, Request, Response, ResponseBuilder, Result, Router, StatusCode,
};
use std::sync::Arc;

/// Route identifiers resolved by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteId {
    Index,
    GetRating,
    GenImage,
}

/// Application state shared by all handlers
pub struct App {
    routes: Router<RouteId>,
    client: luoxue::Client,
    plate_asset_base: String,
}

impl App {
    /// Build the application from config
    pub fn new(config: &ServerConfig) -> Self {
        let mut routes = Router::new();
        routes.insert(Method::Get, "/", RouteId::Index);
        routes.insert(Method::Get, "/api/getRating/:friendCode", RouteId::GetRating);
        routes.insert(Method::Get, "/api/genImage/:friendCode", RouteId::GenImage);
        // LuoXue-prefixed aliases for the same provider
        routes.insert(Method::Get, "/api/luoxue/getRating/:friendCode", RouteId::GetRating);
        routes.insert(Method::Get, "/api/luoxue/genImage/:friendCode", RouteId::GenImage);

        Self {
            routes,
            client: luoxue::Client::new(config.luoxue_api_key.clone()),
            plate_asset_base: config.plate_asset_base.clone(),
        }
    }

    /// Wrap the application as the black-box handler handed to the
    /// transport adapter.
    pub fn into_handler(self: Arc<Self>) -> Handler {
        Arc::new(move |req| {
            let app = self.clone();
            Box::pin(async move { app.handle(req).await })
        })
    }

    /// Route one request
    pub async fn handle(&self, mut req: Request) -> Result<Response> {
        let (route, params) = match self.routes.find(req.method, &req.path) {
            Some(m) => (*m.value, m.params),
            None => return Ok(not_found()),
        };
        req.params = params;

        match route {
            RouteId::Index => Ok(index()),
            RouteId::GetRating => self.get_rating(&req).await,
            RouteId::GenImage => self.gen_image(&req).await,
        }
    }

    async fn get_rating(&self, req: &Request) -> Result<Response> {
        let friend_code = req.param("friendCode").unwrap_or_default();
        let rating = self.client.fetch_rating(friend_code).await?;

        let payload = serde_json::json!({
            "status": "ok",
            "friendCode": friend_code,
            "rating": rating,
        });
        Ok(Response::json(payload.to_string()))
    }

    async fn gen_image(&self, req: &Request) -> Result<Response> {
        let friend_code = req.param("friendCode").unwrap_or_default();
        let rating = self.client.fetch_rating(friend_code).await?;

        let plate = format!("{}/{}.png", self.plate_asset_base, rating::plate_id(rating));
        Ok(Response::svg(rating::rating_svg(rating, &plate)))
    }
}

/// Service index: status plus endpoint listing
fn index() -> Response {
    let payload = serde_json::json!({
        "status": "ok",
        "service": "dxbadge",
        "endpoints": [
            "/api/getRating/:friendCode",
            "/api/genImage/:friendCode",
            "/api/luoxue/getRating/:friendCode",
            "/api/luoxue/genImage/:friendCode",
        ],
    });
    Response::json(payload.to_string())
}

fn not_found() -> Response {
    ResponseBuilder::new(StatusCode::NOT_FOUND)
        .header("content-type", "application/json")
        .body(r#"{"status":"error","message":"Not Found"}"#)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxbadge_core::{Body, RequestBuilder};

    fn app() -> App {
        App::new(&ServerConfig::default())
    }

    fn body_string(res: &Response) -> String {
        match &res.body {
            Body::Full(bytes) => String::from_utf8(bytes.to_vec()).unwrap(),
            other => panic!("expected a buffered body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let req = RequestBuilder::new(Method::Get, "/").build();
        let res = app().handle(req).await.unwrap();

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type(), Some("application/json"));
        let body = body_string(&res);
        assert!(body.contains("/api/getRating/:friendCode"));
        assert!(body.contains("/api/luoxue/genImage/:friendCode"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let req = RequestBuilder::new(Method::Get, "/api/nope").build();
        let res = app().handle(req).await.unwrap();

        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(body_string(&res), r#"{"status":"error","message":"Not Found"}"#);
    }

    #[tokio::test]
    async fn test_post_to_known_path_is_404() {
        let req = RequestBuilder::new(Method::Post, "/").body("{}").build();
        let res = app().handle(req).await.unwrap();
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_rating_routes_capture_friend_code() {
        let app = app();
        for path in [
            "/api/getRating/123456789",
            "/api/luoxue/getRating/123456789",
        ] {
            let m = app.routes.find(Method::Get, path).unwrap();
            assert_eq!(*m.value, RouteId::GetRating);
            assert_eq!(m.params.get("friendCode").map(String::as_str), Some("123456789"));
        }
    }
}
