use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures::future::LocalBoxFuture;

use crate::auth::{Claims, JwtService};
use crate::errors::AppError;

/// Guards the quiz and leaderboard routes: every request must carry a
/// bearer token minted by the login endpoint. Verified claims are
/// stashed in the request extensions for the `AuthenticatedUser`
/// extractor; rejections go through the `AppError` taxonomy so they
/// render like every other error in the service.
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let claims = match authenticate(&req) {
                Ok(claims) => claims,
                Err(err) => {
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, err.error_response())
                        .map_into_right_body();
                    return Ok(res);
                }
            };

            req.extensions_mut().insert(claims);
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    let jwt_service = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::InternalError("token verifier not registered".to_string()))?;

    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    jwt_service.validate_token(token)
}

fn bearer_token(headers: &header::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Verified claims of the calling user, available on any route behind
/// `RequireAuth`.
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Claims>()
                .cloned()
                .map(AuthenticatedUser)
                .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{get, test, App, HttpResponse};

    use crate::config::Config;
    use crate::models::domain::User;

    #[get("/whoami")]
    async fn whoami(auth: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(auth.0.username)
    }

    fn jwt_service() -> JwtService {
        let config = Config::test_config();
        JwtService::new(&config.jwt_secret, 1)
    }

    macro_rules! guarded_app {
        ($jwt:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($jwt))
                    .service(web::scope("").wrap(RequireAuth).service(whoami)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn missing_token_is_unauthorized() {
        let app = guarded_app!(jwt_service());

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let app = guarded_app!(jwt_service());

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwdw=="))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn garbage_token_is_unauthorized() {
        let app = guarded_app!(jwt_service());

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn valid_token_reaches_the_handler_with_claims() {
        let jwt = jwt_service();
        let token = jwt.create_token(&User::new("student1")).unwrap();
        let app = guarded_app!(jwt);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"student1");
    }
}
