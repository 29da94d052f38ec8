//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting an identity, reading it back, and
//! round-tripping the OAuth CSRF state token.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::AuthenticatedUser;
use crate::inbound::http::ApiError;

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USERNAME_KEY: &str = "username";
pub(crate) const OAUTH_STATE_KEY: &str = "oauth_state";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    pub fn persist_user(&self, user: &AuthenticatedUser) -> Result<(), ApiError> {
        self.0
            .insert(USER_ID_KEY, user.user_id)
            .and_then(|()| self.0.insert(USERNAME_KEY, user.username.as_str()))
            .map_err(|error| ApiError::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity from the session, if present.
    ///
    /// A cookie holding only one of the two keys is treated as anonymous
    /// rather than rejected; a fresh login repairs it.
    pub fn current_user(&self) -> Result<Option<AuthenticatedUser>, ApiError> {
        let read = |key: &str| {
            self.0
                .get::<serde_json::Value>(key)
                .map_err(|error| ApiError::internal(format!("failed to read session: {error}")))
        };
        let user_id = read(USER_ID_KEY)?.and_then(|v| v.as_i64());
        let username = read(USERNAME_KEY)?.and_then(|v| v.as_str().map(str::to_owned));
        match (user_id, username) {
            (Some(user_id), Some(username)) => {
                let Ok(user_id) = i32::try_from(user_id) else {
                    tracing::warn!(user_id, "out-of-range user id in session cookie");
                    return Ok(None);
                };
                Ok(Some(AuthenticatedUser { user_id, username }))
            }
            _ => Ok(None),
        }
    }

    /// Stash the OAuth CSRF state token for the callback leg.
    pub fn set_oauth_state(&self, state: &str) -> Result<(), ApiError> {
        self.0
            .insert(OAUTH_STATE_KEY, state)
            .map_err(|error| ApiError::internal(format!("failed to persist session: {error}")))
    }

    /// Remove and return the stashed OAuth state token, if any. Single-use:
    /// a replayed callback finds nothing.
    pub fn take_oauth_state(&self) -> Result<Option<String>, ApiError> {
        let state = self
            .0
            .get::<String>(OAUTH_STATE_KEY)
            .map_err(|error| ApiError::internal(format!("failed to read session: {error}")))?;
        self.0.remove(OAUTH_STATE_KEY);
        Ok(state)
    }

    /// Drop every session entry, ending the login.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    fn fixture_user() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 7,
            username: "alice".into(),
        }
    }

    fn session_cookie(
        response: &actix_web::dev::ServiceResponse,
    ) -> actix_web::cookie::Cookie<'static> {
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn round_trips_identity() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&fixture_user())?;
                        Ok::<_, ApiError>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let user = session
                            .current_user()?
                            .ok_or_else(|| ApiError::unauthorized("login required"))?;
                        Ok::<_, ApiError>(HttpResponse::Ok().body(user.username))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "alice");
    }

    #[actix_web::test]
    async fn anonymous_session_has_no_user() {
        let app = test::init_service(session_test_app().route(
            "/get",
            web::get().to(|session: SessionContext| async move {
                let user = session.current_user()?;
                assert!(user.is_none());
                Ok::<_, ApiError>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn oauth_state_is_single_use() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/stash",
                    web::get().to(|session: SessionContext| async move {
                        session.set_oauth_state("state-token")?;
                        Ok::<_, ApiError>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/take",
                    web::get().to(|session: SessionContext| async move {
                        let state = session.take_oauth_state()?;
                        Ok::<_, ApiError>(
                            HttpResponse::Ok().body(state.unwrap_or_else(|| "gone".into())),
                        )
                    }),
                ),
        )
        .await;

        let stash_res =
            test::call_service(&app, test::TestRequest::get().uri("/stash").to_request()).await;
        let cookie = session_cookie(&stash_res);

        let first = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        // The take rewrites the cookie without the state entry; the updated
        // cookie must find nothing on replay.
        let updated_cookie = session_cookie(&first);
        assert_eq!(test::read_body(first).await, "state-token");

        let second = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(updated_cookie)
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(second).await, "gone");
    }

    #[actix_web::test]
    async fn clear_ends_the_login() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&fixture_user())?;
                        Ok::<_, ApiError>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/logout",
                    web::get().to(|session: SessionContext| async move {
                        session.clear();
                        Ok::<_, ApiError>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let user = session.current_user()?;
                        Ok::<_, ApiError>(
                            HttpResponse::Ok()
                                .body(if user.is_some() { "present" } else { "absent" }),
                        )
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set_res);

        let logout_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let cleared_cookie = session_cookie(&logout_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cleared_cookie)
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(get_res).await, "absent");
    }
}
