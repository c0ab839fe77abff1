use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use minijinja::context;
use tracing::info;

use clientbook_data::db::{sessions, users};
use clientbook_data::DataError;

use crate::error::WebError;
use crate::forms::{LoginForm, RegisterForm};
use crate::session::{self, PageContext};
use crate::state::AppState;
use crate::templates;

/// GET /register — the account registration form.
pub async fn register_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let ctx = PageContext::load(&state, &headers).await?;
    let body = register_page(&state, &ctx, &RegisterForm::default(), &[])?;
    Ok(ctx.finish(Html(body)))
}

/// POST /register — create a user account.
pub async fn register_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    let ctx = PageContext::enter(&state, &headers).await?;

    let (name, email, password) = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            let body = register_page(&state, &ctx, &form, &errors)?;
            return Ok(ctx.finish((StatusCode::UNPROCESSABLE_ENTITY, Html(body))));
        }
    };

    let created = {
        let conn = state.conn().await;
        users::create(&conn, &name, &email, &password)
    };
    match created {
        Ok(user) => {
            info!(id = user.id, "user registered");
            let conn = state.conn().await;
            sessions::push_flash(
                &conn,
                ctx.token(),
                "success",
                "Account created. Please sign in.",
            )?;
        }
        Err(e @ DataError::Duplicate(_)) => {
            let errors = vec![e.to_string()];
            let body = register_page(&state, &ctx, &form, &errors)?;
            return Ok(ctx.finish((StatusCode::UNPROCESSABLE_ENTITY, Html(body))));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(ctx.finish(Redirect::to("/login")))
}

/// GET /login — the sign-in form.
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let ctx = PageContext::load(&state, &headers).await?;
    let body = login_page(&state, &ctx, &LoginForm::default(), &[])?;
    Ok(ctx.finish(Html(body)))
}

/// POST /login — authenticate and attach the user to the session.
///
/// Failures report one generic message so the response never reveals
/// whether the email exists.
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let ctx = PageContext::enter(&state, &headers).await?;

    let (email, password) = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            let body = login_page(&state, &ctx, &form, &errors)?;
            return Ok(ctx.finish((StatusCode::UNPROCESSABLE_ENTITY, Html(body))));
        }
    };

    let user = {
        let conn = state.conn().await;
        users::find_by_email(&conn, &email)?
    };
    let user = match user {
        Some(user) if users::verify_password(&user.password_hash, &password) => user,
        _ => {
            let errors = vec!["Invalid email or password.".to_string()];
            let body = login_page(&state, &ctx, &form, &errors)?;
            return Ok(ctx.finish((StatusCode::UNPROCESSABLE_ENTITY, Html(body))));
        }
    };

    {
        let conn = state.conn().await;
        sessions::attach_user(&conn, ctx.token(), user.id)?;
        sessions::push_flash(
            &conn,
            ctx.token(),
            "success",
            &format!("Welcome back, {}.", user.name),
        )?;
    }

    info!(user = user.id, "login");
    Ok(ctx.finish(Redirect::to("/dashboard")))
}

/// GET /dashboard — landing page for signed-in users.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let ctx = PageContext::load(&state, &headers).await?;

    if ctx.user.is_none() {
        let conn = state.conn().await;
        sessions::push_flash(&conn, ctx.token(), "error", "Please sign in first.")?;
        drop(conn);
        return Ok(ctx.finish(Redirect::to("/login")));
    }

    let body = templates::render(
        state.templates(),
        "dashboard.html",
        context! {
            user => &ctx.user,
            flashes => &ctx.flashes,
        },
    )?;
    Ok(ctx.finish(Html(body)))
}

/// GET /logout — drop the session, hand the browser a fresh anonymous one.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let fresh = {
        let conn = state.conn().await;
        if let Some(token) = session::cookie_token(&headers) {
            sessions::delete(&conn, &token)?;
        }
        let fresh = sessions::create(&conn)?;
        sessions::push_flash(&conn, &fresh.token, "success", "You have signed out.")?;
        fresh
    };

    let mut resp = Redirect::to("/login").into_response();
    if let Ok(value) = HeaderValue::from_str(&session::session_cookie(&fresh.token)) {
        resp.headers_mut().append(header::SET_COOKIE, value);
    }
    Ok(resp)
}

fn register_page(
    state: &AppState,
    ctx: &PageContext,
    form: &RegisterForm,
    errors: &[String],
) -> Result<String, WebError> {
    templates::render(
        state.templates(),
        "register.html",
        context! {
            user => &ctx.user,
            flashes => &ctx.flashes,
            errors => errors,
            form => form,
        },
    )
}

fn login_page(
    state: &AppState,
    ctx: &PageContext,
    form: &LoginForm,
    errors: &[String],
) -> Result<String, WebError> {
    templates::render(
        state.templates(),
        "login.html",
        context! {
            user => &ctx.user,
            flashes => &ctx.flashes,
            errors => errors,
            form => form,
        },
    )
}
