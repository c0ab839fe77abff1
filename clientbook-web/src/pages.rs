use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, Json, Redirect, Response};
use axum::Form;
use minijinja::context;
use serde::Serialize;
use tracing::info;

use clientbook_data::db::{customers, sessions};
use clientbook_data::DataError;

use crate::error::WebError;
use crate::forms::CustomerForm;
use crate::session::PageContext;
use crate::state::AppState;
use crate::templates;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET / — the new-customer form.
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let ctx = PageContext::load(&state, &headers).await?;
    let body = customer_form_page(
        &state,
        &ctx,
        "new_customer.html",
        &CustomerForm::default(),
        &[],
        None,
    )?;
    Ok(ctx.finish(Html(body)))
}

/// POST /customers — create a customer from the submitted form.
pub async fn customers_create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<CustomerForm>,
) -> Result<Response, WebError> {
    let ctx = PageContext::enter(&state, &headers).await?;

    let new = match form.validate() {
        Ok(new) => new,
        Err(errors) => {
            let body =
                customer_form_page(&state, &ctx, "new_customer.html", &form, &errors, None)?;
            return Ok(ctx.finish((StatusCode::UNPROCESSABLE_ENTITY, Html(body))));
        }
    };

    let created = {
        let conn = state.conn().await;
        customers::create(&conn, &new)
    };
    let created = match created {
        Ok(customer) => customer,
        Err(e @ DataError::Duplicate(_)) => {
            let errors = vec![e.to_string()];
            let body =
                customer_form_page(&state, &ctx, "new_customer.html", &form, &errors, None)?;
            return Ok(ctx.finish((StatusCode::UNPROCESSABLE_ENTITY, Html(body))));
        }
        Err(e) => return Err(e.into()),
    };

    info!(id = created.id, "customer created");
    {
        let conn = state.conn().await;
        sessions::push_flash(&conn, ctx.token(), "success", "Customer registered.")?;
    }
    Ok(ctx.finish(Redirect::to("/customers")))
}

/// GET /customers — the customer listing.
pub async fn customers_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let ctx = PageContext::load(&state, &headers).await?;

    let all = {
        let conn = state.conn().await;
        customers::list(&conn)?
    };

    let body = templates::render(
        state.templates(),
        "customers.html",
        context! {
            user => &ctx.user,
            flashes => &ctx.flashes,
            customers => &all,
        },
    )?;
    Ok(ctx.finish(Html(body)))
}

/// GET /customers/{id}/edit — the edit form, prefilled.
pub async fn customers_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let ctx = PageContext::load(&state, &headers).await?;

    let customer = {
        let conn = state.conn().await;
        customers::get(&conn, id)?
    };
    let form = CustomerForm {
        name: customer.name,
        email: customer.email,
        phone: customer.phone.unwrap_or_default(),
    };

    let body = customer_form_page(&state, &ctx, "edit_customer.html", &form, &[], Some(id))?;
    Ok(ctx.finish(Html(body)))
}

/// POST /customers/{id} — overwrite a customer's fields.
pub async fn customers_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<CustomerForm>,
) -> Result<Response, WebError> {
    let ctx = PageContext::enter(&state, &headers).await?;

    let new = match form.validate() {
        Ok(new) => new,
        Err(errors) => {
            let body =
                customer_form_page(&state, &ctx, "edit_customer.html", &form, &errors, Some(id))?;
            return Ok(ctx.finish((StatusCode::UNPROCESSABLE_ENTITY, Html(body))));
        }
    };

    let updated = {
        let conn = state.conn().await;
        customers::update(&conn, id, &new)
    };
    match updated {
        Ok(_) => {}
        Err(e @ DataError::Duplicate(_)) => {
            let errors = vec![e.to_string()];
            let body =
                customer_form_page(&state, &ctx, "edit_customer.html", &form, &errors, Some(id))?;
            return Ok(ctx.finish((StatusCode::UNPROCESSABLE_ENTITY, Html(body))));
        }
        Err(e) => return Err(e.into()),
    }

    info!(id = id, "customer updated");
    {
        let conn = state.conn().await;
        sessions::push_flash(&conn, ctx.token(), "success", "Customer updated.")?;
    }
    Ok(ctx.finish(Redirect::to("/customers")))
}

/// POST /customers/{id}/delete — remove a customer.
pub async fn customers_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let ctx = PageContext::enter(&state, &headers).await?;

    {
        let conn = state.conn().await;
        customers::delete(&conn, id)?;
        sessions::push_flash(&conn, ctx.token(), "success", "Customer removed.")?;
    }

    info!(id = id, "customer deleted");
    Ok(ctx.finish(Redirect::to("/customers")))
}

fn customer_form_page(
    state: &AppState,
    ctx: &PageContext,
    template: &str,
    form: &CustomerForm,
    errors: &[String],
    id: Option<i64>,
) -> Result<String, WebError> {
    templates::render(
        state.templates(),
        template,
        context! {
            user => &ctx.user,
            flashes => &ctx.flashes,
            errors => errors,
            form => form,
            id => id,
        },
    )
}
