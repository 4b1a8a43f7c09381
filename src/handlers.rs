use crate::contacts;
use crate::errors::{AppError, ContactError};
use crate::login::attempt_login;
use crate::models::{
    Contact, ContactForm, ContactInput, ContactsPageQuery, DeleteForm, DeleteQuery,
    DeleteResponse, LoginRequest, LoginResponse, ReturnForm, SearchQuery,
};
use crate::state::AppState;
use crate::ui::{ContactsView, Modal, render_contacts, render_login};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

pub async fn root() -> Redirect {
    Redirect::to("/login")
}

pub async fn login_page() -> Html<String> {
    Html(render_login("", None))
}

pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginRequest>,
) -> Html<String> {
    let outcome = attempt_login(&state.db, &form.username, &form.password).await;
    Html(render_login(&form.username, Some(&outcome)))
}

pub async fn contacts_page(
    State(state): State<AppState>,
    Query(query): Query<ContactsPageQuery>,
) -> Result<Html<String>, AppError> {
    let modal = if let Some(id) = query.edit {
        state.db.get_contact(id).await?.map(Modal::edit)
    } else if let Some(id) = query.delete {
        state
            .db
            .get_contact(id)
            .await?
            .map(|contact| Modal::DeleteConfirm { contact })
    } else {
        None
    };

    let page = render_page(
        &state,
        query.q,
        ContactInput::default(),
        None,
        modal.unwrap_or_default(),
    )
    .await?;
    Ok(Html(page))
}

pub async fn contacts_add(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<Response, AppError> {
    let input = form.input();
    match contacts::add(&state.db, &input).await {
        Ok(_) => Ok(back_to_list(&form.q).into_response()),
        Err(err @ ContactError::EmptyName) => {
            let page = render_page(&state, form.q, input, Some(err.to_string()), Modal::None).await?;
            Ok(Html(page).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn contacts_edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ContactForm>,
) -> Result<Response, AppError> {
    let draft = form.input();
    match contacts::edit(&state.db, id, &draft).await {
        Ok(_) => Ok(back_to_list(&form.q).into_response()),
        Err(err @ ContactError::EmptyName) => {
            let contact = contacts::get(&state.db, id).await?;
            let modal = Modal::Edit {
                contact,
                draft,
                error: Some(err.to_string()),
            };
            let page = render_page(&state, form.q, ContactInput::default(), None, modal).await?;
            Ok(Html(page).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn contacts_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, AppError> {
    contacts::delete(&state.db, id, form.confirm).await?;
    Ok(back_to_list(&form.q))
}

pub async fn toggle_theme(
    State(state): State<AppState>,
    Form(form): Form<ReturnForm>,
) -> Redirect {
    state.toggle_theme().await;
    back_to_list(&form.q)
}

pub async fn api_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Json<LoginResponse> {
    let outcome = attempt_login(&state.db, &payload.username, &payload.password).await;
    Json(LoginResponse::from(&outcome))
}

pub async fn api_list_contacts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Contact>>, AppError> {
    Ok(Json(contacts::list(&state.db, &query.q).await?))
}

pub async fn api_get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, AppError> {
    Ok(Json(contacts::get(&state.db, id).await?))
}

pub async fn api_create_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactInput>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let contact = contacts::add(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn api_update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ContactInput>,
) -> Result<Json<Contact>, AppError> {
    Ok(Json(contacts::edit(&state.db, id, &payload).await?))
}

pub async fn api_delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = contacts::delete(&state.db, id, query.confirm).await?;
    Ok(Json(DeleteResponse { deleted }))
}

async fn render_page(
    state: &AppState,
    query: String,
    form: ContactInput,
    form_error: Option<String>,
    modal: Modal,
) -> Result<String, AppError> {
    let contacts = contacts::list(&state.db, &query).await?;
    let view = ContactsView {
        contacts,
        query,
        form,
        form_error,
        modal,
        theme: state.theme().await,
    };
    Ok(render_contacts(&view))
}

fn back_to_list(query: &str) -> Redirect {
    if query.is_empty() {
        Redirect::to("/contacts")
    } else {
        Redirect::to(&format!("/contacts?q={}", urlencoding::encode(query)))
    }
}
