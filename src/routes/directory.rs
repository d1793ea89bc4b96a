use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use tera::{Context, Tera};

use crate::domain::entry::DirectoryEntry;
use crate::dto::directory::{DirectoryPageView, ListOutcome, Notice};
use crate::forms::list::ListForm;
use crate::models::config::ServerConfig;
use crate::pagination::Listing;
use crate::repository::{DirectoryClient, InMemoryResultCache};
use crate::routes::{
    remember_session_key, render_error, render_notice, render_template, session_key,
};
use crate::services::ServiceError;
use crate::services::directory as directory_service;

/// Input screen the phone shows before a search.
#[get("/search")]
pub async fn show_search(
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = Context::new();
    context.insert("search_url", &server_config.list_url());

    render_template(&tera, "ldap_directory/input.xml", &context, None)
}

/// Fresh search (`f`, `l`, `n`) or follow-up page (`start`).
pub async fn list<D>(
    params: web::Query<ListForm>,
    session: Session,
    directory: web::Data<D>,
    cache: web::Data<InMemoryResultCache>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> HttpResponse
where
    D: DirectoryClient + 'static,
{
    let show_detail = server_config.show_error_detail;

    let request = match params.into_inner().into_request() {
        Ok(request) => request,
        Err(err) => {
            log::warn!("Rejected list request: {err}");
            return render_error(&tera, &ServiceError::from(err), show_detail);
        }
    };

    let current = session_key(&session);
    let outcome = directory_service::list(
        directory.get_ref(),
        cache.get_ref(),
        current,
        request,
        &server_config.directory,
    )
    .await;

    match outcome {
        Ok(ListOutcome {
            session: key,
            listing,
        }) => {
            remember_session_key(&session, current, key);
            render_listing(&tera, &server_config, &listing)
        }
        Err(err) => render_error(&tera, &err, show_detail),
    }
}

fn render_listing(
    tera: &Tera,
    server_config: &ServerConfig,
    listing: &Listing<DirectoryEntry>,
) -> HttpResponse {
    let page = match listing {
        Listing::NoMatches => return render_notice(tera, &Notice::no_matches()),
        Listing::Page(page) => page,
    };

    let view = DirectoryPageView::from(page);
    let refresh_url = view
        .next_offset
        .map(|next| format!("{}?start={next}", server_config.list_url()));

    let mut context = Context::new();
    context.insert("page", &view);

    render_template(
        tera,
        "ldap_directory/directory.xml",
        &context,
        refresh_url.as_deref(),
    )
}
