#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::{InMemoryResultCache, LdapDirectory};

pub mod domain;
pub mod pagination;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod filter;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    server_config
        .validate()
        .map_err(|e| std::io::Error::other(format!("Invalid configuration: {e}")))?;

    let directory = LdapDirectory::new(&server_config.directory);
    let cache = web::Data::new(InMemoryResultCache::new(server_config.session_ttl()));

    let secret_key = match &server_config.secret {
        Some(secret) => Key::from(secret.as_bytes()),
        None => {
            log::warn!("No secret configured; sessions will not survive a restart");
            Key::generate()
        }
    };

    let tera = routes::load_templates(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let serve_static = std::path::Path::new(&server_config.static_dir).is_dir();
    if !serve_static {
        log::info!(
            "Static directory {} not found, not serving static files",
            server_config.static_dir
        );
    }

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Phone directory listening on {}:{}, served as {}",
        bind_address.0,
        bind_address.1,
        server_config.public_url
    );

    HttpServer::new(move || {
        let app = App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // phones talk plain http
                    .build(),
            )
            .wrap(middleware::Logger::default())
            .configure(routes::configure::<LdapDirectory>)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(directory.clone()))
            .app_data(cache.clone())
            .app_data(web::Data::new(server_config.clone()));

        // Registered last so that it only catches paths the routes don't.
        if serve_static {
            app.service(Files::new("/", &server_config.static_dir))
        } else {
            app
        }
    })
    .bind(bind_address)?
    .run()
    .await
}
