//! Pushes `Init:*` execute commands to a phone, clearing its call history and
//! closing any open messages, directories and services screens.

use std::thread;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dotenvy::dotenv;
use serde::Deserialize;
use tera::{Context, Tera};
use thiserror::Error;

use phone_directory::models::config::{PushConfig, load_settings};
use phone_directory::routes::load_templates;

const PUSH_URIS: [&str; 4] = [
    "Init:CallHistory",
    "Init:Messages",
    "Init:Directories",
    "Init:Services",
];

/// Body the phone answers with when the push credentials are rejected.
const UNAUTHORIZED_BODY: &str = r#"<CiscoIPPhoneError Number="4" />"#;

#[derive(Deserialize)]
struct PushSettings {
    templates_dir: String,
    push: PushConfig,
}

#[derive(Debug, Error)]
enum PushError {
    #[error("failed to render request body: {0}")]
    Render(#[from] tera::Error),

    #[error("{0}/{1}")]
    Status(u16, String),

    #[error("user un-authorized")]
    Unauthorized,

    #[error("{0}")]
    Transport(String),
}

fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

fn render_execute_body(tera: &Tera, execute_uri: &str) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("execute_uri", execute_uri);
    tera.render("push_init/execute.xml", &context)
}

fn check_reply(body: &str) -> Result<(), PushError> {
    if body.trim() == UNAUTHORIZED_BODY {
        return Err(PushError::Unauthorized);
    }
    Ok(())
}

fn push(
    agent: &ureq::Agent,
    tera: &Tera,
    config: &PushConfig,
    authorization: &str,
    execute_uri: &str,
) -> Result<(), PushError> {
    let body = render_execute_body(tera, execute_uri)?;

    let response = agent
        .post(&config.execute_url())
        .set("Content-Type", "application/x-www-form-urlencoded")
        .set("Authorization", authorization)
        .send_string(&body);

    match response {
        Ok(resp) => {
            let reply = resp
                .into_string()
                .map_err(|e| PushError::Transport(e.to_string()))?;
            check_reply(&reply)
        }
        Err(ureq::Error::Status(code, resp)) => {
            Err(PushError::Status(code, resp.status_text().to_string()))
        }
        Err(ureq::Error::Transport(err)) => Err(PushError::Transport(err.to_string())),
    }
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = match load_settings().and_then(|s| s.try_deserialize::<PushSettings>()) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading push settings: {}", err);
            std::process::exit(1);
        }
    };

    let tera = match load_templates(&settings.templates_dir) {
        Ok(tera) => tera,
        Err(err) => {
            log::error!("Template parsing error(s): {}", err);
            std::process::exit(1);
        }
    };

    let config = settings.push;
    let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
    let authorization = basic_auth(&config.user_name, &config.user_password);

    for (i, uri) in PUSH_URIS.iter().enumerate() {
        if i > 0 {
            thread::sleep(config.delay());
        }
        match push(&agent, &tera, &config, &authorization, uri) {
            Ok(()) => log::info!("{uri} - Success!"),
            Err(err) => {
                log::error!("Error pushing {uri}: {err}");
                std::process::exit(1);
            }
        }
    }
}
