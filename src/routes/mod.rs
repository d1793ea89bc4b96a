//! HTTP handlers and the helpers they share for rendering phone XML.

use actix_session::Session;
use actix_web::{HttpResponse, web};
use tera::{Context, Tera};

use crate::domain::types::SessionKey;
use crate::dto::directory::Notice;
use crate::repository::DirectoryClient;
use crate::services::ServiceError;

pub mod directory;

pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Session field holding the key of the cached result set.
pub const SESSION_KEY_FIELD: &str = "directory_session";

/// Registers the phone endpoints for the given directory client.
pub fn configure<D>(cfg: &mut web::ServiceConfig)
where
    D: DirectoryClient + 'static,
{
    cfg.service(directory::show_search)
        .service(web::resource("/list").route(web::get().to(directory::list::<D>)));
}

/// Escapes the five XML special characters.
pub fn escape_xml(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&apos;"),
            _ => output.push(c),
        }
    }
    output
}

/// Loads the templates matching `glob` with XML escaping for `.xml` files.
pub fn load_templates(glob: &str) -> tera::Result<Tera> {
    let mut tera = Tera::new(glob)?;
    tera.autoescape_on(vec![".xml"]);
    tera.set_escape_fn(escape_xml);
    Ok(tera)
}

/// Renders `template` as a `text/xml` response, optionally asking the phone
/// to load `refresh_url` next.
pub fn render_template(
    tera: &Tera,
    template: &str,
    context: &Context,
    refresh_url: Option<&str>,
) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => {
            let mut response = HttpResponse::Ok();
            response.content_type(XML_CONTENT_TYPE);
            if let Some(url) = refresh_url {
                response.insert_header(("Refresh", format!("0; url={url}")));
            }
            response.body(body)
        }
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Renders a `CiscoIPPhoneText` screen.
pub fn render_notice(tera: &Tera, notice: &Notice) -> HttpResponse {
    let mut context = Context::new();
    context.insert("title", &notice.title);
    context.insert("text", &notice.text);
    render_template(tera, "ldap_directory/text.xml", &context, None)
}

pub fn render_error(tera: &Tera, err: &ServiceError, show_detail: bool) -> HttpResponse {
    render_notice(tera, &err.notice(show_detail))
}

/// Reads the session key, ignoring missing or malformed values.
pub fn session_key(session: &Session) -> Option<SessionKey> {
    match session.get::<String>(SESSION_KEY_FIELD) {
        Ok(value) => value.and_then(|v| v.parse().ok()),
        Err(e) => {
            log::warn!("Failed to read session: {e}");
            None
        }
    }
}

/// Stores `key` in the session unless it is already there.
pub fn remember_session_key(session: &Session, current: Option<SessionKey>, key: SessionKey) {
    if current == Some(key) {
        return;
    }
    if let Err(e) = session.insert(SESSION_KEY_FIELD, key.to_string()) {
        log::error!("Failed to store session key: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_only_xml_specials() {
        assert_eq!(
            escape_xml(r#"O'Brien & <Sons> "Ltd" http://host/list"#),
            "O&apos;Brien &amp; &lt;Sons&gt; &quot;Ltd&quot; http://host/list"
        );
    }

    #[test]
    fn templates_use_xml_escaping() {
        let tera = load_templates("templates/**/*").expect("templates load");
        let notice = Notice::new("Error", "a < b");
        let mut context = Context::new();
        context.insert("title", &notice.title);
        context.insert("text", &notice.text);
        let body = tera
            .render("ldap_directory/text.xml", &context)
            .expect("text renders");
        assert!(body.contains("<Text>a &lt; b</Text>"));
    }
}
