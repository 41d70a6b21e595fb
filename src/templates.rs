use std::sync::OnceLock;
use tera::Tera;

static TERA: OnceLock<Tera> = OnceLock::new();

const TEMPLATE_GLOB: &str = "templates/**/*.html";

pub fn get_tera() -> &'static Tera {
    TERA.get_or_init(|| match Tera::new(TEMPLATE_GLOB) {
        Ok(tera) => tera,
        Err(e) => {
            tracing::error!("Failed to load templates from {}: {}", TEMPLATE_GLOB, e);
            Tera::default()
        }
    })
}
