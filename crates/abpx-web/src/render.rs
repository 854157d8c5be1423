//! HTML templates, compiled into the binary.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::error::WebError;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("input.html", include_str!("../templates/input.html")),
    ("results.html", include_str!("../templates/results.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// Template environment with every page registered. `.html` templates are auto-escaped.
pub fn environment() -> Result<Environment<'static>, WebError> {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

pub fn render<C: Serialize>(env: &Environment<'_>, name: &str, ctx: C) -> Result<Html<String>, WebError> {
    let html = env.get_template(name)?.render(ctx)?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_compile() {
        let env = environment().unwrap();
        for &(name, _) in TEMPLATES {
            assert!(env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_input_page_escapes_messages() {
        let env = environment().unwrap();
        let html = render(
            &env,
            "input.html",
            context! { submit_count => 2, error => "<script>", sequences => "" },
        )
        .unwrap();
        assert!(html.0.contains("&lt;script&gt;"));
        assert!(!html.0.contains("<script>"));
    }
}
