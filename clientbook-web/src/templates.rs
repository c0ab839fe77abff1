use minijinja::{Environment, UndefinedBehavior, Value};

use crate::error::WebError;

/// Template sources compiled into the binary.
static TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("new_customer.html", include_str!("../templates/new_customer.html")),
    ("edit_customer.html", include_str!("../templates/edit_customer.html")),
    ("customers.html", include_str!("../templates/customers.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
];

/// Build the template environment.
///
/// Undefined variables are hard errors: a template referencing a context
/// key the handler did not supply fails the request instead of rendering
/// an empty hole.
pub fn build_env() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

/// Render a template by name with the given context.
pub fn render(env: &Environment<'static>, name: &str, ctx: Value) -> Result<String, WebError> {
    let tmpl = env.get_template(name)?;
    Ok(tmpl.render(ctx)?)
}
