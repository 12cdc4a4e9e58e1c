/// Markup fragment served from the static html directory.
#[derive(Debug, Clone)]
pub struct GetTemplate {
    name: String,
}

impl GetTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn endpoint(&self) -> String {
        format!("/static/html/{}", self.name.trim_start_matches('/'))
    }
}
