use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use particlefield_core::Config;

/// Id of the element the page mounts the field into
pub const CONTAINER_ID: &str = "particles-js";

/// wasm-bindgen output the page imports, relative to the output directory
pub const WASM_MODULE: &str = "pkg/particlefield_web.js";

/// Page-level settings that are not part of the field configuration
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    pub background: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "particlefield".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    title: &'a str,
    background: &'a str,
    container_id: &'a str,
    wasm_module: &'a str,
    config_json: &'a str,
}

/// Serialize a configuration for embedding in a `<script>` element
fn embeddable_json(config: &Config) -> anyhow::Result<String> {
    let json = serde_json::to_string_pretty(config)?;
    Ok(json.replace("</", "<\\/"))
}

/// Render the demo page for a resolved configuration
pub fn render_page(config: &Config, options: &PageOptions) -> anyhow::Result<String> {
    let config_json = embeddable_json(config)?;
    let template = IndexTemplate {
        title: &options.title,
        background: &options.background,
        container_id: CONTAINER_ID,
        wasm_module: WASM_MODULE,
        config_json: &config_json,
    };
    Ok(template.render()?)
}

/// Write `index.html` and `config.json` into `output_dir`
///
/// Returns the path of the page.
pub fn build(config: &Config, output_dir: &Path, options: &PageOptions) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let html = render_page(config, options)?;
    let page = output_dir.join("index.html");
    fs::write(&page, html)?;
    fs::write(
        output_dir.join("config.json"),
        serde_json::to_string_pretty(config)?,
    )?;

    if !output_dir.join(WASM_MODULE).exists() {
        tracing::warn!(
            "{} not found in {}; build particlefield-web with wasm-pack into {}",
            WASM_MODULE,
            output_dir.display(),
            output_dir.join("pkg").display()
        );
    }
    tracing::info!(page = %page.display(), "built demo page");
    Ok(page)
}
