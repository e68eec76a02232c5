//! Browser bindings for particlefield
//!
//! Exposes `particlesJS(tagId, params)` to JavaScript. It mounts a particle field
//! into the element with the given id and returns a handle that can stop it.

mod canvas;
mod mount;

pub use canvas::CanvasSurface;
pub use mount::{CANVAS_CLASS, ParticleField, mount};

use particlefield_core::MountError;
use wasm_bindgen::prelude::*;

/// Install the panic hook and route log output to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Mount a particle field into the element with id `tag_id`
///
/// `params` is a partial configuration object; `undefined` or `null` selects the
/// defaults. Failures, such as a missing container, are logged to the console
/// and yield `undefined` instead of throwing.
#[wasm_bindgen(js_name = particlesJS)]
pub fn particles_js(tag_id: &str, params: JsValue) -> Option<ParticleField> {
    let overrides = if params.is_undefined() || params.is_null() {
        String::new()
    } else {
        match js_sys::JSON::stringify(&params) {
            Ok(text) => String::from(text),
            Err(e) => {
                log::error!("particlesJS: params are not serializable: {e:?}");
                return None;
            }
        }
    };

    logged(mount(tag_id, &overrides))
}

/// Log a failed mount and drop the error
fn logged<T>(result: Result<T, MountError>) -> Option<T> {
    result.map_err(|e| log::error!("particlesJS: {e}")).ok()
}
