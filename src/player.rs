//! Bootstrap and control of the third-party SWF emulator.
//!
//! The emulator is a script loaded from a CDN. Once its global exists the
//! page can use plain `<object>`/`<embed>` tags for SWF files and the
//! emulator takes them over.

use gloo_net::http::Request;
use js_sys::{Function, Promise, Reflect};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlScriptElement};

const EMULATOR_GLOBAL: &str = "RufflePlayer";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerStatus {
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no browser document")]
    NoDocument,

    #[error("no emulator script URL configured")]
    NoScriptUrl,

    #[error("emulator script failed to load from every source (last: {0})")]
    ScriptLoad(String),

    #[error("animation {url} is not reachable: {reason}")]
    Media { url: String, reason: String },

    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for PlayerError {
    fn from(e: JsValue) -> Self {
        PlayerError::Js(format!("{:?}", e))
    }
}

/// `<base>/<id>.swf`, made absolute against `origin` unless it already is.
pub fn animation_url(base_path: &str, poem_id: u32, origin: &str) -> String {
    let path = format!("{}/{}.swf", base_path.trim_end_matches('/'), poem_id);
    if path.starts_with("http://") || path.starts_with("https://") {
        path
    } else if path.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), path)
    } else {
        format!("{}/{}", origin.trim_end_matches('/'), path)
    }
}

fn document() -> Result<Document, PlayerError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or(PlayerError::NoDocument)
}

fn emulator_present() -> bool {
    web_sys::window()
        .map(|window| Reflect::has(&window, &EMULATOR_GLOBAL.into()).unwrap_or(false))
        .unwrap_or(false)
}

/// Make sure the emulator is loaded, trying each script URL in turn.
pub async fn load_runtime(script_urls: &[String]) -> Result<(), PlayerError> {
    if emulator_present() {
        return Ok(());
    }
    let mut last_error = None;
    for url in script_urls {
        match inject_script(url).await {
            Ok(()) => {
                log::debug!("emulator loaded from {}", url);
                return Ok(());
            }
            Err(e) => {
                log::warn!("emulator script {} failed: {}", url, e);
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) => Err(PlayerError::ScriptLoad(e.to_string())),
        None => Err(PlayerError::NoScriptUrl),
    }
}

async fn inject_script(url: &str) -> Result<(), PlayerError> {
    let document = document()?;
    let head = document.head().ok_or(PlayerError::NoDocument)?;
    let script: HtmlScriptElement = document
        .create_element("script")?
        .dyn_into()
        .map_err(|_| PlayerError::Js("created element is not a script".into()))?;
    script.set_src(url);

    let loaded = Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });
    head.append_child(&script)?;

    let result = JsFuture::from(loaded).await;
    script.set_onload(None);
    script.set_onerror(None);
    result.map(|_| ()).map_err(PlayerError::from)
}

pub async fn probe_media(url: &str) -> Result<(), PlayerError> {
    match Request::get(url).send().await {
        Ok(resp) if resp.ok() => Ok(()),
        Ok(resp) => Err(PlayerError::Media {
            url: url.to_string(),
            reason: format!("status {}", resp.status()),
        }),
        Err(e) => Err(PlayerError::Media {
            url: url.to_string(),
            reason: e.to_string(),
        }),
    }
}

pub async fn prepare(script_urls: &[String], media_url: &str) -> Result<(), PlayerError> {
    load_runtime(script_urls).await?;
    probe_media(media_url).await
}

// --- Fullscreen ---------------------------------------------------------------

const REQUEST_FULLSCREEN: &[&str] = &[
    "requestFullscreen",
    "webkitRequestFullscreen",
    "mozRequestFullScreen",
    "msRequestFullscreen",
];
const EXIT_FULLSCREEN: &[&str] = &[
    "exitFullscreen",
    "webkitExitFullscreen",
    "mozCancelFullScreen",
    "msExitFullscreen",
];
const FULLSCREEN_ELEMENT: &[&str] = &[
    "fullscreenElement",
    "webkitFullscreenElement",
    "mozFullScreenElement",
    "msFullscreenElement",
];

/// Call the first of `names` that `target` has as a method.
fn call_first(target: &JsValue, names: &[&str]) -> Result<bool, PlayerError> {
    for name in names {
        let method = Reflect::get(target, &(*name).into())?;
        if let Some(method) = method.dyn_ref::<Function>() {
            method.call0(target)?;
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn is_fullscreen() -> bool {
    let Ok(document) = document() else {
        return false;
    };
    let document: JsValue = document.into();
    FULLSCREEN_ELEMENT.iter().any(|name| {
        Reflect::get(&document, &(*name).into())
            .map(|value| !value.is_null() && !value.is_undefined())
            .unwrap_or(false)
    })
}

/// Enter or leave fullscreen for `element`. Returns the new state.
pub fn toggle_fullscreen(element: &Element, mobile: bool) -> Result<bool, PlayerError> {
    if is_fullscreen() {
        let document: JsValue = document()?.into();
        call_first(&document, EXIT_FULLSCREEN)?;
        return Ok(false);
    }
    if !call_first(element.as_ref(), REQUEST_FULLSCREEN)? {
        return Err(PlayerError::Js("fullscreen is not supported".into()));
    }
    if mobile {
        lock_landscape();
    }
    Ok(true)
}

/// Best effort; most desktop browsers reject orientation locks.
fn lock_landscape() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let orientation = Reflect::get(&window, &"screen".into())
        .and_then(|screen| Reflect::get(&screen, &"orientation".into()));
    let Ok(orientation) = orientation else {
        return;
    };
    let lock = Reflect::get(&orientation, &"lock".into())
        .ok()
        .and_then(|lock| lock.dyn_into::<Function>().ok());
    let Some(lock) = lock else {
        return;
    };
    if let Ok(promise) = lock.call1(&orientation, &"landscape".into()) {
        if let Ok(promise) = promise.dyn_into::<Promise>() {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("orientation lock refused: {:?}", e);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/swf", 3, "https://poet.example", "https://poet.example/swf/3.swf")]
    #[case("/swf/", 3, "https://poet.example/", "https://poet.example/swf/3.swf")]
    #[case("swf", 12, "http://localhost:8080", "http://localhost:8080/swf/12.swf")]
    #[case("https://cdn.example/anim", 1, "https://poet.example", "https://cdn.example/anim/1.swf")]
    fn builds_absolute_animation_urls(
        #[case] base: &str,
        #[case] id: u32,
        #[case] origin: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(animation_url(base, id, origin), expected);
    }
}
