use std::rc::Rc;

use little_poet::views::{App, AppProps};
use little_poet::AppConfig;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match AppConfig::from_document() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    wasm_logger::init(wasm_logger::Config::new(config.log_level()));
    if let Some(e) = config_error {
        log::warn!("ignoring malformed #{} block: {}", little_poet::config::CONFIG_ELEMENT_ID, e);
    }
    log::info!("little poet {} starting", env!("CARGO_PKG_VERSION"));

    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
